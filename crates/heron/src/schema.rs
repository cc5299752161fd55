//! Database schema.

/// DDL for the `customers` table, safe to run on every start.
pub const CUSTOMERS: &str = "
CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL
);
";
