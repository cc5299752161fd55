//! `KEY=VALUE` env-file parsing.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::ConfigError;

/// The parsed contents of an env file.
///
/// Parsing never fails; malformed lines are skipped:
/// - each line is trimmed
/// - lines starting with `#` are comments
/// - lines without `=` are ignored
/// - the key is everything before the first `=`, the value everything after,
///   both trimmed
/// - empty keys are ignored
/// - a repeated key keeps the last value
///
/// # Example
///
/// ```
/// use heron_config::EnvFile;
///
/// let env = EnvFile::parse("# server\nSERVER_PORT = :3000\nnot a pair\nDB_URL=sqlite://a=b.db\n");
/// assert_eq!(env.get("SERVER_PORT"), Some(":3000"));
/// assert_eq!(env.get("DB_URL"), Some("sqlite://a=b.db"));
/// assert_eq!(env.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    vars: IndexMap<String, String>,
}

impl EnvFile {
    /// Parses env-file text.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut vars = IndexMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            vars.insert(key.to_string(), value.trim().to_string());
        }

        Self { vars }
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` if the file does not exist and
    /// `ConfigError::ReadError` if it cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        Ok(Self::parse(&content))
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Iterates over entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns `true` if the file had no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let env = EnvFile::parse("# comment\n\n   # indented comment\nA=1\n");
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("A"), Some("1"));
    }

    #[test]
    fn test_parse_ignores_lines_without_equals() {
        let env = EnvFile::parse("export\nJUST_A_WORD\nB=2");
        assert_eq!(env.iter().collect::<Vec<_>>(), vec![("B", "2")]);
    }

    #[test]
    fn test_parse_trims_and_splits_on_first_equals() {
        let env = EnvFile::parse("  KEY  =  a=b=c  \n");
        assert_eq!(env.get("KEY"), Some("a=b=c"));
    }

    #[test]
    fn test_parse_empty_key_and_value() {
        let env = EnvFile::parse("=orphan\nEMPTY=\n");
        assert_eq!(env.get(""), None);
        assert_eq!(env.get("EMPTY"), Some(""));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let env = EnvFile::parse("A=1\nB=2\nA=3\n");
        assert_eq!(env.get("A"), Some("3"));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_parse_crlf_lines() {
        let env = EnvFile::parse("A=1\r\nB=2\r\n");
        assert_eq!(env.get("A"), Some("1"));
        assert_eq!(env.get("B"), Some("2"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SERVER_PORT=:3000").unwrap();
        writeln!(file, "DB_URL=sqlite://heron.db").unwrap();

        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.get("SERVER_PORT"), Some(":3000"));
        assert_eq!(env.get("DB_URL"), Some("sqlite://heron.db"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EnvFile::load(dir.path().join(".env")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
