//! Static file serving.
//!
//! A [`StaticFiles`] instance serves the contents of one folder under the
//! URL prefix `/<folder>/`. Only `GET` and `HEAD` are accepted.
//!
//! # Security
//!
//! - `..` components are rejected with `403`
//! - hidden components (starting with `.`) are rejected with `403`
//! - the resolved file must stay inside the root after symlink resolution

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use heron_core::{Response, ResponseExt};
use http::{header, HeaderValue, Method, StatusCode};
use http_body_util::Full;
use thiserror::Error;

/// Errors that can occur when serving static files.
#[derive(Debug, Error)]
pub enum StaticFileError {
    /// The requested file was not found.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The path is forbidden.
    #[error("forbidden path: {0}")]
    Forbidden(String),

    /// Method other than GET or HEAD.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// I/O error while reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StaticFileError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_response(self) -> Response {
        let mut response = Response::empty(self.status_code());
        if matches!(self, Self::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        }
        response
    }
}

/// Serves one folder under `/<folder>/`.
///
/// # Example
///
/// ```
/// use heron_server::StaticFiles;
///
/// let files = StaticFiles::new("static");
/// assert_eq!(files.prefix(), "/static/");
/// assert!(files.claims("/static/js/app.js"));
/// assert!(!files.claims("/staticky"));
/// ```
#[derive(Debug, Clone)]
pub struct StaticFiles {
    prefix: String,
    root: PathBuf,
}

impl StaticFiles {
    /// Serves `folder` (relative to the working directory) under `/<folder>/`.
    pub fn new(folder: impl AsRef<str>) -> Self {
        let folder = folder.as_ref().trim_matches('/');
        Self {
            prefix: format!("/{folder}/"),
            root: PathBuf::from(folder),
        }
    }

    /// Reads files from `root` instead of the folder named in the prefix.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Returns the URL prefix, with leading and trailing slash.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the directory files are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `true` if `path` falls under the prefix.
    #[must_use]
    pub fn claims(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Serves `path`, always producing a response.
    pub async fn serve(&self, method: &Method, path: &str) -> Response {
        match self.try_serve(method, path).await {
            Ok(response) => response,
            Err(StaticFileError::Io(e)) => {
                tracing::error!(error = %e, path, "Failed to read static file");
                StaticFileError::Io(e).into_response()
            }
            Err(e) => {
                tracing::debug!(error = %e, path, "Static file request rejected");
                e.into_response()
            }
        }
    }

    /// Serves `path`, reporting failures as errors.
    pub async fn try_serve(
        &self,
        method: &Method,
        path: &str,
    ) -> Result<Response, StaticFileError> {
        if method != Method::GET && method != Method::HEAD {
            return Err(StaticFileError::MethodNotAllowed);
        }

        let relative = path
            .strip_prefix(&self.prefix)
            .ok_or_else(|| StaticFileError::NotFound(path.to_string()))?;
        let mut file_path = self.resolve(relative).await?;

        if tokio::fs::metadata(&file_path).await?.is_dir() {
            file_path = file_path.join("index.html");
        }

        let contents = tokio::fs::read(&file_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StaticFileError::NotFound(path.to_string()),
            _ => StaticFileError::Io(e),
        })?;

        let length = contents.len();
        let body = if method == Method::HEAD {
            Bytes::new()
        } else {
            Bytes::from(contents)
        };

        Ok(http::Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, detect_mime_type(&file_path))
            .header(header::CONTENT_LENGTH, length)
            .body(Full::new(body))
            .unwrap_or_else(|_| Response::empty(StatusCode::INTERNAL_SERVER_ERROR)))
    }

    async fn resolve(&self, relative: &str) -> Result<PathBuf, StaticFileError> {
        for component in Path::new(relative).components() {
            match component {
                Component::ParentDir => {
                    return Err(StaticFileError::Forbidden(
                        "directory traversal not allowed".to_string(),
                    ));
                }
                Component::Normal(name) if name.to_string_lossy().starts_with('.') => {
                    return Err(StaticFileError::Forbidden(
                        "hidden files not allowed".to_string(),
                    ));
                }
                _ => {}
            }
        }

        let not_found = |_| StaticFileError::NotFound(relative.to_string());
        let root = tokio::fs::canonicalize(&self.root).await.map_err(not_found)?;
        let full = tokio::fs::canonicalize(root.join(relative))
            .await
            .map_err(not_found)?;

        if !full.starts_with(&root) {
            return Err(StaticFileError::Forbidden(
                "path escapes root directory".to_string(),
            ));
        }
        Ok(full)
    }
}

fn detect_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
