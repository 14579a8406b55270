// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Env Import Application Service
//!
//! Whole-operation orchestration around the env file parser: input bounds,
//! text decoding, and remote fetch. Line-level problems stay warnings
//! inside [`ImportResult`]; everything here is fatal and aborts the import
//! with an [`EnvImportError`] distinguishable from those warnings.

use metrics::counter;
use thiserror::Error;
use tracing::debug;

use crate::domain::env::ImportResult;
use crate::infrastructure::env_file::EnvFileParser;
use crate::infrastructure::remote_env::{FetchError, RemoteEnvSource};

/// Default input size cap (1 MiB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Default input line cap
pub const DEFAULT_MAX_INPUT_LINES: usize = 10_000;

/// Fatal import failures. Callers block the import action on these, unlike
/// the non-blocking warning list.
#[derive(Debug, Error)]
pub enum EnvImportError {
    #[error("Input is not valid UTF-8 text")]
    NotText,

    #[error("Input is {size} bytes, exceeding the {limit}-byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Input has {count} lines, exceeding the {limit}-line limit")]
    TooManyLines { count: usize, limit: usize },

    #[error("Failed to read env file {path}: {error}")]
    Io { path: String, error: String },

    #[error("Fetching remote env file failed: {0}")]
    Fetch(#[from] FetchError),
}

impl EnvImportError {
    /// Which stage failed, so the UI can say "fetch" vs "parse".
    pub fn stage(&self) -> &'static str {
        match self {
            EnvImportError::Io { .. } => "read",
            EnvImportError::Fetch(_) => "fetch",
            _ => "parse",
        }
    }
}

/// Env import service (Application layer)
#[derive(Debug, Clone)]
pub struct EnvImportService {
    max_bytes: usize,
    max_lines: usize,
}

impl EnvImportService {
    pub fn new() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_lines: DEFAULT_MAX_INPUT_LINES,
        }
    }

    pub fn with_limits(max_bytes: usize, max_lines: usize) -> Self {
        Self {
            max_bytes,
            max_lines,
        }
    }

    /// Import from text already in memory.
    pub fn import_text(&self, content: &str) -> Result<ImportResult, EnvImportError> {
        if content.len() > self.max_bytes {
            return Err(EnvImportError::TooLarge {
                size: content.len(),
                limit: self.max_bytes,
            });
        }
        let line_count = content.lines().count();
        if line_count > self.max_lines {
            return Err(EnvImportError::TooManyLines {
                count: line_count,
                limit: self.max_lines,
            });
        }

        let result = EnvFileParser::parse(content);

        debug!(
            vars = result.env_vars.len(),
            warnings = result.warnings.len(),
            "env import parsed"
        );
        counter!("console_env_imports_total").increment(1);
        counter!("console_env_import_warnings_total").increment(result.warnings.len() as u64);

        Ok(result)
    }

    /// Import from raw bytes, e.g. an uploaded file body.
    pub fn import_bytes(&self, bytes: &[u8]) -> Result<ImportResult, EnvImportError> {
        if bytes.len() > self.max_bytes {
            return Err(EnvImportError::TooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }
        let content = std::str::from_utf8(bytes).map_err(|_| EnvImportError::NotText)?;
        self.import_text(content)
    }

    /// Import from a local env file.
    pub fn import_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<ImportResult, EnvImportError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| EnvImportError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        self.import_bytes(&bytes)
    }

    /// Fetch a remote `.env` file and import it. The fetch precedes parsing
    /// and its failures surface as [`EnvImportError::Fetch`].
    pub async fn import_url(
        &self,
        source: &RemoteEnvSource,
        url: &str,
    ) -> Result<ImportResult, EnvImportError> {
        let body = source.fetch(url).await?;
        self.import_bytes(&body)
    }
}

impl Default for EnvImportService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_within_limits() {
        let service = EnvImportService::new();
        let result = service.import_text("PORT=8000\n").unwrap();
        assert_eq!(result.env_vars.len(), 1);
        assert!(result.is_clean());
    }

    #[test]
    fn test_oversized_input_is_fatal() {
        let service = EnvImportService::with_limits(16, 100);
        let err = service.import_text(&"A=1\n".repeat(10)).unwrap_err();
        assert!(matches!(err, EnvImportError::TooLarge { limit: 16, .. }));
        assert_eq!(err.stage(), "parse");
    }

    #[test]
    fn test_too_many_lines_is_fatal() {
        let service = EnvImportService::with_limits(1024, 2);
        let err = service.import_text("A=1\nB=2\nC=3").unwrap_err();
        assert!(matches!(
            err,
            EnvImportError::TooManyLines { count: 3, limit: 2 }
        ));
    }

    #[test]
    fn test_non_utf8_bytes_are_fatal() {
        let service = EnvImportService::new();
        let err = service.import_bytes(&[0x50, 0xff, 0xfe, 0x3d]).unwrap_err();
        assert!(matches!(err, EnvImportError::NotText));
    }

    #[test]
    fn test_import_file_reads_and_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.env");
        std::fs::write(&path, "PORT=8000\n# done\n").unwrap();

        let service = EnvImportService::new();
        let result = service.import_file(&path).unwrap();
        assert_eq!(result.env_vars.len(), 1);
    }

    #[test]
    fn test_import_missing_file_flags_read_stage() {
        let service = EnvImportService::new();
        let err = service.import_file("/nonexistent/deploy.env").unwrap_err();
        assert!(matches!(err, EnvImportError::Io { .. }));
        assert_eq!(err.stage(), "read");
    }

    #[tokio::test]
    async fn test_import_url_flags_fetch_stage() {
        let service = EnvImportService::new();
        let source = RemoteEnvSource::new();

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/team/.env")
            .with_status(500)
            .create_async()
            .await;

        let err = service
            .import_url(&source, &format!("{}/team/.env", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, EnvImportError::Fetch(_)));
        assert_eq!(err.stage(), "fetch");
    }

    #[tokio::test]
    async fn test_import_url_parses_fetched_body() {
        let service = EnvImportService::new();
        let source = RemoteEnvSource::new();

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/team/.env")
            .with_status(200)
            .with_body("PORT=8000\nBROKEN\n")
            .create_async()
            .await;

        let result = service
            .import_url(&source, &format!("{}/team/.env", server.url()))
            .await
            .unwrap();

        assert_eq!(result.env_vars.len(), 1);
        assert_eq!(result.warnings.len(), 1);
    }
}
