// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::TaskdagError;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TaskdagError;

    /// Checks:
    /// - `executor.max_workers >= 1`
    /// - `executor.stream_buffer >= 1`
    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        if raw.executor.max_workers == 0 {
            return Err(TaskdagError::ConfigError(
                "[executor].max_workers must be >= 1 (got 0)".to_string(),
            ));
        }
        if raw.executor.stream_buffer == 0 {
            return Err(TaskdagError::ConfigError(
                "[executor].stream_buffer must be >= 1 (got 0)".to_string(),
            ));
        }

        Ok(ConfigFile {
            executor: raw.executor,
            summary: raw.summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<ConfigFile, TaskdagError> {
        let raw: RawConfigFile = toml::from_str(s)?;
        ConfigFile::try_from(raw)
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.executor.max_workers, 10);
        assert_eq!(cfg.executor.stream_buffer, 64);
        assert!(!cfg.summary.print);
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = parse("[executor]\nmax_workers = 3\n\n[summary]\nprint = true\n").unwrap();
        assert_eq!(cfg.executor.max_workers, 3);
        assert_eq!(cfg.executor.stream_buffer, 64);
        assert!(cfg.summary.print);
    }

    #[test]
    fn zero_workers_is_rejected() {
        match parse("[executor]\nmax_workers = 0\n") {
            Err(TaskdagError::ConfigError(msg)) => assert!(msg.contains("max_workers")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn zero_stream_buffer_is_rejected() {
        assert!(matches!(
            parse("[executor]\nstream_buffer = 0\n"),
            Err(TaskdagError::ConfigError(_))
        ));
    }
}
