// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [executor]
/// max_workers = 4
/// stream_buffer = 64
///
/// [summary]
/// print = true
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub executor: ExecutorSection,

    #[serde(default)]
    pub summary: SummarySection,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub executor: ExecutorSection,
    pub summary: SummarySection,
}

/// `[executor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorSection {
    /// Maximum number of task bodies running at once. Must be >= 1.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// How many streamed outputs may be buffered ahead of the consumer.
    /// Must be >= 1.
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

fn default_max_workers() -> usize {
    10
}

fn default_stream_buffer() -> usize {
    64
}

impl Default for ExecutorSection {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            stream_buffer: default_stream_buffer(),
        }
    }
}

/// `[summary]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummarySection {
    /// Print the graph summary before running.
    #[serde(default)]
    pub print: bool,
}
