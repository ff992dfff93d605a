//! Configuration file loading for demeter
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DEMETER_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./demeter.toml` or `./.demeter.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/demeter/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DetectionMethod, FileCacheConfig, FileConfig, FileDetectionConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat, FilePipelineConfig,
    FileTranslationConfig, TranslationBackendKind,
};
pub use loader::ConfigLoader;
