//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};

pub use demeter_domain::OutputFormat as FileOutputFormat;

/// `[output]`: how answers are printed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<FileOutputFormat>,
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// The command-line choice wins over the file, which wins over `answer`
    pub fn resolve_format(&self, flag: Option<FileOutputFormat>) -> FileOutputFormat {
        flag.or(self.format).unwrap_or_default()
    }

    /// Color is off when disabled here or when `NO_COLOR` is set
    pub fn color_enabled(&self) -> bool {
        self.color && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
    }
}
