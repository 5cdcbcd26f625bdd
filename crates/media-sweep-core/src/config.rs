use crate::extract::ExtractionMode;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_media_root")]
    pub media_root: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Extra exclusion prefixes under the media root.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Plugin integrations to collect from, e.g. `mega_menu`.
    #[serde(default)]
    pub integrations: Vec<String>,
    #[serde(default = "default_true")]
    pub scan_whole_store: bool,
    #[serde(default = "default_true")]
    pub intensive: bool,
}

fn default_media_root() -> String {
    "pub/media".to_string()
}

fn default_database_path() -> String {
    "store.db".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            media_root: default_media_root(),
            database_path: default_database_path(),
            exclude: Vec::new(),
            integrations: Vec::new(),
            scan_whole_store: true,
            intensive: true,
        }
    }
}

impl AppConfig {
    pub fn extraction_mode(&self) -> ExtractionMode {
        if self.intensive {
            ExtractionMode::Intensive
        } else {
            ExtractionMode::Fast
        }
    }
}

/// Reads `MediaSweep.toml` (optional) layered under `MEDIA_SWEEP_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("MediaSweep").required(false))
        .add_source(
            Environment::with_prefix("MEDIA_SWEEP")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("exclude")
                .with_list_parse_key("integrations"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
