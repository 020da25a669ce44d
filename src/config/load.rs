use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;

impl Settings {
    /// Load settings from an optional config file and the environment.
    ///
    /// `explicit` (from `--config`) wins over `ALBUMCUT_CONFIG_PATH` and the
    /// XDG default. Only an explicit path is required to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        match explicit {
            Some(path) => {
                builder = builder.add_source(::config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = resolve_config_path() {
                    builder =
                        builder.add_source(::config::File::from(path.as_path()).required(false));
                }
            }
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ALBUMCUT")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("input.extensions")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("input.extensions must name at least one extension".to_string());
        }
        if self.encoder.program.trim().is_empty() {
            return Err("encoder.program must not be empty".to_string());
        }
        if self.encoder.bitrate.trim().is_empty() {
            return Err("encoder.bitrate must not be empty".to_string());
        }
        let extension = self.encoder.extension.trim().trim_start_matches('.');
        if extension.is_empty() {
            return Err("encoder.extension must not be empty".to_string());
        }
        // Tracks are tagged with a prepended ID3v2 tag, which only MP3 carries.
        if !extension.eq_ignore_ascii_case("mp3") {
            return Err(format!(
                "encoder.extension must be mp3 (got {extension:?}); tracks are tagged with ID3v2"
            ));
        }
        if self.encoder.timeout_secs == 0 {
            return Err("encoder.timeout_secs must be >= 1".to_string());
        }
        Ok(())
    }

    /// Recognized source extensions, normalized to lowercase without dots.
    pub fn input_extensions(&self) -> Vec<String> {
        self.input
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }
}

/// Resolve the config path from `ALBUMCUT_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ALBUMCUT_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/albumcut/config.toml`, or `~/.config/albumcut/config.toml`
/// when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("albumcut").join("config.toml"))
}
