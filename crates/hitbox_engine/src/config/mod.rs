//! Configuration system
//!
//! Rules and hitbox presets are plain serde structs that can be loaded from
//! TOML or RON files through the [`Config`] trait.

mod rules;

pub use rules::HitboxRules;
pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    ///
    /// # Errors
    /// Fails on I/O errors, malformed contents or an extension other than
    /// `.toml` or `.ron`.
    fn load_from_file(path: &str) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(SettingsError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| SettingsError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| SettingsError::Parse(e.to_string()))
        } else {
            Err(SettingsError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Fails on I/O or serialization errors, or an unsupported extension.
    fn save_to_file(&self, path: &str) -> Result<(), SettingsError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| SettingsError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| SettingsError::Serialize(e.to_string()))?
        } else {
            return Err(SettingsError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(SettingsError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
