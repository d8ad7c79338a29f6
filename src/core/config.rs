//! Tunable parameters loaded from TOML.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults of [`Pbkdf2Params`] and [`DecoderConfig`].
//!
//! ```toml
//! [pbkdf2]
//! target_millis = 250
//! min_rounds = 200000
//! max_rounds = 20000000
//!
//! [decoder]
//! max_depth = 4
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::document::DecoderConfig;
use crate::core::error::{KeyError, KeyResult};
use crate::core::operations::pbkw::Pbkdf2Params;

/// Crate-wide settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Passphrase wrapping work factor.
    pub pbkdf2: Pbkdf2Params,
    /// Document decoder limits.
    pub decoder: DecoderConfig,
}

impl Config {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Config`] for invalid TOML, unknown sections or
    /// PBKDF2 bounds that fail [`Pbkdf2Params::validate`].
    pub fn from_toml_str(text: &str) -> KeyResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| KeyError::Config(e.to_string()))?;
        config
            .pbkdf2
            .validate()
            .map_err(|_| KeyError::Config("pbkdf2 rounds out of range".to_string()))?;
        if config.decoder.max_depth == 0 {
            return Err(KeyError::Config("decoder max_depth must be positive".to_string()));
        }
        Ok(config)
    }

    /// Reads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> KeyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| KeyError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() -> KeyResult<()> {
        let config = Config::from_toml_str("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.pbkdf2, Pbkdf2Params::moderate());
        assert_eq!(config.decoder.max_depth, 8);
        Ok(())
    }

    #[test]
    fn test_partial_sections() -> KeyResult<()> {
        let config = Config::from_toml_str(
            r#"
            [pbkdf2]
            target_millis = 50

            [decoder]
            max_depth = 3
            "#,
        )?;
        assert_eq!(config.pbkdf2.target_millis, 50);
        assert_eq!(config.pbkdf2.min_rounds, Pbkdf2Params::moderate().min_rounds);
        assert_eq!(config.decoder.max_depth, 3);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::from_toml_str("[pbkdf2]\nmin_rounds = 10\nmax_rounds = 5\n"),
            Err(KeyError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[decoder]\nmax_depth = 0\n"),
            Err(KeyError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[cache]\nsize = 1\n"),
            Err(KeyError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[pbkdf2]\ntarget_millis = \"fast\"\n"),
            Err(KeyError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/s4key.toml"),
            Err(KeyError::Config(_))
        ));
    }
}
