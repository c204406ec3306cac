//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solaris_decoder::{DecoderConfig, Field};
use std::fs;
use std::path::Path;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Sensor keys to register (default: all)
    pub sensors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputConfig {
    /// Fields whose sensors should be registered
    pub fn fields(&self) -> Result<Vec<Field>> {
        match &self.sensors {
            None => Ok(Field::ALL.to_vec()),
            Some(keys) => keys
                .iter()
                .map(|key| {
                    Field::from_key(key)
                        .with_context(|| format!("Invalid [output] sensors entry: {}", key))
                })
                .collect(),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .decoder
        .validate()
        .with_context(|| format!("Invalid decoder settings in {:?}", path))?;
    config.output.fields()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solaris_decoder::Language;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [decoder]
            language = "de"
            line_timeout_ms = 3000

            [output]
            format = "json"
            sensors = ["solaris_tk", "solaris_pwr"]
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.decoder.language, Language::De);
        assert_eq!(config.decoder.line_timeout_ms, 3000);
        assert_eq!(config.decoder.max_line_len, 48);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(
            config.output.fields().unwrap(),
            vec![Field::CollectorTemperature, Field::Power]
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.decoder, DecoderConfig::default());
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.output.fields().unwrap().len(), Field::ALL.len());
    }

    #[test]
    fn test_load_config_rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[decoder]\nmin_line_len = 60\nmax_line_len = 40").unwrap();
        assert!(load_config(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nsensors = [\"solaris_nope\"]").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[decoder]\nlanguage = \"it\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.decoder.language, Language::It);
    }
}
