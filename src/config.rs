use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the TLC taxi zone table CSV
    #[serde(default = "Config::default_zone_table")]
    pub zone_table: String,
    /// Path to the serialized fare model artifact
    #[serde(default = "Config::default_model_artifact")]
    pub model_artifact: String,
    /// Environment variable holding the Google Maps API key
    #[serde(default = "Config::default_maps_api_key_env")]
    pub maps_api_key_env: String,
    /// Address to bind the HTTP server to
    #[serde(default = "Config::default_bind_address")]
    pub bind_address: String,
    /// Allowed CORS origins. Required unless cors_permissive is true.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Explicitly allow all origins (development only). Defaults to false.
    #[serde(default)]
    pub cors_permissive: bool,
}

impl Config {
    fn default_zone_table() -> String {
        "data/taxi_zones.csv".into()
    }

    fn default_model_artifact() -> String {
        "data/fare_model.json".into()
    }

    fn default_maps_api_key_env() -> String {
        "GOOGLE_MAPS_API_KEY".into()
    }

    fn default_bind_address() -> String {
        "0.0.0.0:3000".into()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.zone_table, "data/taxi_zones.csv");
        assert_eq!(config.model_artifact, "data/fare_model.json");
        assert_eq!(config.maps_api_key_env, "GOOGLE_MAPS_API_KEY");
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert!(config.cors_origins.is_empty());
        assert!(!config.cors_permissive);
    }

    #[test]
    fn parses_explicit_values() {
        let yaml = "\
zone_table: fixtures/zones.csv
maps_api_key_env: MAPS_KEY
bind_address: 127.0.0.1:8080
cors_origins:
  - http://localhost:5173
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.zone_table, "fixtures/zones.csv");
        assert_eq!(config.maps_api_key_env, "MAPS_KEY");
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
    }
}
