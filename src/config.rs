use crate::error::{PlantOpsError, Result};
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub gardener: GardenerConfig,
    pub location: LocationConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GardenerConfig {
    pub name: String,
    pub dwelling_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocationConfig {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherProvider {
    #[default]
    Simulated,
    OpenWeatherMap,
}

impl WeatherProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherProvider::Simulated => "Simulated",
            WeatherProvider::OpenWeatherMap => "OpenWeatherMap",
        }
    }
}

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct WeatherConfig {
    #[serde(default)]
    pub provider: WeatherProvider,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_enabled() -> bool {
    true
}

fn input_error(e: dialoguer::Error) -> PlantOpsError {
    PlantOpsError::Config(format!("Input error: {}", e))
}

impl Config {
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p.clone(),
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(PlantOpsError::Config(format!(
                "Config file not found at {:?}. Run `plantops init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| PlantOpsError::Config(format!("Failed to read config: {}", e)))?;

        Self::parse(&config_str)
    }

    /// Parse YAML after `${VAR}` substitution.
    pub fn parse(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| PlantOpsError::Config(format!("Failed to parse config: {}", e)))?;

        if config.weather.provider == WeatherProvider::OpenWeatherMap
            && config.weather.api_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(PlantOpsError::Config(
                "weather.provider is openweathermap but weather.api_key is empty".into(),
            ));
        }

        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/plantops/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlantOpsError::Config("Cannot determine config directory".into()))?
            .join("plantops");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive(config_override: Option<&PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("No configuration found. Let's set up PlantOps!");
        println!();

        println!("Gardener");
        let name: String = Input::new()
            .with_prompt("  Your name")
            .default("Gardener".into())
            .interact_text()
            .map_err(input_error)?;

        let dwellings = ["House", "Apartment"];
        let dwelling_idx = Select::new()
            .with_prompt("  Where do your plants live?")
            .items(&dwellings)
            .default(1)
            .interact()
            .map_err(input_error)?;

        println!();

        println!("Location");
        let city: String = Input::new()
            .with_prompt("  City")
            .default("São Paulo".into())
            .interact_text()
            .map_err(input_error)?;

        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(-23.55)
            .interact_text()
            .map_err(input_error)?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(-46.63)
            .interact_text()
            .map_err(input_error)?;

        println!();

        println!("OpenWeatherMap (leave API key blank to use simulated weather)");
        let api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(input_error)?;

        let weather = if api_key.is_empty() {
            WeatherConfig::default()
        } else {
            WeatherConfig {
                provider: WeatherProvider::OpenWeatherMap,
                api_key: Some(api_key),
            }
        };

        println!();

        let config = Config {
            gardener: GardenerConfig {
                name,
                dwelling_type: Some(dwellings[dwelling_idx].to_string()),
            },
            location: LocationConfig {
                city,
                latitude,
                longitude,
            },
            weather,
            notifications: NotificationConfig::default(),
        };

        let config_path = match config_override {
            Some(p) => p.clone(),
            None => Self::default_config_path()?,
        };
        config.save(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn save(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| PlantOpsError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# PlantOps Configuration\n# Generated by `plantops init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| PlantOpsError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("PLANTOPS_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| PlantOpsError::Config("Cannot determine data directory".into()))?
            .join("plantops");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("plantops.db"))
    }

    pub fn log_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("plantops.log"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gardener: GardenerConfig {
                name: "Gardener".into(),
                dwelling_type: Some("Apartment".into()),
            },
            location: LocationConfig {
                city: "São Paulo".into(),
                latitude: -23.55,
                longitude: -46.63,
            },
            weather: WeatherConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
gardener:
  name: Ana
location:
  city: Recife
  latitude: -8.05
  longitude: -34.9
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.gardener.name, "Ana");
        assert_eq!(config.gardener.dwelling_type, None);
        assert_eq!(config.location.city, "Recife");
        assert_eq!(config.weather.provider, WeatherProvider::Simulated);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn substitutes_env_vars() {
        std::env::set_var("PLANTOPS_TEST_OWM_KEY", "abc123");
        let yaml = format!(
            "{}weather:\n  provider: openweathermap\n  api_key: ${{PLANTOPS_TEST_OWM_KEY}}\n",
            MINIMAL
        );
        let config = Config::parse(&yaml).unwrap();
        assert_eq!(config.weather.provider, WeatherProvider::OpenWeatherMap);
        assert_eq!(config.weather.api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn openweathermap_requires_api_key() {
        let yaml = format!("{}weather:\n  provider: openweathermap\n", MINIMAL);
        assert!(matches!(
            Config::parse(&yaml),
            Err(PlantOpsError::Config(_))
        ));
    }

    #[test]
    fn notifications_can_be_disabled() {
        let yaml = format!("{}notifications:\n  enabled: false\n", MINIMAL);
        assert!(!Config::parse(&yaml).unwrap().notifications.enabled);
    }

    #[test]
    fn debug_redacts_api_key() {
        let weather = WeatherConfig {
            provider: WeatherProvider::OpenWeatherMap,
            api_key: Some("secret".into()),
        };
        let out = format!("{:?}", weather);
        assert!(!out.contains("secret"));
        assert!(out.contains("[REDACTED]"));
    }

    #[test]
    fn default_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let parsed = Config::parse(&yaml).unwrap();
        assert_eq!(parsed.location, Config::default().location);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let path = PathBuf::from("/nonexistent/plantops/config.yaml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(PlantOpsError::Config(_))
        ));
    }
}
