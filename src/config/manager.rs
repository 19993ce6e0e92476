use super::{
    evolution::EvolutionConfig,
    race::RaceConfig,
    traits::ConfigSection,
};
use crate::error::PursuitError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `PURSUIT_EVOLUTION__GENERATIONS=500`.
pub const ENV_PREFIX: &str = "PURSUIT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub race: RaceConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), PursuitError> {
        self.evolution.validate()?;
        self.race.validate()?;
        Ok(())
    }

    /// Parse a TOML document; missing keys fall back to defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, PursuitError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
}

fn config_error(context: &str, err: impl std::fmt::Display) -> PursuitError {
    PursuitError::Configuration(format!("{}: {}", context, err))
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Layer defaults, the TOML file at `path` and `PURSUIT_*` environment
    /// variables, then validate the merged result before adopting it.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PursuitError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PursuitError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let defaults = ::config::Config::try_from(&AppConfig::default())
            .map_err(|e| config_error("Failed to build defaults", e))?;

        let settings = ::config::Config::builder()
            .add_source(defaults)
            .add_source(::config::File::from(path).format(::config::FileFormat::Toml))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| config_error("Failed to read config", e))?;

        let loaded: AppConfig = settings
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse config", e))?;

        loaded.validate()?;
        log::info!("Loaded configuration from {}", path.display());

        let mut config = self
            .config
            .write()
            .map_err(|e| config_error("Config lock poisoned", e))?;
        *config = loaded;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PursuitError> {
        let config = self
            .config
            .read()
            .map_err(|e| config_error("Config lock poisoned", e))?;
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| config_error("Failed to serialize", e))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, PursuitError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|e| config_error("Config lock poisoned", e))
    }

    pub fn update<F>(&self, f: F) -> Result<(), PursuitError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self
            .config
            .write()
            .map_err(|e| config_error("Config lock poisoned", e))?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [evolution]
            population_size = 30
            generations = 250
            selection_method = "Tournament"
            tournament_size = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.evolution.population_size, 30);
        assert_eq!(config.evolution.generations, 250);
        assert_eq!(config.evolution.selection_method, crate::config::SelectionMethod::Tournament);
        assert_eq!(config.evolution.penalty_fitness, 1000.0);
        assert_eq!(config.race.segments, 23);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let result = AppConfig::from_toml_str(
            r#"
            [evolution]
            population_size = 0
            "#,
        );
        assert!(matches!(result, Err(PursuitError::Configuration(_))));
    }

    #[test]
    fn test_update_rejects_invalid_change() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.evolution.generations = 0);
        assert!(result.is_err());
        assert_eq!(manager.get().unwrap().evolution.generations, 1000);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "teampursuit_config_{}.toml",
            std::process::id()
        ));

        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.evolution.population_size = 12;
                c.evolution.seed = Some(7);
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        let config = reloaded.get().unwrap();
        assert_eq!(config.evolution.population_size, 12);
        assert_eq!(config.evolution.seed, Some(7));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let manager = ConfigManager::new();
        let result = manager.load_from_file("/nonexistent/teampursuit.toml");
        assert!(matches!(result, Err(PursuitError::Configuration(_))));
    }
}
