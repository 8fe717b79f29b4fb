use super::{
    evolution::EvolutionConfig,
    fitness::FitnessConfig,
    scheduling::SchedulingConfig,
    traits::ConfigSection,
};
use crate::error::EvobiasError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

pub const DEFAULT_ENV_PREFIX: &str = "EVOBIAS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub fitness: FitnessConfig,
    pub scheduling: SchedulingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EvobiasError> {
        self.evolution.validate()?;
        self.fitness.validate()?;
        self.scheduling.validate()?;
        Ok(())
    }
}

/// Holds the active configuration.
///
/// Files are TOML; every key can be overridden from the environment as
/// `<PREFIX>__<SECTION>__<KEY>`, e.g. `EVOBIAS__EVOLUTION__SEED=7`.
pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
    env_prefix: String,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_env_prefix(DEFAULT_ENV_PREFIX)
    }

    pub fn with_env_prefix(prefix: &str) -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
            env_prefix: prefix.to_string(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvobiasError> {
        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(path.as_ref())
                    .format(::config::FileFormat::Toml)
                    .required(true),
            )
            .add_source(self.env_source())
            .build()
            .map_err(|e| EvobiasError::Configuration(format!("Failed to read config: {}", e)))?;

        self.install(settings)
    }

    /// Defaults layered with environment overrides only
    pub fn load_from_env(&self) -> Result<(), EvobiasError> {
        let settings = ::config::Config::builder()
            .add_source(self.env_source())
            .build()
            .map_err(|e| EvobiasError::Configuration(format!("Failed to read environment: {}", e)))?;

        self.install(settings)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvobiasError> {
        let config = self.get()?;
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| EvobiasError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| EvobiasError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, EvobiasError> {
        self.config
            .read()
            .map(|config| config.clone())
            .map_err(|_| EvobiasError::Configuration("Config lock poisoned".to_string()))
    }

    /// Apply `f` to a copy and keep it only if it validates
    pub fn update<F>(&self, f: F) -> Result<(), EvobiasError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get()?;
        f(&mut candidate);
        candidate.validate()?;
        self.store(candidate)
    }

    fn env_source(&self) -> ::config::Environment {
        ::config::Environment::with_prefix(&self.env_prefix)
            .separator("__")
            .try_parsing(true)
    }

    fn install(&self, settings: ::config::Config) -> Result<(), EvobiasError> {
        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| EvobiasError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        self.store(config)
    }

    fn store(&self, config: AppConfig) -> Result<(), EvobiasError> {
        let mut guard = self
            .config
            .write()
            .map_err(|_| EvobiasError::Configuration("Config lock poisoned".to_string()))?;
        *guard = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn test_update_rejects_invalid_and_keeps_previous() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.evolution.mutation_rate = 1.5);

        assert!(matches!(result, Err(EvobiasError::Configuration(_))));
        assert_eq!(manager.get().unwrap().evolution.mutation_rate, 0.15);
    }
}
