use crate::error::EvobiasError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), EvobiasError>;
}

/// Shorthand for a section-tagged configuration error
pub(crate) fn invalid<S: ConfigSection>(message: &str) -> EvobiasError {
    EvobiasError::Configuration(format!("[{}] {}", S::section_name(), message))
}

pub(crate) fn check_unit_interval<S: ConfigSection>(name: &str, value: f64) -> Result<(), EvobiasError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid::<S>(&format!("{} must be between 0 and 1", name)));
    }
    Ok(())
}
