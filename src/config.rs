//! Engine configuration.
//!
//! The active configuration is thread-local, like the gradient tape, so
//! tests running in parallel can flip debug mode without interfering.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TensorError};

/// Environment variable enabling debug mode (`1`/`true`).
pub const ENV_DEBUG: &str = "TENSORGRAD_DEBUG";

/// Environment variable overriding the test comparison tolerance.
pub const ENV_TEST_EPSILON: &str = "TENSORGRAD_TEST_EPSILON";

/// Default tolerance for comparing float32 results.
pub const DEFAULT_TEST_EPSILON: f32 = 1e-3;

/// Runtime options for the tensor engine.
///
/// # Examples
///
/// ```
/// use tensorgrad::config::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{"debug": true}"#).unwrap();
/// assert!(config.debug);
/// assert_eq!(config.test_epsilon, 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Inspect every op result and warn when it contains NaN or infinity.
    pub debug: bool,
    /// Tolerance used by [`crate::test_util::assert_arrays_close`].
    pub test_epsilon: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debug: false,
            test_epsilon: DEFAULT_TEST_EPSILON,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `TENSORGRAD_DEBUG` and `TENSORGRAD_TEST_EPSILON`.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidConfig`] if a variable is set but cannot
    /// be parsed, or the resulting config fails [`EngineConfig::validate`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DEBUG) {
            config.debug = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(TensorError::InvalidConfig {
                        param: ENV_DEBUG.to_string(),
                        value: raw,
                        constraint: "a boolean (1/0, true/false)".to_string(),
                    })
                }
            };
        }

        if let Some(raw) = lookup(ENV_TEST_EPSILON) {
            config.test_epsilon =
                raw.trim()
                    .parse()
                    .map_err(|_| TensorError::InvalidConfig {
                        param: ENV_TEST_EPSILON.to_string(),
                        value: raw.clone(),
                        constraint: "a floating point number".to_string(),
                    })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidConfig`] when `test_epsilon` is not a
    /// finite positive number.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_epsilon.is_finite() && self.test_epsilon > 0.0) {
            return Err(TensorError::InvalidConfig {
                param: "test_epsilon".to_string(),
                value: self.test_epsilon.to_string(),
                constraint: "a finite value > 0".to_string(),
            });
        }
        Ok(())
    }
}

thread_local! {
    static CONFIG: RefCell<EngineConfig> = RefCell::new(EngineConfig::default());
}

/// Snapshot of the active configuration for this thread.
#[must_use]
pub fn config() -> EngineConfig {
    CONFIG.with(|c| c.borrow().clone())
}

/// Replace the active configuration for this thread.
///
/// # Errors
///
/// Returns an error (and keeps the previous config) if `config` is invalid.
pub fn set_config(config: EngineConfig) -> Result<()> {
    config.validate()?;
    CONFIG.with(|c| *c.borrow_mut() = config);
    Ok(())
}

/// Run `f` with `config` active, restoring the previous config afterwards.
///
/// # Errors
///
/// Returns an error without running `f` if `config` is invalid.
pub fn with_config<F, R>(config: EngineConfig, f: F) -> Result<R>
where
    F: FnOnce() -> R,
{
    config.validate()?;
    let prev = CONFIG.with(|c| std::mem::replace(&mut *c.borrow_mut(), config));
    let result = f();
    CONFIG.with(|c| *c.borrow_mut() = prev);
    Ok(result)
}

pub(crate) fn debug_enabled() -> bool {
    CONFIG.with(|c| c.borrow().debug)
}
