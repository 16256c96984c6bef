use tracing::{debug, info, warn};

use super::{ThresholdConfig, ThresholdStore};
use crate::error::Result;

/// Owns the active [`ThresholdConfig`] and its backing store.
///
/// `load`, `apply` and `reset` are the only ways the active config changes.
pub struct ThresholdManager<S> {
    store: S,
    current: ThresholdConfig,
}

impl<S: ThresholdStore> ThresholdManager<S> {
    /// Creates a manager with whatever the store holds, or the defaults.
    pub fn new(store: S) -> Self {
        let mut manager = Self {
            store,
            current: ThresholdConfig::default(),
        };
        manager.load();
        manager
    }

    /// Re-reads the persisted config. Missing, unreadable or out-of-range
    /// settings fall back to the defaults.
    pub fn load(&mut self) -> ThresholdConfig {
        self.current = match self.store.load() {
            Ok(Some(config)) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    warn!(error = %e, "Persisted thresholds rejected, using defaults");
                    ThresholdConfig::default()
                }
            },
            Ok(None) => {
                debug!("No persisted thresholds, using defaults");
                ThresholdConfig::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted thresholds, using defaults");
                ThresholdConfig::default()
            }
        };
        self.current
    }

    /// Validates and persists `config`, then makes it active.
    ///
    /// On any failure the active config is left as it was.
    pub fn apply(&mut self, config: ThresholdConfig) -> Result<()> {
        config.validate()?;
        self.store.save(&config)?;
        self.current = config;
        info!(
            high = config.high_threshold,
            low = config.low_threshold,
            "Thresholds applied"
        );
        Ok(())
    }

    /// Restores and persists the defaults.
    ///
    /// The defaults are active even if persisting them fails.
    pub fn reset(&mut self) -> ThresholdConfig {
        self.current = ThresholdConfig::default();
        if let Err(e) = self.store.save(&self.current) {
            warn!(error = %e, "Failed to persist default thresholds");
        }
        self.current
    }

    pub fn current(&self) -> ThresholdConfig {
        self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
