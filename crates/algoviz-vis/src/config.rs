//! Runtime configuration.

use std::str::FromStr;

use algoviz_steps::{Algorithm, SortAlgorithm};

use crate::error::{Error, Result};
use crate::session::MAX_VALUES;
use crate::timing::MAX_SPEED;

/// Configuration for the visualizer server and its default inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// HTTP port
    pub port: u16,
    /// Seed for generated arrays and wall layouts
    pub seed: u64,
    /// Length of generated sort arrays
    pub array_size: usize,
    /// Inclusive value range for generated sort arrays
    pub value_range: (i64, i64),
    /// Fraction of grid cells walled at startup
    pub wall_density: f64,
    /// Initial playback speed, 0–100
    pub speed: u8,
    /// Algorithm loaded at startup
    pub algorithm: Algorithm,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            seed: 42,
            array_size: 16,
            value_range: (5, 100),
            wall_density: 0.25,
            speed: 50,
            algorithm: Algorithm::Sort(SortAlgorithm::Bubble),
        }
    }
}

impl VisConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. Unset keys keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            port: parse_var(&lookup, "ALGOVIZ_PORT")?.unwrap_or(defaults.port),
            seed: parse_var(&lookup, "ALGOVIZ_SEED")?.unwrap_or(defaults.seed),
            array_size: parse_var(&lookup, "ALGOVIZ_ARRAY_SIZE")?.unwrap_or(defaults.array_size),
            wall_density: parse_var(&lookup, "ALGOVIZ_WALL_DENSITY")?
                .unwrap_or(defaults.wall_density),
            speed: parse_var(&lookup, "ALGOVIZ_SPEED")?.unwrap_or(defaults.speed),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.array_size == 0 || self.array_size > MAX_VALUES {
            return Err(Error::Config(format!(
                "array size {} outside 1..={MAX_VALUES}",
                self.array_size
            )));
        }
        if !(0.0..=1.0).contains(&self.wall_density) {
            return Err(Error::Config(format!(
                "wall density {} outside 0..=1",
                self.wall_density
            )));
        }
        if self.speed > MAX_SPEED {
            return Err(Error::Config(format!("speed {} above {MAX_SPEED}", self.speed)));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("invalid {key}: {raw:?}"))),
        None => Ok(None),
    }
}
