//! Named presets.
//!
//! A timer preset is a set of block lengths. A global preset bundles a
//! countdown tick rate, a clock style and a timer preset so a whole
//! "feel" can be switched at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::BlockLengths;
use crate::tick_rate::ClockStyle;

/// Countdown tick deltas requested by a global preset, in ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickDelta {
    pub normal: u64,
    pub secondary: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalPreset {
    pub name_id: String,
    pub clock_style: ClockStyle,
    pub timer_preset: String,
    pub tick_rate: TickDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presets {
    #[serde(default = "default_timer_presets")]
    pub timer: BTreeMap<String, BlockLengths>,
    #[serde(default = "default_global_presets")]
    pub global: BTreeMap<String, GlobalPreset>,
}

fn default_timer_presets() -> BTreeMap<String, BlockLengths> {
    let mut m = BTreeMap::new();
    m.insert("default".to_string(), BlockLengths::default());
    m.insert(
        "debug".to_string(),
        BlockLengths {
            work: 95 * 1000,
            shortpause: 8 * 1000,
            longpause: 12 * 1000,
        },
    );
    m
}

fn default_global_presets() -> BTreeMap<String, GlobalPreset> {
    let mut m = BTreeMap::new();
    m.insert(
        "traditional".to_string(),
        GlobalPreset {
            name_id: "traditional".to_string(),
            tick_rate: TickDelta {
                normal: 1000,
                secondary: 60_000,
            },
            clock_style: ClockStyle::Traditional,
            timer_preset: "default".to_string(),
        },
    );
    m.insert(
        "modern".to_string(),
        GlobalPreset {
            name_id: "modern".to_string(),
            tick_rate: TickDelta {
                normal: 60_000,
                secondary: 5 * 60_000,
            },
            clock_style: ClockStyle::Approximate,
            timer_preset: "default".to_string(),
        },
    );
    m
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            timer: default_timer_presets(),
            global: default_global_presets(),
        }
    }
}

impl Presets {
    pub fn timer_preset(&self, id: &str) -> Option<&BlockLengths> {
        self.timer.get(id)
    }

    pub fn global_preset(&self, id: &str) -> Option<&GlobalPreset> {
        self.global.get(id)
    }

    /// # Errors
    ///
    /// Rejects presets with zero lengths or tick rates, and global presets
    /// pointing at a timer preset that does not exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (id, lengths) in &self.timer {
            lengths
                .validate()
                .map_err(|e| ConfigError::invalid(&format!("presets.timer.{id}"), e.to_string()))?;
        }
        for (id, preset) in &self.global {
            let key = format!("presets.global.{id}");
            if preset.tick_rate.normal == 0 || preset.tick_rate.secondary == 0 {
                return Err(ConfigError::invalid(&key, "tick rates must be positive"));
            }
            if !self.timer.contains_key(&preset.timer_preset) {
                return Err(ConfigError::invalid(
                    &key,
                    format!("unknown timer preset '{}'", preset.timer_preset),
                ));
            }
        }
        Ok(())
    }
}
