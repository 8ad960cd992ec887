//! Validated, immutable configuration values consumed by the core.
//!
//! [`crate::Config`] is the serialized form; these types are what the
//! sequencer, queue and tick-rate controller actually read. Each field has a
//! named setter that validates only that field and leaves the value untouched
//! on error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schedule::BlockType;
use crate::tick_rate::ClockStyle;

pub const DEFAULT_WORK_MS: u64 = 25 * 60 * 1000;
pub const DEFAULT_SHORT_PAUSE_MS: u64 = 5 * 60 * 1000;
pub const DEFAULT_LONG_PAUSE_MS: u64 = 15 * 60 * 1000;
pub const DEFAULT_LONG_PAUSE_INTERVAL: u32 = 3;
pub const DEFAULT_TARGET_DEPTH: usize = 5;
/// Largest interval whose cycle (`2 * interval` blocks) still fits in a `u32`.
pub const MAX_LONG_PAUSE_INTERVAL: u32 = u32::MAX / 2;

/// Base length of each block type, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLengths {
    pub work: u64,
    pub shortpause: u64,
    pub longpause: u64,
}

impl BlockLengths {
    /// Configured length for `block_type`. `Wait` is never scheduled and has none.
    pub fn length_ms(&self, block_type: BlockType) -> u64 {
        match block_type {
            BlockType::Work => self.work,
            BlockType::ShortPause => self.shortpause,
            BlockType::LongPause => self.longpause,
            BlockType::Wait => 0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_length("lengths.work", self.work)?;
        check_length("lengths.shortpause", self.shortpause)?;
        check_length("lengths.longpause", self.longpause)?;
        Ok(())
    }
}

impl Default for BlockLengths {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK_MS,
            shortpause: DEFAULT_SHORT_PAUSE_MS,
            longpause: DEFAULT_LONG_PAUSE_MS,
        }
    }
}

fn check_length(key: &str, ms: u64) -> Result<(), ConfigError> {
    if ms == 0 {
        return Err(ConfigError::invalid(key, "block length must be positive"));
    }
    Ok(())
}

/// Parameters of the sequencer and the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSettings {
    lengths: BlockLengths,
    long_pause_interval: u32,
    target_depth: usize,
}

impl ScheduleSettings {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero length or depth, and
    /// for an interval outside `1..=MAX_LONG_PAUSE_INTERVAL`.
    pub fn new(
        lengths: BlockLengths,
        long_pause_interval: u32,
        target_depth: usize,
    ) -> Result<Self, ConfigError> {
        lengths.validate()?;
        check_interval(long_pause_interval)?;
        check_depth(target_depth)?;
        Ok(Self {
            lengths,
            long_pause_interval,
            target_depth,
        })
    }

    pub fn lengths(&self) -> &BlockLengths {
        &self.lengths
    }

    pub fn long_pause_interval(&self) -> u32 {
        self.long_pause_interval
    }

    pub fn target_depth(&self) -> usize {
        self.target_depth
    }

    /// Number of blocks in one full work/pause cycle.
    pub fn cycle_length(&self) -> u32 {
        2 * self.long_pause_interval
    }

    pub fn set_lengths(&mut self, lengths: BlockLengths) -> Result<(), ConfigError> {
        lengths.validate()?;
        self.lengths = lengths;
        Ok(())
    }

    pub fn set_work_length(&mut self, ms: u64) -> Result<(), ConfigError> {
        check_length("lengths.work", ms)?;
        self.lengths.work = ms;
        Ok(())
    }

    pub fn set_short_pause_length(&mut self, ms: u64) -> Result<(), ConfigError> {
        check_length("lengths.shortpause", ms)?;
        self.lengths.shortpause = ms;
        Ok(())
    }

    pub fn set_long_pause_length(&mut self, ms: u64) -> Result<(), ConfigError> {
        check_length("lengths.longpause", ms)?;
        self.lengths.longpause = ms;
        Ok(())
    }

    pub fn set_long_pause_interval(&mut self, interval: u32) -> Result<(), ConfigError> {
        check_interval(interval)?;
        self.long_pause_interval = interval;
        Ok(())
    }

    pub fn set_target_depth(&mut self, depth: usize) -> Result<(), ConfigError> {
        check_depth(depth)?;
        self.target_depth = depth;
        Ok(())
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            lengths: BlockLengths::default(),
            long_pause_interval: DEFAULT_LONG_PAUSE_INTERVAL,
            target_depth: DEFAULT_TARGET_DEPTH,
        }
    }
}

fn check_interval(interval: u32) -> Result<(), ConfigError> {
    if interval == 0 {
        return Err(ConfigError::invalid(
            "long_pause_interval",
            "must be at least 1",
        ));
    }
    if interval > MAX_LONG_PAUSE_INTERVAL {
        return Err(ConfigError::invalid(
            "long_pause_interval",
            format!("must be at most {MAX_LONG_PAUSE_INTERVAL}"),
        ));
    }
    Ok(())
}

fn check_depth(depth: usize) -> Result<(), ConfigError> {
    if depth == 0 {
        return Err(ConfigError::invalid("num_schedule_entries", "must be at least 1"));
    }
    Ok(())
}

/// Per-style tick multipliers. A missing factor means 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleMultiplier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<f64>,
}

impl StyleMultiplier {
    pub fn new(hidden: Option<f64>, visible: Option<f64>) -> Self {
        Self { hidden, visible }
    }
}

/// Adaptive ticking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveTicking {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base tick rate while the app is hidden, in ms.
    #[serde(default = "default_hidden_tick_rate")]
    pub hidden_tick_rate: u64,
    /// Base tick rate while the app is visible, in ms.
    #[serde(default = "default_visible_tick_rate")]
    pub visible_tick_rate: u64,
    /// Keyed by clock style identifier.
    #[serde(default = "default_multipliers")]
    pub multipliers: BTreeMap<String, StyleMultiplier>,
}

fn default_true() -> bool {
    true
}
fn default_hidden_tick_rate() -> u64 {
    60 * 1000
}
fn default_visible_tick_rate() -> u64 {
    1000
}
fn default_multipliers() -> BTreeMap<String, StyleMultiplier> {
    let mut m = BTreeMap::new();
    m.insert(
        ClockStyle::Traditional.as_str().to_string(),
        StyleMultiplier::new(Some(1.0 / 60.0), None),
    );
    m.insert(
        ClockStyle::Approximate.as_str().to_string(),
        StyleMultiplier::new(Some(5.0), Some(30.0)),
    );
    m.insert(
        ClockStyle::Percentage.as_str().to_string(),
        StyleMultiplier::new(Some(1.0 / 5.0), Some(2.0)),
    );
    m
}

impl Default for AdaptiveTicking {
    fn default() -> Self {
        Self {
            enabled: true,
            hidden_tick_rate: default_hidden_tick_rate(),
            visible_tick_rate: default_visible_tick_rate(),
            multipliers: default_multipliers(),
        }
    }
}

impl AdaptiveTicking {
    /// # Errors
    ///
    /// Rejects zero base rates, unknown style keys, and factors that are not
    /// finite and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hidden_tick_rate == 0 {
            return Err(ConfigError::invalid(
                "adaptive_ticking.hidden_tick_rate",
                "must be positive",
            ));
        }
        if self.visible_tick_rate == 0 {
            return Err(ConfigError::invalid(
                "adaptive_ticking.visible_tick_rate",
                "must be positive",
            ));
        }
        for (style, multiplier) in &self.multipliers {
            let key = format!("adaptive_ticking.multipliers.{style}");
            style
                .parse::<ClockStyle>()
                .map_err(|_| ConfigError::invalid(&key, "unknown clock style"))?;
            for factor in [multiplier.hidden, multiplier.visible].into_iter().flatten() {
                if !factor.is_finite() || factor <= 0.0 {
                    return Err(ConfigError::invalid(
                        &key,
                        format!("multiplier {factor} must be finite and positive"),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn multiplier_for(&self, style: ClockStyle) -> Option<&StyleMultiplier> {
        self.multipliers.get(style.as_str())
    }
}
