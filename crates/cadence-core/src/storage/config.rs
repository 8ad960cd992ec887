//! TOML-based application configuration.
//!
//! Stores:
//! - Block lengths, long pause interval and lookahead depth
//! - Adaptive ticking rates and per-style multipliers
//! - Clock style and event logging switch
//! - Timer and global presets
//!
//! Configuration is stored at `~/.config/cadence/config.toml`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::presets::{GlobalPreset, Presets};
use crate::settings::{
    AdaptiveTicking, BlockLengths, ScheduleSettings, DEFAULT_LONG_PAUSE_INTERVAL,
    DEFAULT_TARGET_DEPTH,
};
use crate::tick_rate::ClockStyle;

/// Schedule-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_long_pause_interval")]
    pub long_pause_interval: u32,
    #[serde(default = "default_num_schedule_entries")]
    pub num_schedule_entries: usize,
    /// Block lengths in milliseconds.
    #[serde(default)]
    pub lengths: BlockLengths,
}

fn default_long_pause_interval() -> u32 {
    DEFAULT_LONG_PAUSE_INTERVAL
}
fn default_num_schedule_entries() -> usize {
    DEFAULT_TARGET_DEPTH
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            lengths: BlockLengths::default(),
            long_pause_interval: default_long_pause_interval(),
            num_schedule_entries: default_num_schedule_entries(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cadence/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub event_logging_enabled: bool,
    #[serde(default)]
    pub clock_style: ClockStyle,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub adaptive_ticking: AdaptiveTicking,
    #[serde(default)]
    pub presets: Presets,
}

/// Settable configuration keys. Each maps onto one validated setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    WorkLength,
    ShortPauseLength,
    LongPauseLength,
    LongPauseInterval,
    NumScheduleEntries,
    EventLoggingEnabled,
    ClockStyle,
    AdaptiveTickingEnabled,
    HiddenTickRate,
    VisibleTickRate,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 10] = [
        ConfigKey::WorkLength,
        ConfigKey::ShortPauseLength,
        ConfigKey::LongPauseLength,
        ConfigKey::LongPauseInterval,
        ConfigKey::NumScheduleEntries,
        ConfigKey::EventLoggingEnabled,
        ConfigKey::ClockStyle,
        ConfigKey::AdaptiveTickingEnabled,
        ConfigKey::HiddenTickRate,
        ConfigKey::VisibleTickRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::WorkLength => "schedule.lengths.work",
            ConfigKey::ShortPauseLength => "schedule.lengths.shortpause",
            ConfigKey::LongPauseLength => "schedule.lengths.longpause",
            ConfigKey::LongPauseInterval => "schedule.long_pause_interval",
            ConfigKey::NumScheduleEntries => "schedule.num_schedule_entries",
            ConfigKey::EventLoggingEnabled => "event_logging_enabled",
            ConfigKey::ClockStyle => "clock_style",
            ConfigKey::AdaptiveTickingEnabled => "adaptive_ticking.enabled",
            ConfigKey::HiddenTickRate => "adaptive_ticking.hidden_tick_rate",
            ConfigKey::VisibleTickRate => "adaptive_ticking.visible_tick_rate",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_value<T: FromStr>(key: ConfigKey, value: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::invalid(key.as_str(), format!("cannot parse '{value}': {e}")))
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing the defaults there if no
    /// file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// validated, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            info!(path = %path.display(), "wrote default configuration");
            Ok(cfg)
        }
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Check every section. Startup must refuse a config that fails here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schedule_settings()?;
        self.adaptive_ticking.validate()?;
        self.presets.validate()?;
        Ok(())
    }

    /// The validated sequencer/queue parameters.
    pub fn schedule_settings(&self) -> Result<ScheduleSettings, ConfigError> {
        ScheduleSettings::new(
            self.schedule.lengths,
            self.schedule.long_pause_interval,
            self.schedule.num_schedule_entries,
        )
    }

    fn store_schedule(&mut self, settings: &ScheduleSettings) {
        self.schedule.lengths = *settings.lengths();
        self.schedule.long_pause_interval = settings.long_pause_interval();
        self.schedule.num_schedule_entries = settings.target_depth();
    }

    /// Current value of a named key, rendered as a string.
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::WorkLength => self.schedule.lengths.work.to_string(),
            ConfigKey::ShortPauseLength => self.schedule.lengths.shortpause.to_string(),
            ConfigKey::LongPauseLength => self.schedule.lengths.longpause.to_string(),
            ConfigKey::LongPauseInterval => self.schedule.long_pause_interval.to_string(),
            ConfigKey::NumScheduleEntries => self.schedule.num_schedule_entries.to_string(),
            ConfigKey::EventLoggingEnabled => self.event_logging_enabled.to_string(),
            ConfigKey::ClockStyle => self.clock_style.to_string(),
            ConfigKey::AdaptiveTickingEnabled => self.adaptive_ticking.enabled.to_string(),
            ConfigKey::HiddenTickRate => self.adaptive_ticking.hidden_tick_rate.to_string(),
            ConfigKey::VisibleTickRate => self.adaptive_ticking.visible_tick_rate.to_string(),
        }
    }

    /// Parse `value` and apply it through the key's setter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the value does not parse or
    /// fails validation; the config is unchanged in that case.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        match key {
            ConfigKey::WorkLength
            | ConfigKey::ShortPauseLength
            | ConfigKey::LongPauseLength
            | ConfigKey::LongPauseInterval
            | ConfigKey::NumScheduleEntries => {
                let mut settings = self.schedule_settings()?;
                match key {
                    ConfigKey::WorkLength => settings.set_work_length(parse_value(key, value)?)?,
                    ConfigKey::ShortPauseLength => {
                        settings.set_short_pause_length(parse_value(key, value)?)?
                    }
                    ConfigKey::LongPauseLength => {
                        settings.set_long_pause_length(parse_value(key, value)?)?
                    }
                    ConfigKey::LongPauseInterval => {
                        settings.set_long_pause_interval(parse_value(key, value)?)?
                    }
                    _ => settings.set_target_depth(parse_value(key, value)?)?,
                }
                self.store_schedule(&settings);
            }
            ConfigKey::EventLoggingEnabled => self.event_logging_enabled = parse_value(key, value)?,
            ConfigKey::ClockStyle => self.clock_style = value.trim().parse()?,
            ConfigKey::AdaptiveTickingEnabled => {
                self.adaptive_ticking.enabled = parse_value(key, value)?
            }
            ConfigKey::HiddenTickRate | ConfigKey::VisibleTickRate => {
                let rate: u64 = parse_value(key, value)?;
                if rate == 0 {
                    return Err(ConfigError::invalid(key.as_str(), "must be positive"));
                }
                if key == ConfigKey::HiddenTickRate {
                    self.adaptive_ticking.hidden_tick_rate = rate;
                } else {
                    self.adaptive_ticking.visible_tick_rate = rate;
                }
            }
        }
        Ok(())
    }

    /// Replace the block lengths with a named timer preset.
    ///
    /// Returns `false` and changes nothing for an unknown id.
    pub fn apply_timer_preset(&mut self, id: &str) -> bool {
        match self.presets.timer_preset(id) {
            Some(lengths) => {
                self.schedule.lengths = *lengths;
                true
            }
            None => false,
        }
    }

    /// Apply a global preset's clock style and timer preset.
    ///
    /// Returns the preset so the caller can adopt its countdown tick rate,
    /// or `None` (and no change) for an unknown id or one whose timer
    /// preset is missing.
    pub fn apply_global_preset(&mut self, id: &str) -> Option<GlobalPreset> {
        let preset = self.presets.global_preset(id).cloned()?;
        let lengths = *self.presets.timer_preset(&preset.timer_preset)?;
        self.clock_style = preset.clock_style;
        self.schedule.lengths = lengths;
        Some(preset)
    }
}
