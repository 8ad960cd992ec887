//! Adaptive tick rate selection.
//!
//! Decides how often the presentation layer should refresh the visible
//! countdown. The rate depends on whether the app is visible and on the
//! active clock style: a coarse display (e.g. "about 20 minutes left") can
//! refresh far less often than a seconds-accurate one, especially while
//! hidden.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::settings::AdaptiveTicking;

/// Display style of the countdown. Keys the multiplier table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockStyle {
    Traditional,
    #[default]
    Approximate,
    Percentage,
}

impl ClockStyle {
    pub const ALL: [ClockStyle; 3] = [
        ClockStyle::Traditional,
        ClockStyle::Approximate,
        ClockStyle::Percentage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClockStyle::Traditional => "traditional",
            ClockStyle::Approximate => "approximate",
            ClockStyle::Percentage => "percentage",
        }
    }
}

impl fmt::Display for ClockStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClockStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClockStyle::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConfigError::invalid("clock_style", format!("unknown clock style '{s}'")))
    }
}

/// Last reported visibility of the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// No notification received yet.
    #[default]
    Unknown,
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Default)]
pub struct AdaptiveTickRateController {
    ticking: AdaptiveTicking,
    visibility: Visibility,
    style: ClockStyle,
}

impl AdaptiveTickRateController {
    pub fn new(ticking: AdaptiveTicking, style: ClockStyle) -> Self {
        Self {
            ticking,
            visibility: Visibility::Unknown,
            style,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn style(&self) -> ClockStyle {
        self.style
    }

    pub fn is_enabled(&self) -> bool {
        self.ticking.enabled
    }

    pub fn settings(&self) -> &AdaptiveTicking {
        &self.ticking
    }

    /// Record a visibility notification. Repeating the same value is a no-op.
    pub fn on_visibility_change(&mut self, hidden: bool) {
        let next = if hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
        if self.visibility != next {
            debug!(from = ?self.visibility, to = ?next, "visibility changed");
            self.visibility = next;
        }
    }

    pub fn set_display_style(&mut self, style: ClockStyle) {
        self.style = style;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.ticking.enabled = enabled;
    }

    /// Replace rates and multipliers. Visibility is kept.
    pub fn apply_settings(&mut self, ticking: AdaptiveTicking) {
        self.ticking = ticking;
    }

    /// Refresh interval in milliseconds.
    ///
    /// Falls back to the visible base rate while disabled or before the
    /// first visibility notification. A style without an entry, or an entry
    /// without a factor for the current visibility, uses a factor of 1.0.
    pub fn current_tick_rate(&self) -> u64 {
        let hidden = match self.visibility {
            _ if !self.ticking.enabled => return self.ticking.visible_tick_rate,
            Visibility::Unknown => return self.ticking.visible_tick_rate,
            Visibility::Hidden => true,
            Visibility::Visible => false,
        };

        let (base, factor) = match self.ticking.multiplier_for(self.style) {
            Some(m) if hidden => (self.ticking.hidden_tick_rate, m.hidden),
            Some(m) => (self.ticking.visible_tick_rate, m.visible),
            None if hidden => (self.ticking.hidden_tick_rate, None),
            None => (self.ticking.visible_tick_rate, None),
        };
        let rate = base as f64 * factor.unwrap_or(1.0);
        (rate.round() as u64).max(1)
    }
}
