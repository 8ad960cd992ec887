//! # Cadence Core Library
//!
//! This library provides the timing core of the Cadence interval timer:
//! what the next block of activity is, a lookahead queue of upcoming blocks,
//! an append-only event log, and how often the UI should refresh its
//! countdown. The countdown itself, rendering and visibility detection
//! belong to the host.
//!
//! ## Architecture
//!
//! - **Schedule**: a pure block type resolver, a sequencer holding the cycle
//!   position and index counter, and a queue kept at a target depth
//! - **Events**: chronological, append-only diagnostics log
//! - **Tick rate**: visibility- and style-dependent refresh interval
//! - **Storage**: TOML-based configuration with named, validated setters
//!
//! ## Key Components
//!
//! - [`ScheduleCore`]: Host facade tying the pieces together
//! - [`ScheduleQueue`]: Lookahead queue of [`ScheduleEntry`] values
//! - [`AdaptiveTickRateController`]: Refresh interval selection
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod presets;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod storage;
pub mod tick_rate;

pub use error::{ConfigError, CoreError, InvariantViolation};
pub use events::{Event, EventLog, EventType, UnknownEventType};
pub use presets::{GlobalPreset, Presets, TickDelta};
pub use schedule::{
    resolve_block_type, BlockType, ScheduleEntry, ScheduleQueue, ScheduleSequencer,
    START_COMPENSATION_MS,
};
pub use session::{Countdown, ScheduleCore};
pub use settings::{AdaptiveTicking, BlockLengths, ScheduleSettings, StyleMultiplier};
pub use storage::{Config, ConfigKey};
pub use tick_rate::{AdaptiveTickRateController, ClockStyle, Visibility};
