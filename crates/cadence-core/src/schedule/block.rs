use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Added to every block length so the countdown's first tick, which
/// discounts a partially elapsed tick interval, does not visibly skip a second.
pub const START_COMPENSATION_MS: u64 = 900;

/// Kind of block in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Work,
    ShortPause,
    LongPause,
    /// Presentation default before any schedule exists. Never scheduled.
    Wait,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Work => "work",
            BlockType::ShortPause => "shortpause",
            BlockType::LongPause => "longpause",
            BlockType::Wait => "wait",
        }
    }

    pub fn is_pause(&self) -> bool {
        matches!(self, BlockType::ShortPause | BlockType::LongPause)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(BlockType::Work),
            "shortpause" => Ok(BlockType::ShortPause),
            "longpause" => Ok(BlockType::LongPause),
            "wait" => Ok(BlockType::Wait),
            other => Err(ConfigError::invalid("block_type", format!("unknown block type '{other}'"))),
        }
    }
}

/// Map a position within the cycle to the block scheduled there.
///
/// A cycle is `2 * long_pause_interval` blocks long: work and short pauses
/// alternate, and the last slot is the long pause. Callers must pass a
/// validated interval (`> 0`).
pub fn resolve_block_type(cycle_position: u32, long_pause_interval: u32) -> BlockType {
    let cycle_length = 2 * u64::from(long_pause_interval);
    if u64::from(cycle_position) + 1 == cycle_length {
        BlockType::LongPause
    } else if cycle_position % 2 == 1 {
        BlockType::ShortPause
    } else {
        BlockType::Work
    }
}

/// One block in the queue. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    index: u64,
    block_type: BlockType,
    duration_ms: u64,
}

impl ScheduleEntry {
    pub(crate) fn new(index: u64, block_type: BlockType, duration_ms: u64) -> Self {
        Self {
            index,
            block_type,
            duration_ms,
        }
    }

    /// Process-wide sequence number, never reused.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// Countdown length in milliseconds, compensation included.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}
