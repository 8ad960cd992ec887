use serde::{Deserialize, Serialize};
use tracing::debug;

use super::block::{resolve_block_type, ScheduleEntry, START_COMPENSATION_MS};
use crate::settings::ScheduleSettings;

/// Produces successive schedule entries.
///
/// Holds the position within the current cycle and the process-wide index
/// counter. Every call to [`next`](Self::next) consumes one index and one
/// cycle slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSequencer {
    cycle_position: u32,
    next_index: u64,
}

impl ScheduleSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle_position(&self) -> u32 {
        self.cycle_position
    }

    /// Index the next produced entry will carry.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Generate the next entry and advance the cycle.
    pub fn next(&mut self, settings: &ScheduleSettings) -> ScheduleEntry {
        let cycle_length = settings.cycle_length();
        // Interval may have shrunk since the last call.
        let position = self.cycle_position % cycle_length;

        let block_type = resolve_block_type(position, settings.long_pause_interval());
        let duration_ms = settings
            .lengths()
            .length_ms(block_type)
            .saturating_add(START_COMPENSATION_MS);

        let entry = ScheduleEntry::new(self.next_index, block_type, duration_ms);
        self.next_index += 1;
        self.cycle_position = (position + 1) % cycle_length;

        debug!(
            index = entry.index(),
            block_type = %block_type,
            duration_ms,
            cycle_position = self.cycle_position,
            "sequenced schedule entry"
        );
        entry
    }

    /// Step the cycle back by `count` slots, as if the last `count` entries
    /// had never been generated. Indices are not handed out again.
    pub(crate) fn rewind(&mut self, count: usize, settings: &ScheduleSettings) {
        let cycle_length = u64::from(settings.cycle_length());
        let position = u64::from(self.cycle_position) % cycle_length;
        let back = count as u64 % cycle_length;
        // Both operands are below cycle_length, which fits in a u32.
        self.cycle_position = ((position + cycle_length - back) % cycle_length) as u32;
        debug!(
            count,
            cycle_position = self.cycle_position,
            "rewound schedule sequencer"
        );
    }
}
