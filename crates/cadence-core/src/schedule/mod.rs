//! Schedule sequencing: block types, the sequencer and the lookahead queue.

mod block;
mod queue;
mod sequencer;

pub use block::{resolve_block_type, BlockType, ScheduleEntry, START_COMPENSATION_MS};
pub use queue::ScheduleQueue;
pub use sequencer::ScheduleSequencer;
