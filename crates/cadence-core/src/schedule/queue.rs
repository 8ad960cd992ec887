use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::block::{BlockType, ScheduleEntry};
use super::sequencer::ScheduleSequencer;
use crate::error::{InvariantViolation, Result};
use crate::settings::ScheduleSettings;

/// Bounded lookahead of upcoming blocks. The front entry is the active one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleQueue {
    entries: VecDeque<ScheduleEntry>,
    sequencer: ScheduleSequencer,
    /// Index of the last entry ever enqueued, kept across pops.
    last_index: Option<u64>,
}

impl ScheduleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The active entry, or `None` before the first fill.
    pub fn current(&self) -> Option<&ScheduleEntry> {
        self.entries.front()
    }

    /// The entry that follows the active one.
    pub fn next(&self) -> Option<&ScheduleEntry> {
        self.entries.get(1)
    }

    /// Block type to present for the active slot; `Wait` before the first fill.
    pub fn current_block_type(&self) -> BlockType {
        self.current().map_or(BlockType::Wait, |e| e.block_type())
    }

    pub fn entries(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cycle_position(&self) -> u32 {
        self.sequencer.cycle_position()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Bring the queue to exactly `settings.target_depth()` entries.
    ///
    /// After a lowered depth the surplus tail is dropped and the cycle is
    /// stepped back over it, so the block pattern continues from the last
    /// kept entry. Dropped indices are never reused.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::NonMonotonicIndex`] if the sequencer
    /// hands out an index that does not follow the previous one. The
    /// offending entry is not enqueued.
    pub fn ensure_depth(&mut self, settings: &ScheduleSettings) -> Result<()> {
        let target = settings.target_depth();
        if self.entries.len() > target {
            let dropped = self.entries.len() - target;
            self.entries.truncate(target);
            self.sequencer.rewind(dropped, settings);
        }
        while self.entries.len() < settings.target_depth() {
            let entry = self.sequencer.next(settings);
            if let Some(previous) = self.last_index {
                if entry.index() <= previous {
                    return Err(InvariantViolation::NonMonotonicIndex {
                        previous,
                        got: entry.index(),
                    }
                    .into());
                }
            }
            self.last_index = Some(entry.index());
            self.entries.push_back(entry);
        }
        Ok(())
    }

    /// Drop the active entry, refill, and return the new active entry.
    ///
    /// # Errors
    ///
    /// Fails with [`InvariantViolation::EmptyQueue`] when nothing is queued;
    /// the queue is left untouched in that case.
    pub fn advance(&mut self, settings: &ScheduleSettings) -> Result<&ScheduleEntry> {
        if self.entries.pop_front().is_none() {
            return Err(InvariantViolation::EmptyQueue.into());
        }
        self.ensure_depth(settings)?;
        self.entries
            .front()
            .ok_or_else(|| InvariantViolation::EmptyQueue.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::settings::BlockLengths;

    fn settings(depth: usize) -> ScheduleSettings {
        ScheduleSettings::new(BlockLengths::default(), 3, depth).unwrap()
    }

    #[test]
    fn fills_to_target_depth() {
        let mut q = ScheduleQueue::new();
        assert!(q.current().is_none());
        assert_eq!(q.current_block_type(), BlockType::Wait);
        q.ensure_depth(&settings(5)).unwrap();
        assert_eq!(q.current_block_type(), BlockType::Work);
        assert_eq!(q.len(), 5);
        assert_eq!(q.cycle_position(), 5);
        assert_eq!(q.current().unwrap().index(), 0);
        assert_eq!(q.next().unwrap().index(), 1);
    }

    #[test]
    fn advance_refills_and_exposes_next_front() {
        let s = settings(5);
        let mut q = ScheduleQueue::new();
        q.ensure_depth(&s).unwrap();

        let front = q.advance(&s).unwrap().index();
        assert_eq!(front, 1);
        assert_eq!(q.len(), 5);
        assert_eq!(q.entries().last().unwrap().index(), 5);
    }

    #[test]
    fn advance_on_empty_queue_fails_fast() {
        let mut q = ScheduleQueue::new();
        let err = q.advance(&settings(5)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Invariant(InvariantViolation::EmptyQueue)
        ));
        assert!(q.is_empty());
        assert_eq!(q.cycle_position(), 0);
    }

    #[test]
    fn depth_change_resizes_queue_on_next_advance() {
        let mut q = ScheduleQueue::new();
        q.ensure_depth(&settings(5)).unwrap();

        let shallow = settings(2);
        q.advance(&shallow).unwrap();
        assert_eq!(q.len(), 2);
        let kept: Vec<_> = q.entries().map(|e| e.index()).collect();
        assert_eq!(kept, vec![1, 2]);
        // Slots 3 and 4 were handed back; position 3 comes next.
        assert_eq!(q.cycle_position(), 3);

        let deep = settings(7);
        q.advance(&deep).unwrap();
        assert_eq!(q.len(), 7);
        let indices: Vec<_> = q.entries().map(|e| e.index()).collect();
        assert_eq!(indices, vec![2, 5, 6, 7, 8, 9, 10]);
        let types: Vec<_> = q.entries().map(|e| e.block_type()).collect();
        assert_eq!(
            types,
            vec![
                BlockType::Work,
                BlockType::ShortPause,
                BlockType::Work,
                BlockType::LongPause,
                BlockType::Work,
                BlockType::ShortPause,
                BlockType::Work,
            ]
        );
    }

    #[test]
    fn shrinking_without_advance_trims_tail() {
        let mut q = ScheduleQueue::new();
        q.ensure_depth(&settings(5)).unwrap();
        q.ensure_depth(&settings(1)).unwrap();
        assert_eq!(q.len(), 1);
        assert_eq!(q.current().unwrap().index(), 0);
        assert_eq!(q.cycle_position(), 1);

        q.ensure_depth(&settings(2)).unwrap();
        let next = q.next().unwrap();
        assert_eq!(next.index(), 5);
        assert_eq!(next.block_type(), BlockType::ShortPause);
    }

    #[test]
    fn queued_entries_keep_their_lengths_after_settings_change() {
        let mut q = ScheduleQueue::new();
        q.ensure_depth(&settings(3)).unwrap();
        let queued: Vec<_> = q.entries().cloned().collect();

        let mut changed = settings(3);
        changed.set_work_length(60_000).unwrap();
        q.advance(&changed).unwrap();

        let after: Vec<_> = q.entries().take(2).cloned().collect();
        assert_eq!(after, queued[1..].to_vec());
    }
}
