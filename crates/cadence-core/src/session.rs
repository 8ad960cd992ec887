//! Host-facing schedule core.
//!
//! [`ScheduleCore`] owns the queue, the event log and the tick-rate
//! controller, and hands each new active block to the host's
//! [`Countdown`]. It does no I/O and never blocks; every method runs to
//! completion before returning, so pop and refill are never observed apart.
//!
//! ## Usage
//!
//! ```ignore
//! let mut core = ScheduleCore::from_config(&config, countdown)?;
//! // countdown expired:
//! core.advance(true)?;
//! // user pressed "skip":
//! core.advance(false)?;
//! ```

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::Result;
use crate::events::{Event, EventLog, EventType};
use crate::presets::{GlobalPreset, Presets};
use crate::schedule::{ScheduleEntry, ScheduleQueue};
use crate::settings::{AdaptiveTicking, ScheduleSettings};
use crate::storage::Config;
use crate::tick_rate::{AdaptiveTickRateController, ClockStyle, Visibility};

/// The host's countdown primitive.
///
/// `start` is fire-and-forget: the host calls [`ScheduleCore::advance`]
/// with `is_automatic = true` once the countdown expires.
pub trait Countdown {
    fn start(&mut self, entry: &ScheduleEntry);
}

/// Schedule sequencing, event logging and tick-rate selection for one user.
#[derive(Debug)]
pub struct ScheduleCore<C: Countdown> {
    settings: ScheduleSettings,
    queue: ScheduleQueue,
    log: EventLog,
    ticker: AdaptiveTickRateController,
    presets: Presets,
    event_logging: bool,
    countdown: C,
}

impl<C: Countdown> ScheduleCore<C> {
    /// Store `settings` and fill the queue to its target depth.
    ///
    /// No countdown is started; the host reads [`current`](Self::current)
    /// and starts the first block when it is ready.
    pub fn initialize_schedule(settings: ScheduleSettings, countdown: C) -> Result<Self> {
        let mut queue = ScheduleQueue::new();
        queue.ensure_depth(&settings)?;
        info!(
            depth = settings.target_depth(),
            long_pause_interval = settings.long_pause_interval(),
            "schedule initialized"
        );
        Ok(Self {
            settings,
            queue,
            log: EventLog::new(),
            ticker: AdaptiveTickRateController::default(),
            presets: Presets::default(),
            event_logging: false,
            countdown,
        })
    }

    /// Build from a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Refuses to initialize when any config section fails validation.
    pub fn from_config(config: &Config, countdown: C) -> Result<Self> {
        config.validate()?;
        let core = Self::initialize_schedule(config.schedule_settings()?, countdown)?
            .with_adaptive_ticking(config.adaptive_ticking.clone(), config.clock_style)?
            .with_presets(config.presets.clone())?
            .with_event_logging(config.event_logging_enabled);
        Ok(core)
    }

    /// # Errors
    ///
    /// Rejects zero base rates, unknown styles and non-positive factors.
    pub fn with_adaptive_ticking(
        mut self,
        ticking: AdaptiveTicking,
        style: ClockStyle,
    ) -> Result<Self> {
        ticking.validate()?;
        self.ticker = AdaptiveTickRateController::new(ticking, style);
        Ok(self)
    }

    /// # Errors
    ///
    /// Rejects zero lengths or tick rates and dangling timer preset references.
    pub fn with_presets(mut self, presets: Presets) -> Result<Self> {
        presets.validate()?;
        self.presets = presets;
        Ok(self)
    }

    pub fn with_event_logging(mut self, enabled: bool) -> Self {
        self.event_logging = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current(&self) -> Option<&ScheduleEntry> {
        self.queue.current()
    }

    /// The block after the active one.
    pub fn upcoming(&self) -> Option<&ScheduleEntry> {
        self.queue.next()
    }

    pub fn queue(&self) -> &ScheduleQueue {
        &self.queue
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Events recorded at or after `since`, oldest first.
    pub fn events_since(&self, since: DateTime<Utc>) -> Vec<Event> {
        self.log.events_since(since)
    }

    pub fn event_logging_enabled(&self) -> bool {
        self.event_logging
    }

    pub fn current_tick_rate(&self) -> u64 {
        self.ticker.current_tick_rate()
    }

    pub fn visibility(&self) -> Visibility {
        self.ticker.visibility()
    }

    pub fn clock_style(&self) -> ClockStyle {
        self.ticker.style()
    }

    pub fn countdown(&self) -> &C {
        &self.countdown
    }

    pub fn countdown_mut(&mut self) -> &mut C {
        &mut self.countdown
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Finish the active block and start the next one.
    ///
    /// Pops the front entry, refills the queue, starts the countdown for the
    /// new front entry and, when logging is enabled, records
    /// `schedule.advauto` or `schedule.advmanual`.
    ///
    /// # Errors
    ///
    /// Fails fast on an empty queue without touching the countdown or log.
    pub fn advance(&mut self, is_automatic: bool) -> Result<ScheduleEntry> {
        let entry = self.queue.advance(&self.settings)?.clone();
        self.countdown.start(&entry);
        if self.event_logging {
            self.log.append(EventType::schedule_advance(is_automatic));
        }
        info!(
            index = entry.index(),
            block_type = %entry.block_type(),
            duration_ms = entry.duration_ms(),
            automatic = is_automatic,
            "schedule advanced"
        );
        Ok(entry)
    }

    /// Record a host event, subject to the logging switch.
    ///
    /// Returns whether the event was appended.
    pub fn record_event(&mut self, event_type: EventType) -> bool {
        if !self.event_logging {
            return false;
        }
        self.log.append(event_type);
        true
    }

    /// Like [`record_event`](Self::record_event) for a wire identifier.
    /// Unknown identifiers are ignored.
    pub fn record_event_named(&mut self, id: &str) -> bool {
        match id.parse::<EventType>() {
            Ok(event_type) => self.record_event(event_type),
            Err(e) => {
                warn!(error = %e, "ignoring event");
                false
            }
        }
    }

    pub fn set_event_logging(&mut self, enabled: bool) {
        self.event_logging = enabled;
    }

    pub fn on_visibility_change(&mut self, hidden: bool) {
        self.ticker.on_visibility_change(hidden);
    }

    /// Switch the clock style by identifier. Unknown identifiers are ignored.
    pub fn set_display_style(&mut self, style_id: &str) -> bool {
        match style_id.parse::<ClockStyle>() {
            Ok(style) => {
                self.ticker.set_display_style(style);
                true
            }
            Err(_) => {
                warn!(style = style_id, "ignoring unknown clock style");
                false
            }
        }
    }

    pub fn set_adaptive_ticking_enabled(&mut self, enabled: bool) {
        self.ticker.set_enabled(enabled);
    }

    /// Replace the schedule parameters and resize the queue to the new
    /// depth. Entries that stay queued keep the lengths they were created
    /// with.
    ///
    /// # Errors
    ///
    /// Propagates an index invariant violation from the refill.
    pub fn update_schedule_settings(&mut self, settings: ScheduleSettings) -> Result<()> {
        self.settings = settings;
        self.queue.ensure_depth(&self.settings)
    }

    /// Use a named timer preset's lengths for future entries.
    /// Unknown ids are ignored.
    pub fn apply_timer_preset(&mut self, id: &str) -> bool {
        let Some(lengths) = self.presets.timer_preset(id).copied() else {
            warn!(preset = id, "ignoring unknown timer preset");
            return false;
        };
        if let Err(e) = self.settings.set_lengths(lengths) {
            warn!(preset = id, error = %e, "ignoring invalid timer preset");
            return false;
        }
        info!(preset = id, "timer preset applied");
        true
    }

    /// Apply a global preset's clock style and timer preset.
    ///
    /// Returns the preset so the host can adopt its countdown tick rate, or
    /// `None` and no change for an unknown id or a missing timer preset.
    pub fn apply_global_preset(&mut self, id: &str) -> Option<GlobalPreset> {
        let Some(preset) = self.presets.global_preset(id).cloned() else {
            warn!(preset = id, "ignoring unknown global preset");
            return None;
        };
        if self.presets.timer_preset(&preset.timer_preset).is_none() {
            warn!(
                preset = id,
                timer_preset = %preset.timer_preset,
                "ignoring global preset with unknown timer preset"
            );
            return None;
        }
        if !self.apply_timer_preset(&preset.timer_preset) {
            return None;
        }
        self.ticker.set_display_style(preset.clock_style);
        info!(preset = id, "global preset applied");
        Some(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::schedule::BlockType;
    use crate::settings::{BlockLengths, StyleMultiplier};

    #[derive(Debug, Default)]
    struct RecordingCountdown {
        started: Vec<u64>,
    }

    impl Countdown for RecordingCountdown {
        fn start(&mut self, entry: &ScheduleEntry) {
            self.started.push(entry.duration_ms());
        }
    }

    fn core() -> ScheduleCore<RecordingCountdown> {
        ScheduleCore::initialize_schedule(ScheduleSettings::default(), RecordingCountdown::default())
            .unwrap()
    }

    #[test]
    fn initialize_fills_queue_without_starting_countdown() {
        let c = core();
        assert_eq!(c.queue().len(), 5);
        assert_eq!(c.queue().cycle_position(), 5);
        assert_eq!(c.current().unwrap().index(), 0);
        assert_eq!(c.upcoming().unwrap().block_type(), BlockType::ShortPause);
        assert!(c.countdown().started.is_empty());
    }

    #[test]
    fn advance_starts_countdown_for_new_front() {
        let mut c = core();
        let entry = c.advance(true).unwrap();
        assert_eq!(entry.index(), 1);
        assert_eq!(c.countdown().started, vec![5 * 60 * 1000 + 900]);
        assert_eq!(c.queue().len(), 5);
    }

    #[test]
    fn advance_logs_only_when_enabled() {
        let mut c = core();
        c.advance(true).unwrap();
        assert!(c.event_log().is_empty());

        c.set_event_logging(true);
        c.advance(true).unwrap();
        c.advance(false).unwrap();
        let types: Vec<_> = c.event_log().iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![EventType::ScheduleAdvanceAuto, EventType::ScheduleAdvanceManual]
        );
        assert_eq!(c.current().unwrap().index(), 3);
    }

    #[test]
    fn named_events_ignore_unknown_ids() {
        let mut c = core().with_event_logging(true);
        assert!(c.record_event_named("focus.lost"));
        assert!(!c.record_event_named("focus.teleport"));
        assert_eq!(c.event_log().len(), 1);

        c.set_event_logging(false);
        assert!(!c.record_event(EventType::FocusGain));
        assert_eq!(c.event_log().len(), 1);
    }

    #[test]
    fn display_style_switch_ignores_unknown_ids() {
        let mut c = core();
        c.on_visibility_change(true);
        assert_eq!(c.current_tick_rate(), 300_000);

        assert!(c.set_display_style("percentage"));
        assert_eq!(c.current_tick_rate(), 12_000);

        assert!(!c.set_display_style("sundial"));
        assert_eq!(c.clock_style(), ClockStyle::Percentage);
    }

    #[test]
    fn timer_preset_affects_future_entries_only() {
        let mut c = core();
        assert!(c.apply_timer_preset("debug"));
        assert!(!c.apply_timer_preset("turbo"));
        assert_eq!(c.settings().lengths().work, 95_000);

        // Entries 0..=4 were queued with the default lengths.
        let queued: Vec<_> = c.queue().entries().map(|e| e.duration_ms()).collect();
        assert_eq!(queued[0], 25 * 60 * 1000 + 900);

        c.advance(false).unwrap();
        let tail = c.queue().entries().last().unwrap();
        assert_eq!(tail.index(), 5);
        assert_eq!(tail.block_type(), BlockType::LongPause);
        assert_eq!(tail.duration_ms(), 12_000 + 900);
    }

    #[test]
    fn global_preset_switches_style_and_lengths() {
        let mut c = core();
        let preset = c.apply_global_preset("traditional").unwrap();
        assert_eq!(preset.tick_rate.normal, 1000);
        assert_eq!(c.clock_style(), ClockStyle::Traditional);
        assert!(c.apply_global_preset("retro").is_none());
        assert_eq!(c.clock_style(), ClockStyle::Traditional);
    }

    #[test]
    fn global_preset_with_missing_timer_preset_is_refused() {
        let mut c = core();
        c.presets
            .global
            .get_mut("traditional")
            .unwrap()
            .timer_preset = "turbo".into();
        assert!(c.apply_global_preset("traditional").is_none());
        assert_eq!(c.clock_style(), ClockStyle::Approximate);
        assert_eq!(c.settings().lengths(), &BlockLengths::default());
    }

    #[test]
    fn lowered_depth_shrinks_queue() {
        let mut c = core();
        let mut shallow = c.settings().clone();
        shallow.set_target_depth(2).unwrap();
        c.update_schedule_settings(shallow).unwrap();
        assert_eq!(c.queue().len(), 2);

        c.advance(true).unwrap();
        assert_eq!(c.queue().len(), 2);
        assert!(c.queue().len() <= c.settings().target_depth());
        let indices: Vec<_> = c.queue().entries().map(|e| e.index()).collect();
        assert_eq!(indices, vec![1, 5]);
        assert_eq!(c.upcoming().unwrap().block_type(), BlockType::Work);
    }

    #[test]
    fn builders_validate_their_input() {
        let mut ticking = AdaptiveTicking::default();
        ticking
            .multipliers
            .insert("traditional".into(), StyleMultiplier::new(Some(-1.0), None));
        let err = core()
            .with_adaptive_ticking(ticking, ClockStyle::Traditional)
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));

        let mut presets = Presets::default();
        presets.global.get_mut("modern").unwrap().timer_preset = "turbo".into();
        assert!(core().with_presets(presets).is_err());

        assert!(core().with_presets(Presets::default()).is_ok());
    }

    #[test]
    fn from_config_refuses_invalid_config() {
        let mut config = Config::default();
        config.schedule.lengths = BlockLengths {
            work: 0,
            ..BlockLengths::default()
        };
        let err = ScheduleCore::from_config(&config, RecordingCountdown::default()).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn from_config_carries_logging_and_style() {
        let config = Config {
            event_logging_enabled: true,
            clock_style: ClockStyle::Traditional,
            ..Config::default()
        };
        let c = ScheduleCore::from_config(&config, RecordingCountdown::default()).unwrap();
        assert!(c.event_logging_enabled());
        assert_eq!(c.clock_style(), ClockStyle::Traditional);
        assert_eq!(c.visibility(), Visibility::Unknown);
    }
}
