use std::path::Path;

use cadence_core::{Countdown, Event, ScheduleCore, ScheduleEntry, ScheduleSequencer};
use chrono::Utc;
use clap::Subcommand;
use serde::Serialize;

use super::load_config;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Print the first blocks the sequencer produces
    Preview {
        /// Number of blocks to generate
        #[arg(long, default_value = "6")]
        count: usize,
    },
    /// Initialize a schedule and advance it
    Simulate {
        /// Number of advances to perform
        #[arg(long, default_value = "1")]
        advances: usize,
        /// Treat advances as user skips instead of expired countdowns
        #[arg(long)]
        manual: bool,
        /// Record events even if logging is disabled in the config
        #[arg(long)]
        log_events: bool,
    },
}

/// Collects every countdown the core starts.
#[derive(Debug, Default)]
struct CollectingCountdown {
    started: Vec<ScheduleEntry>,
}

impl Countdown for CollectingCountdown {
    fn start(&mut self, entry: &ScheduleEntry) {
        self.started.push(entry.clone());
    }
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    started: &'a [ScheduleEntry],
    queue: Vec<&'a ScheduleEntry>,
    cycle_position: u32,
    events: Vec<Event>,
}

pub fn run(action: ScheduleAction, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    match action {
        ScheduleAction::Preview { count } => {
            let settings = config.schedule_settings()?;
            let mut sequencer = ScheduleSequencer::new();
            let entries: Vec<_> = (0..count).map(|_| sequencer.next(&settings)).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        ScheduleAction::Simulate {
            advances,
            manual,
            log_events,
        } => {
            let since = Utc::now();
            let mut core = ScheduleCore::from_config(&config, CollectingCountdown::default())?;
            if log_events {
                core.set_event_logging(true);
            }
            for _ in 0..advances {
                core.advance(!manual)?;
            }

            let report = SimulationReport {
                started: &core.countdown().started,
                queue: core.queue().entries().collect(),
                cycle_position: core.queue().cycle_position(),
                events: core.events_since(since),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
