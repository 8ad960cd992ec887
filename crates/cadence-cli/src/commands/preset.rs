use std::path::Path;

use clap::Subcommand;
use serde_json::json;

use super::{load_config, save_config};

#[derive(Subcommand)]
pub enum PresetAction {
    /// List timer and global presets
    List,
    /// Apply a global preset, or a timer preset if no global one matches
    Apply {
        /// Preset id (e.g. "modern", "debug")
        id: String,
    },
}

pub fn run(action: PresetAction, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;

    match action {
        PresetAction::List => {
            println!("{}", serde_json::to_string_pretty(&config.presets)?);
        }
        PresetAction::Apply { id } => {
            let output = if let Some(preset) = config.apply_global_preset(&id) {
                json!({
                    "applied": "global",
                    "id": id,
                    "clock_style": preset.clock_style,
                    "tick_rate": preset.tick_rate,
                })
            } else if config.apply_timer_preset(&id) {
                json!({
                    "applied": "timer",
                    "id": id,
                    "lengths": config.schedule.lengths,
                })
            } else {
                return Err(format!("unknown preset: {id}").into());
            };
            save_config(&config, config_path)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
