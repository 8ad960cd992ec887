use std::path::Path;

use cadence_core::{Config, ConfigKey};
use clap::Subcommand;

use super::{load_config, save_config};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "schedule.long_pause_interval", "clock_style")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List settable keys and their values
    Keys,
    /// Print the whole config as JSON
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config(config_path)?;
            let key: ConfigKey = key.parse()?;
            println!("{}", config.get(key));
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(config_path)?;
            let key: ConfigKey = key.parse()?;
            config.set(key, &value)?;
            save_config(&config, config_path)?;
            println!("ok");
        }
        ConfigAction::Keys => {
            let config = load_config(config_path)?;
            for key in ConfigKey::ALL {
                println!("{key} = {}", config.get(key));
            }
        }
        ConfigAction::List => {
            let config = load_config(config_path)?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            save_config(&Config::default(), config_path)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
