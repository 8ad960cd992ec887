pub mod config;
pub mod preset;
pub mod schedule;
pub mod tick_rate;

use std::path::Path;

use cadence_core::Config;

/// Load the config at `path`, or the default location when none is given.
/// A missing file at an explicit path yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(p) if p.exists() => Ok(Config::load_from(p)?),
        Some(_) => Ok(Config::default()),
        None => Ok(Config::load()?),
    }
}

pub fn save_config(config: &Config, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => config.save_to(p)?,
        None => config.save()?,
    }
    Ok(())
}
