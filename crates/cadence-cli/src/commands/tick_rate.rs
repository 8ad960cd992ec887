use std::path::Path;

use cadence_core::{AdaptiveTickRateController, ClockStyle, Visibility};
use clap::Args;
use serde::Serialize;

use super::load_config;

#[derive(Args)]
pub struct TickRateArgs {
    /// The app is hidden
    #[arg(long, conflicts_with = "visible")]
    hidden: bool,
    /// The app is visible
    #[arg(long)]
    visible: bool,
    /// Clock style to evaluate instead of the configured one
    #[arg(long)]
    style: Option<String>,
    /// Evaluate with adaptive ticking switched off
    #[arg(long)]
    disabled: bool,
}

#[derive(Serialize)]
struct TickRateReport {
    tick_rate_ms: u64,
    visibility: Visibility,
    clock_style: ClockStyle,
    adaptive: bool,
}

pub fn run(args: TickRateArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    config.adaptive_ticking.validate()?;

    let mut controller =
        AdaptiveTickRateController::new(config.adaptive_ticking.clone(), config.clock_style);
    if let Some(style) = args.style.as_deref() {
        match style.parse::<ClockStyle>() {
            Ok(style) => controller.set_display_style(style),
            Err(e) => tracing::warn!(error = %e, "keeping configured clock style"),
        }
    }
    if args.disabled {
        controller.set_enabled(false);
    }
    if args.hidden {
        controller.on_visibility_change(true);
    } else if args.visible {
        controller.on_visibility_change(false);
    }

    let report = TickRateReport {
        tick_rate_ms: controller.current_tick_rate(),
        visibility: controller.visibility(),
        clock_style: controller.style(),
        adaptive: controller.is_enabled(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
