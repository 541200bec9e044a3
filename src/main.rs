// Command line front end for the RC timer resistor picker

extern crate anyhow;
extern crate clap;
extern crate rc_timer_calc;
extern crate serde_json;
extern crate tracing;
extern crate tracing_subscriber;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rc_timer_calc::config::{
    DEFAULT_DIVIDER_MAX, DEFAULT_DIVIDER_MIN, DEFAULT_RATIO_MAX, DEFAULT_RATIO_MIN,
};
use rc_timer_calc::input::MICROFARAD;
use rc_timer_calc::{format_resistance, SearchConfig, SearchRequest, TimerCalc, E24};

#[derive(Parser)]
#[command(name = "rc-timer")]
#[command(about = "Pick E24 resistors for an RC timer with a comparator threshold", long_about = None)]
struct Cli {
    /// Desired delay in seconds
    #[arg(allow_hyphen_values = true)]
    duration: String,

    /// Timing capacitor in microfarads
    #[arg(allow_hyphen_values = true)]
    capacitance: String,

    /// Lowest usable threshold as a fraction of supply (exclusive)
    #[arg(long, default_value_t = DEFAULT_RATIO_MIN)]
    ratio_min: f64,

    /// Highest usable threshold as a fraction of supply (exclusive)
    #[arg(long, default_value_t = DEFAULT_RATIO_MAX)]
    ratio_max: f64,

    /// Smallest R1 to try, ohms
    #[arg(long, default_value_t = DEFAULT_DIVIDER_MIN)]
    r1_min: f64,

    /// Largest R1 to try, ohms
    #[arg(long, default_value_t = DEFAULT_DIVIDER_MAX)]
    r1_max: f64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let req = SearchRequest::parse(&cli.duration, &cli.capacitance)?;
    let config = SearchConfig::default()
        .ratio_band(cli.ratio_min, cli.ratio_max)
        .divider_range(cli.r1_min, cli.r1_max);

    let calc = TimerCalc::new(&E24).with_config(config);
    debug!(config = ?calc.config(), "search bounds");
    let sol = calc.try_search(req.duration, req.capacitance)?;

    info!(
        time = sol.achieved_time,
        ratio = sol.achieved_ratio,
        r1 = %format_resistance(sol.r1),
        r2 = %format_resistance(sol.r2),
        r3 = %format_resistance(sol.r3),
        capacitance_uf = req.capacitance / MICROFARAD,
        deviation = sol.deviation,
        "calculated timer"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&sol)?);
    } else {
        println!("{}", sol);
    }
    Ok(())
}
