use clap::Parser;

use crate::render::fog::RevealMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fog-of-war map explorer with quest geofencing", long_about = None)]
pub struct Args {
    #[arg(short, long, help = "Quest list (JSON array or {\"quests\": [...]})")]
    quests: Option<String>,

    #[arg(short, long, help = "Explorer configuration file (JSON)")]
    config: Option<String>,

    #[arg(short = 'n', long, default_value_t = 60)]
    ticks: u64,

    #[arg(short, long, help = "Override the tick interval in milliseconds")]
    interval_ms: Option<u64>,

    #[arg(long, help = "Random seed for a reproducible walk")]
    seed: Option<u64>,

    #[arg(short, long, help = "Replay positions from a lat,lng CSV instead of a random walk")]
    track: Option<String>,

    #[arg(long, value_enum)]
    reveal_mode: Option<RevealMode>,

    #[arg(short, long, default_value_t = false, help = "Keep the camera centred on the agent")]
    follow: bool,

    #[arg(short, long, default_value = "reports")]
    output_dir: String,

    #[arg(long, default_value_t = false)]
    no_report: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,

    #[arg(long, default_value_t = false)]
    debug_logging: bool,

    #[arg(long, requires = "origin_lng")]
    origin_lat: Option<f64>,

    #[arg(long, requires = "origin_lat")]
    origin_lng: Option<f64>,
}

impl Args {
    pub fn quests(&self) -> Option<&str> {
        self.quests.as_deref()
    }

    pub fn config(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn interval_ms(&self) -> Option<u64> {
        self.interval_ms
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }

    pub fn reveal_mode(&self) -> Option<RevealMode> {
        self.reveal_mode
    }

    pub fn follow(&self) -> bool {
        self.follow
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn no_report(&self) -> bool {
        self.no_report
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }

    pub fn origin(&self) -> Option<(f64, f64)> {
        self.origin_lat.zip(self.origin_lng)
    }
}
