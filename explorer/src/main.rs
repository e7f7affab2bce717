use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use fogquest::cli::cli::Args;
use fogquest::config::explorer_config::ExplorerConfig;
use fogquest::core::driver::SessionUpdate;
use fogquest::data::quests_loader;
use fogquest::location::provider::{RandomWalkProvider, ScriptedProvider};
use fogquest::utils::csv_export::SessionExporter;
use fogquest::utils::logging;
use fogquest::utils::reporting::{print_discovery, print_session_summary};
use fogquest::utils::traits::LocationProvider;
use fogquest::{CameraEvent, Coordinate, ExplorerSession, Quest, SessionDriver, SessionEvent};

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(args.enable_timing(), args.debug_logging());

    println!("Fog Quest Explorer");
    println!("Debug logging: {}, Reports: {}, Camera: {}",
             if args.debug_logging() { "enabled" } else { "disabled" },
             if args.no_report() { "disabled" } else { "enabled" },
             if args.follow() { "following agent" } else { "fixed" });

    let config = build_config(&args)?;
    let quests = load_quests(&args);
    let (provider, limit) = build_provider(&args, &config)?;

    let session = ExplorerSession::new(config.clone(), quests, provider);
    let driver = SessionDriver::new(session).with_frame_capture(!args.no_report());
    let camera_tx = driver.sender();
    let follow = args.follow();

    let progress = ProgressBar::new(limit);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} ticks {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let report = driver.run(config.tick_interval(), Some(limit), |session, update| {
        if let SessionUpdate::Ticked(outcome) = update {
            progress.inc(1);
            progress.set_message(format!("quests {}", session.progress()));

            for quest in &outcome.discovered {
                progress.suspend(|| print_discovery(quest, session.ticks(), session.progress()));
            }

            if follow {
                if let Some(position) = outcome.position {
                    let _ = camera_tx.send(SessionEvent::Camera(CameraEvent::JumpTo {
                        center: position,
                        zoom: None,
                    }));
                }
            }
        }
    })?;
    progress.finish_and_clear();

    let summary = report.session.summary();
    print_session_summary(&summary);

    if !args.no_report() {
        let exporter = SessionExporter::new(args.output_dir())?;
        exporter.write_path_csv(report.session.path())?;
        exporter.write_summary_json(&summary)?;
        if let Some(frame) = &report.final_frame {
            exporter.write_frame(frame)?;
        }
        if !report.final_tiles.is_empty() {
            exporter.write_tile_list(&report.final_tiles)?;
        }
        println!("Reports written to {}", exporter.output_dir().display());
    }

    logging::print_timing_report();
    Ok(())
}

fn build_config(args: &Args) -> Result<ExplorerConfig> {
    let mut config = match args.config() {
        Some(path) => ExplorerConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config from {}: {}. Using defaults.", path, e);
            ExplorerConfig::default()
        }),
        None => ExplorerConfig::default(),
    };

    if let Some(interval_ms) = args.interval_ms() {
        config.tick_interval_ms = interval_ms;
    }
    if let Some(mode) = args.reveal_mode() {
        config.fog.mode = mode;
    }
    if let Some((lat, lng)) = args.origin() {
        config.origin = Coordinate::new(lat, lng);
    }

    config.validate().context("invalid explorer configuration")?;
    Ok(config)
}

fn load_quests(args: &Args) -> Vec<Quest> {
    let Some(path) = args.quests() else {
        return fallback_quests();
    };

    match quests_loader::load_quests(path) {
        Ok(quests) => quests,
        Err(e) => {
            eprintln!("Failed to load quests from {}: {}. Using built-in quests.", path, e);
            fallback_quests()
        }
    }
}

fn fallback_quests() -> Vec<Quest> {
    vec![
        Quest::new(1u64, "Virupaksha Temple", 15.3350, 76.4600, 50),
        Quest::new(2u64, "Vittala Temple", 15.3424, 76.4747, 100),
        Quest::new(3u64, "Hemakuta Hill", 15.3340, 76.4580, 40),
        Quest::new(4u64, "Lotus Mahal", 15.3198, 76.4710, 60),
        Quest::unplaced(5u64, "Storyteller's Riddle", 25),
    ]
}

// A replayed track caps the run at its own length
fn build_provider(args: &Args, config: &ExplorerConfig) -> Result<(Box<dyn LocationProvider>, u64)> {
    match args.track() {
        Some(path) => {
            let provider = ScriptedProvider::from_csv(path)
                .with_context(|| format!("failed to load track {}", path))?;
            let limit = args.ticks().min(provider.remaining() as u64);
            Ok((Box::new(provider), limit))
        }
        None => {
            let provider = RandomWalkProvider::new(config.origin, config.walk_jitter_deg, args.seed());
            Ok((Box::new(provider), args.ticks()))
        }
    }
}
