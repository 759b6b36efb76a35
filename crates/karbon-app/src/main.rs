//! Karbon entry point.
//!
//! Wires together the infrastructure services and starts the Tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load config, enumerate monitors, build DrawingSession
//!  └─ start services
//!       ├─ DeviceQueryInputSource  (pointer polling thread)
//!       ├─ DrawInputUseCase        (dispatch worker thread "karbon-draw")
//!       ├─ presentation loop       (Tokio task, frame_rate Hz, copies on the blocking pool)
//!       └─ console                 (stdin reader thread → command loop)
//! ```
//!
//! # Shutdown order
//!
//! `quit` or Ctrl-C → presentation loop stops → pointer source `stop()`
//! (joins the polling thread, closing the event channel) → dispatch worker
//! drains the queue and is joined → exit.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use karbon_app::application::draw_input::{share, DrawInputUseCase};
use karbon_app::application::manage_display::present_frame;
use karbon_app::infrastructure::input_capture::{DeviceQueryInputSource, InputSource};
use karbon_app::infrastructure::presentation::HeadlessSurface;
use karbon_app::infrastructure::screen_info::{DisplayInfoEnumerator, PlatformScreenEnumerator};
use karbon_app::infrastructure::storage::config::{load_config, load_config_from, AppConfig};
use karbon_app::infrastructure::storage::image_store::{snapshot_folder, PngImageSink};
use karbon_app::infrastructure::ui_bridge::console::{self, LineOutcome, HELP};
use karbon_app::infrastructure::ui_bridge::AppState;
use karbon_core::{DrawingSession, MonitorRegistry};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Karbon: turns global mouse movement and clicks into a picture of one monitor.
#[derive(Debug, Parser)]
#[command(name = "karbon", version, about)]
struct Cli {
    /// Zero-based index of the monitor to draw on (overrides the config file).
    #[arg(long, env = "KARBON_MONITOR")]
    monitor: Option<usize>,

    /// Path to a config file instead of the platform default location.
    #[arg(long, env = "KARBON_CONFIG")]
    config: Option<PathBuf>,

    /// Join consecutive pointer positions with line segments.
    #[arg(long)]
    connect_moves: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The config is read first so its log level can seed the filter.
    let (config, config_error) = match &cli.config {
        Some(path) => split_config(load_config_from(path)),
        None => split_config(load_config()),
    };

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.general.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Karbon starting");
    if let Some(e) = config_error {
        warn!("using default configuration: {e}");
    }

    // ── Monitors and session ──────────────────────────────────────────────────
    let enumerator = DisplayInfoEnumerator::new();
    let monitors = enumerator
        .enumerate_monitors()
        .context("failed to enumerate monitors")?;
    let mut registry = MonitorRegistry::new(monitors).context("no usable monitors")?;

    let wanted = cli.monitor.unwrap_or(config.display.monitor_index);
    if let Err(e) = registry.select(wanted) {
        warn!("{e}; drawing on the first monitor instead");
    }
    let active = registry.active();
    info!("drawing on {}", active.label());

    let connect_moves = cli.connect_moves || config.capture.connect_moves;
    let session = share(DrawingSession::new(registry).with_connect_moves(connect_moves));

    let surface = HeadlessSurface::new(active);
    let counters = surface.counters();
    let state = Arc::new(
        AppState::new(
            Arc::clone(&session),
            Box::new(surface),
            Box::new(enumerator),
            Box::new(PngImageSink),
        )
        .with_snapshot_dir(config.snapshots.directory.clone())
        .with_frame_counters(counters),
    );

    match snapshot_folder(config.snapshots.directory.as_deref()) {
        Ok(folder) => info!("snapshots go to {}", folder.display()),
        Err(e) => warn!("snapshot folder unavailable: {e}"),
    }

    // ── Pointer capture and dispatch ──────────────────────────────────────────
    let source = Arc::new(DeviceQueryInputSource::new(config.capture.poll_interval()));
    let events = source.start().context("failed to start pointer capture")?;
    let dispatch = DrawInputUseCase::new(Arc::clone(&session))
        .spawn(events)
        .context("failed to spawn draw dispatch worker")?;

    // Shutdown flag shared with the presentation loop.
    let running = Arc::new(AtomicBool::new(true));

    // ── Presentation loop ─────────────────────────────────────────────────────
    let presenter = {
        let state = Arc::clone(&state);
        let running = Arc::clone(&running);
        let period = config.presentation.frame_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            while running.load(Ordering::Relaxed) {
                ticker.tick().await;
                // Full-canvas copy runs on the blocking pool.
                let state = Arc::clone(&state);
                let presented = tokio::task::spawn_blocking(move || {
                    let mut surface = state.lock_surface();
                    present_frame(&state.session, surface.as_mut());
                })
                .await;
                if let Err(e) = presented {
                    error!("presenting a frame failed: {e}");
                    break;
                }
            }
        })
    };

    // ── Console ───────────────────────────────────────────────────────────────
    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("Karbon ready.  {HELP}");

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    error!("failed to listen for Ctrl-C: {e}");
                }
                info!("shutdown signal received");
                break;
            }
            line = lines.recv(), if stdin_open => {
                let Some(line) = line else {
                    info!("stdin closed; press Ctrl-C to exit");
                    stdin_open = false;
                    continue;
                };
                match console::dispatch_line(&state, &line) {
                    LineOutcome::Blank => {}
                    LineOutcome::Reply(response) => println!("{response}"),
                    LineOutcome::Blocking(command) => {
                        let state = Arc::clone(&state);
                        let response =
                            tokio::task::spawn_blocking(move || console::execute(&state, &command))
                                .await
                                .context("command task panicked")?;
                        println!("{response}");
                    }
                    LineOutcome::Quit(response) => {
                        println!("{response}");
                        break;
                    }
                }
            }
        }
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────
    running.store(false, Ordering::Relaxed);
    if let Err(e) = presenter.await {
        error!("presentation loop failed: {e}");
    }

    let stats = tokio::task::spawn_blocking(move || {
        source.stop();
        dispatch.join()
    })
    .await
    .context("shutdown task panicked")?;

    match stats {
        Ok(stats) => info!(
            drawn = stats.drawn,
            dropped = stats.dropped,
            ignored = stats.ignored,
            "Karbon stopped"
        ),
        Err(_) => error!("draw dispatch worker panicked"),
    }
    Ok(())
}

/// Falls back to defaults on a config error, keeping the error for logging
/// once the subscriber is up.
fn split_config<E>(result: Result<AppConfig, E>) -> (AppConfig, Option<E>) {
    match result {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    }
}

/// Reads stdin lines on a plain thread so a pending read never blocks
/// runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = std::thread::Builder::new()
        .name("karbon-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("stdin read failed: {e}");
                        break;
                    }
                }
            }
        });
    if let Err(e) = spawned {
        warn!("console unavailable: {e}");
    }
    rx
}
