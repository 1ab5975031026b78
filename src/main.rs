//! Lumitree - Gesture-driven particle tree
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lumitree::{
    assets::FsImageLoader,
    config::Config,
    input::InputCommand,
    render::HeadlessRenderer,
    tracking::{mediapipe::MpHandReceiver, subprocess::MpHandSubprocess, HandDetector},
    SceneHandle, SceneRuntime,
};

/// Lumitree - particle tree that follows your hand
#[derive(Parser, Debug)]
#[command(name = "lumitree", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable hand tracking
    #[arg(long)]
    no_tracking: bool,

    /// Frame rate (overrides config)
    #[arg(long)]
    fps: Option<u32>,

    /// Viewport width (overrides config)
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height (overrides config)
    #[arg(long)]
    height: Option<u32>,

    /// Image to add as a memory at startup (repeatable)
    #[arg(short, long)]
    memory: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", lumitree::NAME, lumitree::VERSION);

    let config = load_config(&args)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(args, config))?;

    info!("Lumitree stopped");
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // CLI overrides
    if let Some(fps) = args.fps {
        config.render.fps = fps;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.no_tracking {
        config.gesture.enabled = false;
    }

    config.validate()?;
    Ok(config)
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    info!(
        "Scene: {} vortex particles, {} tree points, trail {}",
        config.scene.vortex_particles, config.scene.tree_particles, config.scene.trail_length
    );
    info!(
        "Viewport: {}x{} @ {} fps",
        config.render.width, config.render.height, config.render.fps
    );

    let tracking = config.gesture.enabled && config.mediapipe.enabled;

    let mut tracker = None;
    if tracking && config.mediapipe.auto_launch {
        let mut subprocess = MpHandSubprocess::new(&config.mediapipe);
        match subprocess.start() {
            Ok(()) => tracker = Some(subprocess),
            Err(e) => warn!("{}", e),
        }
    }

    let detector: Option<Box<dyn HandDetector>> = if tracking {
        Some(Box::new(MpHandReceiver::new(&config.mediapipe)))
    } else {
        None
    };

    let renderer = HeadlessRenderer::new(&config.render);
    let loader = Arc::new(FsImageLoader::new());
    let runtime = SceneRuntime::start(&config, detector, renderer, loader);
    let handle = runtime.handle();

    for url in args.memory {
        handle.add_memory(url);
    }

    // Surface tracking status changes
    let mut status_rx = runtime.tracking_status();
    tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let status = status_rx.borrow_and_update().clone();
            info!("{}", status.message());
        }
    });

    let (quit_tx, mut quit_rx) = mpsc::channel::<()>(1);
    spawn_input_listener(handle, runtime.subscribe_shutdown(), quit_tx);

    tokio::select! {
        _ = shutdown_signal() => info!("Shutdown signal received"),
        _ = quit_rx.recv() => info!("Quit requested"),
    }

    match runtime.shutdown().await {
        Some(render_loop) => info!(
            "Rendered {} frames ({} errors), {} memories",
            render_loop.renderer().frames_rendered(),
            render_loop.render_errors(),
            render_loop.state().memory_count()
        ),
        None => error!("Render loop did not shut down cleanly"),
    }

    if let Some(mut tracker) = tracker {
        tracker.stop().await;
    }

    Ok(())
}

/// Read commands from stdin until `q`, EOF or shutdown.
fn spawn_input_listener(
    handle: SceneHandle,
    mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
    quit_tx: mpsc::Sender<()>,
) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        info!("Commands: h (toggle UI), a <path> (add memory), r <w> <h> (resize), q (quit)");

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => match InputCommand::parse(&line) {
                        Some(command) => {
                            if !command.dispatch(&handle) {
                                let _ = quit_tx.send(()).await;
                                return;
                            }
                        }
                        None if line.trim().is_empty() => {}
                        None => warn!("Unrecognized command: {}", line.trim()),
                    },
                    // Stdin closed; keep running until a signal arrives
                    Ok(None) => return,
                    Err(e) => {
                        error!("Failed to read stdin: {}", e);
                        return;
                    }
                },
                _ = shutdown_rx.recv() => return,
            }
        }
    });
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
