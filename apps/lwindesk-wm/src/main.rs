use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use lwindesk_config::WmConfig;
use lwindesk_ipc::{socket_path, IpcGateway};
use lwindesk_wm::core::headless::{replay_line, HeadlessBackend};
use lwindesk_wm::window::draw::RaqoteRenderer;
use lwindesk_wm::window::error::{log_and_ignore, WmError};
use lwindesk_wm::window::manager::WindowManager;

/// How often the shell gateway accepts and services connections.
const IPC_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to ~/.config/lwindesk/wm.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging, overrides the configured level
    #[arg(short, long)]
    debug: bool,

    /// Drive the window manager from a file of JSON events, one per line,
    /// and exit when it ends
    #[arg(long)]
    replay: Option<PathBuf>,
}

/// An explicit `--config` must exist; the default location may be absent.
fn load_config(path: Option<&Path>) -> Result<WmConfig, WmError> {
    let config = match path {
        Some(path) => WmConfig::load_required(path)?,
        None => WmConfig::load(None)?,
    };
    Ok(config)
}

fn bind_gateway(config: &WmConfig) -> Result<IpcGateway, WmError> {
    let path = socket_path(&config.ipc.socket_name)?;
    Ok(IpcGateway::bind(path, config.ipc.max_clients)?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    let level = if args.debug { "debug" } else { config.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    info!("Starting lwindesk-wm...");

    let mut gateway = match bind_gateway(&config) {
        Ok(gateway) => gateway,
        Err(e) => {
            error!("Cannot start shell gateway: {}", e);
            return Err(e.into());
        }
    };
    info!("Shell gateway listening on {}", gateway.socket_path().display());

    let backend = HeadlessBackend::new(config.window.default_width, config.window.default_height);
    let mut wm = WindowManager::new(backend, RaqoteRenderer, &config);

    let mut replay = match &args.replay {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(WmError::from)
                .with_context(|| format!("Failed to open replay file {}", path.display()))?;
            info!("Replaying events from {}", path.display());
            Some(BufReader::new(file).lines())
        }
        None => None,
    };
    let mut line_no = 0usize;

    let mut ticker = tokio::time::interval(IPC_POLL_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                gateway.poll();
            }
            line = async {
                match replay.as_mut() {
                    Some(lines) => lines.next_line().await,
                    None => std::future::pending().await,
                }
            } => {
                match line {
                    Ok(Some(line)) => {
                        line_no += 1;
                        replay_line(&mut wm, line_no, &line);
                    }
                    Ok(None) => {
                        info!("Replay finished after {} lines", line_no);
                        break;
                    }
                    Err(e) => {
                        warn!("Replay read failed: {}", e);
                        break;
                    }
                }
            }
            result = &mut ctrl_c => {
                log_and_ignore(result, "ctrl-c handler");
                info!("Interrupted, shutting down");
                break;
            }
        }

        for message in wm.drain_notifications() {
            gateway.broadcast(message);
        }
    }

    for message in wm.drain_notifications() {
        gateway.broadcast(message);
    }
    gateway.shutdown();
    info!("lwindesk-wm stopped with {} views", wm.views().len());

    Ok(())
}
