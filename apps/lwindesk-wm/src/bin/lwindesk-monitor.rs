//! Connects to the window manager's shell socket and prints every
//! notification it sends. Handy when working on the shell side.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lwindesk_config::DEFAULT_SOCKET_NAME;
use lwindesk_ipc::{socket_path, ShellConnection};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Socket to connect to (defaults to $XDG_RUNTIME_DIR/lwindesk-ipc)
    #[arg(short, long)]
    socket: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let path = match args.socket {
        Some(path) => path,
        None => socket_path(DEFAULT_SOCKET_NAME)?,
    };

    let mut conn = ShellConnection::connect(&path)?;
    info!("Connected to {}", path.display());

    while let Some(message) = conn.next_message()? {
        println!("{}", message);
    }

    info!("Window manager closed the connection");
    Ok(())
}
