//! Notification channel between the window manager and the desktop shell.
//!
//! The window manager listens on a unix socket at a well-known per-session
//! path and writes newline-terminated ASCII messages to every connected
//! shell. Traffic is one-way: anything the shell writes is read and
//! discarded. All sockets are non-blocking and the gateway never waits;
//! the owner calls [`IpcGateway::poll`] from its event loop.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Default bound on simultaneously connected shells.
pub const MAX_CLIENTS: usize = 16;

/// Longest message (without the trailing newline) the gateway will send.
pub const MAX_MESSAGE_LEN: usize = 255;

/// Error types for IPC operations
#[derive(Error, Debug)]
pub enum IpcError {
    #[error("XDG_RUNTIME_DIR is not set; cannot create ipc socket")]
    NoRuntimeDir,

    #[error("Failed to bind ipc socket {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Messages understood by the shell.
///
/// The wire form is the kebab-case name followed by `\n`. New variants may
/// be added at any time; readers must ignore lines they do not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IpcMessage {
    ToggleStartMenu,
    ShowDesktop,
    CycleWindow,
}

impl IpcMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IpcMessage::ToggleStartMenu => "toggle-start-menu",
            IpcMessage::ShowDesktop => "show-desktop",
            IpcMessage::CycleWindow => "cycle-window",
        }
    }

    /// Parse one line of the protocol. Unknown strings yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim_end_matches(['\r', '\n']) {
            "toggle-start-menu" => Some(IpcMessage::ToggleStartMenu),
            "show-desktop" => Some(IpcMessage::ShowDesktop),
            "cycle-window" => Some(IpcMessage::CycleWindow),
            _ => None,
        }
    }
}

impl fmt::Display for IpcMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `$XDG_RUNTIME_DIR/<socket_name>`
pub fn socket_path(socket_name: &str) -> Result<PathBuf, IpcError> {
    let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR").ok_or(IpcError::NoRuntimeDir)?;
    if runtime_dir.is_empty() {
        return Err(IpcError::NoRuntimeDir);
    }
    Ok(PathBuf::from(runtime_dir).join(socket_name))
}

struct ClientSlot {
    id: u64,
    stream: UnixStream,
}

/// Listener plus a bounded table of connected shells.
pub struct IpcGateway {
    listener: Option<UnixListener>,
    socket_path: PathBuf,
    clients: Vec<ClientSlot>,
    max_clients: usize,
    next_id: u64,
}

impl fmt::Debug for IpcGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpcGateway")
            .field("socket_path", &self.socket_path)
            .field("clients", &self.clients.len())
            .field("max_clients", &self.max_clients)
            .field("listening", &self.listener.is_some())
            .finish()
    }
}

impl IpcGateway {
    /// Bind the listener at `path`, replacing a stale socket file.
    pub fn bind(path: impl Into<PathBuf>, max_clients: usize) -> Result<Self, IpcError> {
        let socket_path = path.into();

        match std::fs::remove_file(&socket_path) {
            Ok(()) => debug!("Removed stale ipc socket {}", socket_path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(IpcError::Bind {
                    path: socket_path,
                    source: e,
                })
            }
        }

        let listener = UnixListener::bind(&socket_path).map_err(|e| IpcError::Bind {
            path: socket_path.clone(),
            source: e,
        })?;
        if let Err(e) = listener.set_nonblocking(true) {
            let _ = std::fs::remove_file(&socket_path);
            return Err(IpcError::Bind {
                path: socket_path,
                source: e,
            });
        }

        info!("IPC listening on {}", socket_path.display());
        Ok(Self {
            listener: Some(listener),
            socket_path,
            clients: Vec::with_capacity(max_clients),
            max_clients,
            next_id: 0,
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Accept pending connections and service readable clients.
    pub fn poll(&mut self) {
        self.accept_pending();
        self.read_clients();
    }

    fn accept_pending(&mut self) {
        let Some(listener) = self.listener.as_ref() else {
            return;
        };

        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    if self.clients.len() >= self.max_clients {
                        // Dropping the stream closes it.
                        error!("IPC max clients reached ({}), rejecting", self.max_clients);
                        continue;
                    }
                    if let Err(e) = stream.set_nonblocking(true) {
                        error!("IPC set_nonblocking failed: {}", e);
                        continue;
                    }
                    let id = self.next_id;
                    self.next_id += 1;
                    self.clients.push(ClientSlot { id, stream });
                    info!("IPC client connected (id={}, total={})", id, self.clients.len());
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!("IPC accept failed: {}", e);
                    break;
                }
            }
        }
    }

    fn read_clients(&mut self) {
        for idx in (0..self.clients.len()).rev() {
            if let Err(e) = drain_inbound(&mut self.clients[idx].stream) {
                debug!("IPC client {} read ended: {}", self.clients[idx].id, e);
                self.disconnect(idx);
            }
        }
    }

    /// Write `message` followed by a newline to every client.
    ///
    /// A client whose buffer is full misses this one message. Any other
    /// write failure disconnects that client only.
    pub fn send(&mut self, message: &str) {
        if self.clients.is_empty() {
            debug!("IPC send '{}' - no clients connected", message);
            return;
        }
        if message.len() > MAX_MESSAGE_LEN {
            warn!("IPC message of {} bytes exceeds limit, dropped", message.len());
            return;
        }

        let line = format!("{}\n", message);
        debug!("IPC sending '{}' to {} client(s)", message, self.clients.len());

        // Reverse order: a disconnect only shifts entries already visited.
        for idx in (0..self.clients.len()).rev() {
            match write_line(&mut self.clients[idx].stream, line.as_bytes()) {
                Ok(Delivery::Sent) => {}
                Ok(Delivery::Dropped) => {
                    debug!("IPC client {} buffer full, message dropped", self.clients[idx].id);
                }
                Err(e) => {
                    warn!("IPC write to client {} failed: {}", self.clients[idx].id, e);
                    self.disconnect(idx);
                }
            }
        }
    }

    pub fn broadcast(&mut self, message: IpcMessage) {
        self.send(message.as_str());
    }

    fn disconnect(&mut self, idx: usize) {
        let client = self.clients.remove(idx);
        let _ = client.stream.shutdown(std::net::Shutdown::Both);
        info!("IPC client disconnected (id={}, total={})", client.id, self.clients.len());
    }

    /// Disconnect everyone, close the listener and remove the socket file.
    pub fn shutdown(&mut self) {
        if self.listener.is_none() && self.clients.is_empty() {
            return;
        }
        for idx in (0..self.clients.len()).rev() {
            self.disconnect(idx);
        }
        self.listener = None;
        if let Err(e) = std::fs::remove_file(&self.socket_path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove ipc socket {}: {}", self.socket_path.display(), e);
            }
        }
        info!("IPC destroyed");
    }
}

impl Drop for IpcGateway {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Delivery {
    Sent,
    /// The client's buffer was full; nothing was written.
    Dropped,
}

/// Write one whole line. A partial write leaves the client's stream in the
/// middle of a line, so it is reported as an error and the caller drops the
/// client.
fn write_line<W: Write>(stream: &mut W, line: &[u8]) -> io::Result<Delivery> {
    match stream.write(line) {
        Ok(n) if n == line.len() => Ok(Delivery::Sent),
        Ok(n) => Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write ({} of {} bytes)", n, line.len()),
        )),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::Interrupted => {
            Ok(Delivery::Dropped)
        }
        Err(e) => Err(e),
    }
}

/// Read and discard everything currently buffered. `Err` means the
/// client is gone (EOF, hang-up or a hard read error).
fn drain_inbound(stream: &mut UnixStream) -> io::Result<()> {
    let mut buf = [0u8; 512];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "peer hung up")),
            Ok(_) => continue,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Shell side of the channel: a blocking line reader.
pub struct ShellConnection {
    reader: BufReader<UnixStream>,
}

impl ShellConnection {
    pub fn connect(path: impl AsRef<Path>) -> Result<Self, IpcError> {
        let stream = UnixStream::connect(path.as_ref())?;
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: UnixStream) -> Self {
        Self {
            reader: BufReader::new(stream),
        }
    }

    /// Next known message, skipping lines this version does not understand.
    /// `Ok(None)` once the window manager closes the connection.
    pub fn next_message(&mut self) -> Result<Option<IpcMessage>, IpcError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match IpcMessage::parse(&line) {
                Some(message) => return Ok(Some(message)),
                None => debug!("Ignoring unknown ipc message {:?}", line.trim_end()),
            }
        }
    }
}
