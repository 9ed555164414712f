use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

use crate::instance::WindowLocator;
use crate::shutdown::ShutdownHandle;

use super::client::EndpointLocator;
use super::endpoint::{endpoint_path, withdraw_endpoint, write_endpoint};
use super::types::{IpcError, IpcMessage, IpcReply, WindowCommand};

const IPC_BUFFER: usize = 16;
const REPLY_TIMEOUT: Duration = Duration::from_secs(1);
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REQUEST_BYTES: u64 = 64 * 1024;

/// The primary's side: accepts secondaries and turns their requests into
/// [`WindowCommand`]s for the editor to answer.
pub struct IpcServer {
    listener: TcpListener,
    dir: PathBuf,
    class: String,
    commands: mpsc::Sender<WindowCommand>,
    idle_timeout: Duration,
}

impl IpcServer {
    /// Listen on a loopback port and publish it under `class` in `dir`.
    pub async fn bind(
        dir: &Path,
        class: &str,
    ) -> Result<(Self, mpsc::Receiver<WindowCommand>), IpcError> {
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let endpoint = write_endpoint(dir, class, addr)?;
        tracing::info!(%addr, endpoint = %endpoint.display(), "listening for other instances");

        let (sender, receiver) = mpsc::channel(IPC_BUFFER);
        Ok((
            Self {
                listener,
                dir: dir.to_path_buf(),
                class: class.to_string(),
                commands: sender,
                idle_timeout: IDLE_TIMEOUT,
            },
            receiver,
        ))
    }

    /// Bind only if no live primary already answers under `class`.
    ///
    /// `None` means another instance owns the endpoint; publishing over it
    /// would steal its handoffs.
    pub async fn claim(
        dir: &Path,
        class: &str,
    ) -> Result<Option<(Self, mpsc::Receiver<WindowCommand>)>, IpcError> {
        if EndpointLocator::new(dir).find(class).await.is_some() {
            tracing::info!(class, "another primary is listening, not publishing an endpoint");
            return Ok(None);
        }
        Self::bind(dir, class).await.map(Some)
    }

    /// Drop connections that send nothing for `timeout`.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn endpoint(&self) -> PathBuf {
        endpoint_path(&self.dir, &self.class)
    }

    /// Accept connections until shutdown, then withdraw the endpoint file
    /// if it still points here.
    pub async fn run(self, shutdown: ShutdownHandle) {
        let addr = self.listener.local_addr().ok();
        let (dir, class) = (self.dir.clone(), self.class.clone());
        scopeguard::defer! {
            if let Some(addr) = addr {
                withdraw_endpoint(&dir, &class, addr);
            }
        }

        loop {
            tokio::select! {
                _ = shutdown.wait() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tracing::debug!(%peer, "instance connected");
                        tokio::spawn(handle_connection(
                            stream,
                            self.commands.clone(),
                            self.idle_timeout,
                        ));
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to accept instance connection"),
                },
            }
        }
        tracing::debug!("IPC server stopped");
    }
}

enum Incoming {
    Line(Vec<u8>),
    TooLong,
    Closed,
}

/// Read one request line. Neither a silent peer nor an endless line can
/// hold more than `idle_timeout` of waiting or `MAX_REQUEST_BYTES` of
/// buffer.
async fn read_request(
    reader: &mut BufReader<OwnedReadHalf>,
    idle_timeout: Duration,
) -> io::Result<Incoming> {
    let mut buf = Vec::new();
    if read_bounded(reader, &mut buf, idle_timeout).await? == 0 {
        return Ok(Incoming::Closed);
    }
    if buf.ends_with(b"\n") || (buf.len() as u64) < MAX_REQUEST_BYTES {
        return Ok(Incoming::Line(buf));
    }

    // Skip the rest of the oversized line so the connection stays in step.
    loop {
        buf.clear();
        if read_bounded(reader, &mut buf, idle_timeout).await? == 0 || buf.ends_with(b"\n") {
            return Ok(Incoming::TooLong);
        }
    }
}

async fn read_bounded(
    reader: &mut BufReader<OwnedReadHalf>,
    buf: &mut Vec<u8>,
    idle_timeout: Duration,
) -> io::Result<usize> {
    let mut limited = (&mut *reader).take(MAX_REQUEST_BYTES);
    tokio::time::timeout(idle_timeout, limited.read_until(b'\n', buf))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "instance went idle"))?
}

async fn handle_connection(
    stream: TcpStream,
    commands: mpsc::Sender<WindowCommand>,
    idle_timeout: Duration,
) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    loop {
        let reply = match read_request(&mut reader, idle_timeout).await {
            Ok(Incoming::Line(line)) => match serde_json::from_slice::<IpcMessage>(&line) {
                Ok(message) => dispatch(message, &commands).await,
                Err(e) => IpcReply::Error {
                    message: format!("malformed request: {e}"),
                },
            },
            Ok(Incoming::TooLong) => IpcReply::Error {
                message: format!("request longer than {MAX_REQUEST_BYTES} bytes"),
            },
            Ok(Incoming::Closed) => break,
            Err(e) => {
                tracing::debug!(error = %e, "instance connection dropped");
                break;
            }
        };

        let Ok(mut out) = serde_json::to_string(&reply) else {
            break;
        };
        out.push('\n');
        if let Err(e) = writer.write_all(out.as_bytes()).await {
            tracing::debug!(error = %e, "failed to answer instance");
            break;
        }
    }
}

async fn dispatch(message: IpcMessage, commands: &mpsc::Sender<WindowCommand>) -> IpcReply {
    let result = match message {
        IpcMessage::Ping => return IpcReply::Pong,
        IpcMessage::Forward { request } => {
            tracing::info!(files = request.launch.files.len(), "request from another instance");
            ask(commands, |respond_to| WindowCommand::Forward {
                request,
                respond_to,
            })
            .await
            .map(|in_tray| IpcReply::Forwarded { in_tray })
        }
        IpcMessage::Placement => ask(commands, |respond_to| WindowCommand::Placement { respond_to })
            .await
            .map(|placement| IpcReply::Placement { placement }),
        IpcMessage::Show { command } => {
            ask(commands, |respond_to| WindowCommand::Show {
                command,
                respond_to,
            })
            .await
            .map(|()| IpcReply::Done)
        }
        IpcMessage::Foreground => ask(commands, |respond_to| WindowCommand::Foreground { respond_to })
            .await
            .map(|()| IpcReply::Done),
    };

    result.unwrap_or_else(|e| IpcReply::Error {
        message: e.to_string(),
    })
}

async fn ask<T>(
    commands: &mpsc::Sender<WindowCommand>,
    build: impl FnOnce(oneshot::Sender<T>) -> WindowCommand,
) -> Result<T, IpcError> {
    let (respond_to, receiver) = oneshot::channel();
    commands
        .send(build(respond_to))
        .await
        .map_err(|_| IpcError::Disconnected)?;

    recv_with_timeout(receiver).await
}

async fn recv_with_timeout<T>(receiver: oneshot::Receiver<T>) -> Result<T, IpcError> {
    match tokio::time::timeout(REPLY_TIMEOUT, receiver).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(_)) => Err(IpcError::Disconnected),
        Err(_) => Err(IpcError::Timeout),
    }
}
