use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::instance::{ForwardRequest, Placement, PrimaryWindow, ShowCommand, WindowLocator};

use super::endpoint::read_endpoint;
use super::types::{IpcError, IpcMessage, IpcReply};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Looks the primary up through its endpoint file.
#[derive(Debug, Clone)]
pub struct EndpointLocator {
    dir: PathBuf,
}

impl EndpointLocator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl WindowLocator for EndpointLocator {
    type Window = RemoteWindow;

    /// Only a listener that answers a ping counts: a stale endpoint file
    /// left behind by a crashed primary reads as "not found".
    async fn find(&mut self, class: &str) -> Option<RemoteWindow> {
        let addr = read_endpoint(&self.dir, class)?;
        let mut window = match RemoteWindow::connect(addr).await {
            Ok(window) => window,
            Err(e) => {
                tracing::debug!(%addr, error = %e, "endpoint not reachable");
                return None;
            }
        };
        match window.request(&IpcMessage::Ping).await {
            Ok(IpcReply::Pong) => Some(window),
            Ok(reply) => {
                tracing::debug!(%addr, ?reply, "endpoint answered ping with something else");
                None
            }
            Err(e) => {
                tracing::debug!(%addr, error = %e, "endpoint did not answer ping");
                None
            }
        }
    }
}

/// Connection to a running primary instance.
pub struct RemoteWindow {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl RemoteWindow {
    pub async fn connect(addr: SocketAddr) -> Result<Self, IpcError> {
        let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| IpcError::Timeout)??;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
        })
    }

    pub async fn request(&mut self, message: &IpcMessage) -> Result<IpcReply, IpcError> {
        let mut line = serde_json::to_string(message)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;

        let mut reply = String::new();
        let read = tokio::time::timeout(REQUEST_TIMEOUT, self.reader.read_line(&mut reply))
            .await
            .map_err(|_| IpcError::Timeout)??;
        if read == 0 {
            return Err(IpcError::Disconnected);
        }

        match serde_json::from_str::<IpcReply>(reply.trim_end())? {
            IpcReply::Error { message } => Err(IpcError::Remote(message)),
            reply => Ok(reply),
        }
    }
}

fn unexpected(reply: IpcReply) -> IpcError {
    IpcError::UnexpectedReply(format!("{reply:?}"))
}

impl PrimaryWindow for RemoteWindow {
    type Error = IpcError;

    async fn forward(&mut self, request: &ForwardRequest) -> Result<bool, IpcError> {
        let message = IpcMessage::Forward {
            request: request.clone(),
        };
        match self.request(&message).await? {
            IpcReply::Forwarded { in_tray } => Ok(in_tray),
            other => Err(unexpected(other)),
        }
    }

    async fn placement(&mut self) -> Result<Placement, IpcError> {
        match self.request(&IpcMessage::Placement).await? {
            IpcReply::Placement { placement } => Ok(placement),
            other => Err(unexpected(other)),
        }
    }

    async fn show(&mut self, command: ShowCommand) -> Result<(), IpcError> {
        match self.request(&IpcMessage::Show { command }).await? {
            IpcReply::Done => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    async fn set_foreground(&mut self) -> Result<(), IpcError> {
        match self.request(&IpcMessage::Foreground).await? {
            IpcReply::Done => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}
