use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::instance::{ForwardRequest, Placement, ShowCommand};

#[derive(Debug, Error)]
pub enum IpcError {
    #[error("IPC channel disconnected")]
    Disconnected,
    #[error("IPC request timed out")]
    Timeout,
    #[error("IPC I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed IPC message: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("unexpected IPC reply: {0}")]
    UnexpectedReply(String),
    #[error("running instance refused request: {0}")]
    Remote(String),
}

/// Secondary → primary, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcMessage {
    Ping,
    Forward { request: ForwardRequest },
    Placement,
    Show { command: ShowCommand },
    Foreground,
}

/// Primary → secondary, one per [`IpcMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcReply {
    Pong,
    Forwarded { in_tray: bool },
    Placement { placement: Placement },
    Done,
    Error { message: String },
}

/// What the primary's window is asked to do, with a channel for the answer.
pub enum WindowCommand {
    /// Restore from tray if hidden there and open what was asked for.
    /// Answer whether the window was in the tray.
    Forward {
        request: ForwardRequest,
        respond_to: oneshot::Sender<bool>,
    },
    Placement {
        respond_to: oneshot::Sender<Placement>,
    },
    Show {
        command: ShowCommand,
        respond_to: oneshot::Sender<()>,
    },
    Foreground {
        respond_to: oneshot::Sender<()>,
    },
}
