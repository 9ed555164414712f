//! Cross-process transport between a secondary instance and the primary.
//!
//! The primary publishes a loopback TCP endpoint under its well-known
//! window class; a secondary finds it, and the two exchange one JSON
//! object per line:
//!
//! ```text
//! secondary                          primary
//!   ping                        ─►     pong
//!   forward {restore, launch}   ─►     forwarded {in_tray}
//!   placement                   ─►     placement {normal|maximized|minimized}
//!   show {maximize|restore}     ─►     done
//!   foreground                  ─►     done
//! ```

mod client;
mod endpoint;
mod server;
mod types;


pub use client::{EndpointLocator, RemoteWindow};
pub use endpoint::{
    endpoint_path, read_endpoint, remove_endpoint, withdraw_endpoint, write_endpoint,
};
pub use server::IpcServer;
pub use types::{IpcError, IpcMessage, IpcReply, WindowCommand};
