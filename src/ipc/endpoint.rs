//! Endpoint files: how a secondary finds the primary's listener.
//!
//! `<runtime dir>/<window class>.endpoint` holds the socket address the
//! primary listens on. It plays the part a registered window class plays
//! on a desktop: a well-known name to look the running instance up by.

use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub fn endpoint_path(dir: &Path, class: &str) -> PathBuf {
    dir.join(format!("{class}.endpoint"))
}

/// Publish `addr` under `class`. Written to a temp file and renamed so a
/// reader never sees a half-written address.
pub fn write_endpoint(dir: &Path, class: &str, addr: SocketAddr) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = endpoint_path(dir, class);
    let staging = dir.join(format!("{class}.endpoint.{}", std::process::id()));
    fs::write(&staging, addr.to_string())?;
    fs::rename(&staging, &path)?;
    Ok(path)
}

/// Missing, unreadable or garbled files all mean "nobody there".
pub fn read_endpoint(dir: &Path, class: &str) -> Option<SocketAddr> {
    let path = endpoint_path(dir, class);
    let content = fs::read_to_string(&path).ok()?;
    match content.trim().parse() {
        Ok(addr) => Some(addr),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "ignoring garbled endpoint file");
            None
        }
    }
}

pub fn remove_endpoint(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove endpoint file");
        }
    }
}

/// Remove the endpoint under `class` only while it still names `addr`.
/// A primary that started later may have published over it.
pub fn withdraw_endpoint(dir: &Path, class: &str, addr: SocketAddr) {
    match read_endpoint(dir, class) {
        Some(current) if current == addr => remove_endpoint(&endpoint_path(dir, class)),
        Some(current) => {
            tracing::debug!(%addr, %current, "endpoint taken over by another instance, leaving it");
        }
        None => {}
    }
}
