//! Shared test utilities and fake primary windows.

#![allow(dead_code, unused_imports)]

use padlaunch::args::{self, DefaultLookup};
use padlaunch::instance::{ForwardRequest, Placement, ShowCommand};
use padlaunch::ipc::WindowCommand;
use padlaunch::launch::{Dispatcher, LaunchConfig};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Class used by every in-process primary in these tests.
pub const TEST_CLASS: &str = "padlaunch-test-window";

/// A lookup whose localization dir holds `fr.xml` and `pt-br.xml` and
/// whose relative paths resolve under `/work`.
pub fn fixture_lookup() -> (TempDir, DefaultLookup) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let loc_dir = temp_dir.path().join("localization");
    fs::create_dir_all(&loc_dir).unwrap();
    for locale in ["fr", "pt-br"] {
        fs::write(loc_dir.join(format!("{locale}.xml")), "<Localization/>").unwrap();
    }
    let lookup = DefaultLookup::with_base_dir(loc_dir, work_dir());
    (temp_dir, lookup)
}

pub fn work_dir() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\work")
    } else {
        PathBuf::from("/work")
    }
}

/// Run the whole argument pipeline against [`fixture_lookup`].
pub fn parse(raw: &str) -> LaunchConfig {
    let (_dir, lookup) = fixture_lookup();
    args::parse_command_line(raw, &lookup)
}

/// Settings directory whose config points the runtime dir at `runtime_dir`.
pub fn settings_dir_with_runtime(runtime_dir: &Path) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let content = format!(
        "[instance]\nruntime_dir = '{}'\nsearch_retries = 2\nsearch_delay_ms = 20\n",
        runtime_dir.display()
    );
    fs::write(temp_dir.path().join("config.toml"), content).unwrap();
    temp_dir
}

/// The binary under test, with logging kept off.
pub fn padlaunch_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_padlaunch"));
    cmd.env_remove(padlaunch::logging::LOG_ENV_VAR);
    cmd
}

/// Collects every launch it is asked to dispatch.
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    pub launches: Arc<Mutex<Vec<LaunchConfig>>>,
}

impl Dispatcher for RecordingDispatcher {
    type Error = std::convert::Infallible;

    fn dispatch(&mut self, launch: LaunchConfig) -> Result<(), Self::Error> {
        self.launches.lock().push(launch);
        Ok(())
    }
}

/// What a fake primary window has been asked to do so far.
#[derive(Debug, Default)]
pub struct WindowLog {
    pub forwarded: Vec<ForwardRequest>,
    pub shown: Vec<ShowCommand>,
    pub foreground: u32,
}

/// Answer [`WindowCommand`]s like a primary's window would, recording each.
pub fn spawn_fake_window(
    mut commands: mpsc::Receiver<WindowCommand>,
    in_tray: bool,
    placement: Placement,
) -> Arc<Mutex<WindowLog>> {
    let log = Arc::new(Mutex::new(WindowLog::default()));
    let recorder = Arc::clone(&log);
    tokio::spawn(async move {
        let mut in_tray = in_tray;
        let mut placement = placement;
        while let Some(command) = commands.recv().await {
            match command {
                WindowCommand::Forward {
                    request,
                    respond_to,
                } => {
                    recorder.lock().forwarded.push(request);
                    let _ = respond_to.send(in_tray);
                    in_tray = false;
                }
                WindowCommand::Placement { respond_to } => {
                    let _ = respond_to.send(placement);
                }
                WindowCommand::Show {
                    command,
                    respond_to,
                } => {
                    recorder.lock().shown.push(command);
                    placement = match command {
                        ShowCommand::Maximize => Placement::Maximized,
                        ShowCommand::Restore => Placement::Normal,
                    };
                    let _ = respond_to.send(());
                }
                WindowCommand::Foreground { respond_to } => {
                    recorder.lock().foreground += 1;
                    let _ = respond_to.send(());
                }
            }
        }
    });
    log
}
