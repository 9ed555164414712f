//! The seam between the coordinator and whatever "window" the primary
//! exposes. In production that is the IPC endpoint in [`crate::ipc`].

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::launch::LaunchConfig;

/// How the primary's main window currently sits on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    #[default]
    Normal,
    Maximized,
    Minimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowCommand {
    Maximize,
    Restore,
}

impl Placement {
    /// What to show the window with so it comes back the way it was left.
    pub fn show_command(self) -> Option<ShowCommand> {
        match self {
            Placement::Maximized => Some(ShowCommand::Maximize),
            Placement::Minimized => Some(ShowCommand::Restore),
            Placement::Normal => None,
        }
    }
}

/// The single request a secondary instance hands to the primary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRequest {
    pub restore_from_tray: bool,
    pub launch: LaunchConfig,
}

impl ForwardRequest {
    pub fn new(launch: LaunchConfig) -> Self {
        Self {
            restore_from_tray: true,
            launch,
        }
    }
}

/// A running primary instance's main window.
pub trait PrimaryWindow {
    type Error: std::fmt::Display;

    /// Deliver the request. Resolves to `true` if the window was in the
    /// tray, in which case restoring it is already taken care of.
    fn forward(
        &mut self,
        request: &ForwardRequest,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    fn placement(&mut self) -> impl Future<Output = Result<Placement, Self::Error>> + Send;

    fn show(&mut self, command: ShowCommand) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn set_foreground(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Finds a primary window by its well-known class name.
pub trait WindowLocator {
    type Window: PrimaryWindow;

    /// One lookup attempt. `None` means not there (yet).
    fn find(&mut self, class: &str) -> impl Future<Output = Option<Self::Window>> + Send;
}
