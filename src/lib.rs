//! padlaunch: startup front door of the editor.
//!
//! Turns one raw command line into a [`launch::LaunchConfig`] and decides
//! whether this process becomes the primary instance or hands the request
//! to the one already running.

pub mod args;
pub mod config;
pub mod instance;
pub mod ipc;
pub mod launch;
pub mod logging;
pub mod shutdown;
