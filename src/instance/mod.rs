//! Single-instance coordination.
//!
//! A new process either becomes the primary instance or hands its request
//! to the primary that is already running and exits:
//!
//! ```text
//! NamedLock ─► InstanceRole ─► (Secondary) bounded window search ─► forward ─► exit
//!                     │                              │
//!                     └──── (Primary) ◄──── not found / forward failed
//! ```
//!
//! Every ambiguity resolves to "proceed as primary": a stale or foreign
//! lock must never keep the editor from starting.

mod lock;
mod window;

use std::time::Duration;

pub use lock::NamedLock;
pub use window::{ForwardRequest, Placement, PrimaryWindow, ShowCommand, WindowLocator};

use crate::launch::LaunchConfig;

/// Whether this process owns the editor or defers to a running one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceRole {
    Primary,
    Secondary,
}

impl InstanceRole {
    /// `already_running` comes from the named lock; `multi_instance` from
    /// `-multiInst` or the config, and always wins.
    pub fn detect(already_running: bool, multi_instance: bool) -> Self {
        if already_running && !multi_instance {
            InstanceRole::Secondary
        } else {
            InstanceRole::Primary
        }
    }
}

/// How startup continues after coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Start the editor in this process.
    ProceedAsPrimary,
    /// The running instance has the request; exit now.
    ForwardAndExit,
}

impl Outcome {
    pub fn exit_code(self) -> Option<i32> {
        match self {
            Outcome::ProceedAsPrimary => None,
            Outcome::ForwardAndExit => Some(0),
        }
    }
}

/// Bounded retry for locating the primary's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Extra attempts after the first miss.
    pub retries: u32,
    /// Pause before each extra attempt.
    pub delay: Duration,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            retries: 5,
            delay: Duration::from_millis(100),
        }
    }
}

pub struct InstanceCoordinator<L> {
    locator: L,
    window_class: String,
    policy: SearchPolicy,
}

impl<L: WindowLocator> InstanceCoordinator<L> {
    pub fn new(locator: L, window_class: impl Into<String>, policy: SearchPolicy) -> Self {
        Self {
            locator,
            window_class: window_class.into(),
            policy,
        }
    }

    /// Decide how startup continues.
    ///
    /// `release` runs once the primary's window has been found, before the
    /// request is sent; it should drop whatever global resources this
    /// process still has open.
    pub async fn resolve(
        &mut self,
        role: InstanceRole,
        launch: &LaunchConfig,
        release: impl FnOnce(),
    ) -> Outcome {
        if role == InstanceRole::Primary {
            return Outcome::ProceedAsPrimary;
        }

        let Some(mut window) = self.search().await else {
            tracing::warn!(
                class = %self.window_class,
                retries = self.policy.retries,
                "instance lock is held but no window answered, starting as primary"
            );
            return Outcome::ProceedAsPrimary;
        };

        release();

        let request = ForwardRequest::new(launch.clone());
        let in_tray = match window.forward(&request).await {
            Ok(in_tray) => in_tray,
            Err(e) => {
                tracing::warn!(error = %e, "forwarding to running instance failed, starting as primary");
                return Outcome::ProceedAsPrimary;
            }
        };
        tracing::info!(files = launch.files.len(), in_tray, "request forwarded to running instance");

        if !in_tray {
            match window.placement().await {
                Ok(placement) => {
                    if let Some(command) = placement.show_command() {
                        if let Err(e) = window.show(command).await {
                            tracing::warn!(error = %e, ?command, "failed to restore running instance");
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "failed to query running instance placement"),
            }
        }

        if let Err(e) = window.set_foreground().await {
            tracing::warn!(error = %e, "failed to bring running instance to front");
        }

        Outcome::ForwardAndExit
    }

    async fn search(&mut self) -> Option<L::Window> {
        if let Some(window) = self.locator.find(&self.window_class).await {
            return Some(window);
        }

        for attempt in 1..=self.policy.retries {
            tokio::time::sleep(self.policy.delay).await;
            if let Some(window) = self.locator.find(&self.window_class).await {
                tracing::debug!(attempt, "running instance found after retry");
                return Some(window);
            }
        }

        None
    }
}
