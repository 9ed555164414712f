use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;

use padlaunch::args::{self, DefaultLookup};
use padlaunch::config::Config;
use padlaunch::instance::{InstanceCoordinator, InstanceRole, NamedLock, Placement, ShowCommand};
use padlaunch::ipc::{EndpointLocator, IpcServer, WindowCommand};
use padlaunch::launch::{Dispatcher, LaunchConfig};
use padlaunch::logging::init_tracing;
use padlaunch::shutdown::ShutdownCoordinator;

#[tokio::main]
async fn main() -> ExitCode {
    let started_at = Instant::now();
    init_tracing();

    match run(started_at).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(started_at: Instant) -> anyhow::Result<ExitCode> {
    let raw = args::command_line_from_args(
        std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned()),
    );
    tracing::info!(command_line = %raw, pid = std::process::id(), "starting");

    let mut params = args::prepare_params(&raw);
    let settings_override = args::take_settings_dir(&mut params);
    // Help must work even when the settings it would load are broken.
    if params.peek_flag(args::FLAG_HELP) {
        print!("{}", args::help_text());
        return Ok(ExitCode::SUCCESS);
    }
    let settings_dir = Config::settings_dir(settings_override.as_deref());
    let config = Config::load(&settings_dir)?;
    let lookup = DefaultLookup::new(config.localization.dir(&settings_dir));
    let launch = args::extract_launch_config(params, settings_override, &lookup);

    let runtime_dir = config.instance.runtime_dir();
    let mut lock = match NamedLock::acquire(&runtime_dir, &config.instance.mutex_name) {
        Ok(lock) => Some(lock),
        Err(e) => {
            tracing::warn!(dir = %runtime_dir.display(), error = %e, "instance lock unavailable, assuming first instance");
            None
        }
    };
    let already_running = lock.as_ref().is_some_and(NamedLock::already_running);
    let multi_instance = launch.multi_instance || config.instance.always_multi_instance;
    let role = InstanceRole::detect(already_running, multi_instance);
    tracing::debug!(?role, already_running, multi_instance, "instance role");

    let mut coordinator = InstanceCoordinator::new(
        EndpointLocator::new(&runtime_dir),
        config.instance.window_class.clone(),
        config.instance.search_policy(),
    );
    let outcome = coordinator
        .resolve(role, &launch, || {
            if let Some(lock) = lock.as_mut() {
                lock.release();
            }
        })
        .await;
    if let Some(code) = outcome.exit_code() {
        return Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)));
    }

    let batch = launch.is_batch();
    let mut window = WindowState::new(&launch);
    LoggingDispatcher { started_at }.dispatch(launch)?;
    if batch {
        return Ok(ExitCode::SUCCESS);
    }

    let Some((server, mut commands)) =
        IpcServer::claim(&runtime_dir, &config.instance.window_class).await?
    else {
        tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
        return Ok(ExitCode::SUCCESS);
    };
    let shutdown = ShutdownCoordinator::new();
    let server_task = tokio::spawn(server.run(shutdown.handle()));

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("waiting for Ctrl-C")?;
                break;
            }
            command = commands.recv() => match command {
                Some(command) => window.handle(command),
                None => break,
            },
        }
    }

    shutdown.signal();
    let _ = server_task.await;
    drop(lock);
    Ok(ExitCode::SUCCESS)
}

/// Stands in for the editor bootstrap: reports what it was asked to do.
struct LoggingDispatcher {
    started_at: Instant,
}

impl Dispatcher for LoggingDispatcher {
    type Error = serde_json::Error;

    fn dispatch(&mut self, launch: LaunchConfig) -> Result<(), Self::Error> {
        tracing::info!(files = launch.files.len(), "launching editor");
        println!("{}", serde_json::to_string(&launch)?);
        if launch.show_loading_time {
            let elapsed = self.started_at.elapsed();
            tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "startup finished");
            eprintln!("Loading time: {:.3} s", elapsed.as_secs_f64());
        }
        Ok(())
    }
}

/// The primary's main window as far as other instances can tell.
struct WindowState {
    in_tray: bool,
    placement: Placement,
}

impl WindowState {
    fn new(launch: &LaunchConfig) -> Self {
        Self {
            in_tray: launch.system_tray,
            placement: Placement::Normal,
        }
    }

    fn handle(&mut self, command: WindowCommand) {
        match command {
            WindowCommand::Forward {
                request,
                respond_to,
            } => {
                let was_in_tray = self.in_tray;
                if request.restore_from_tray {
                    self.in_tray = false;
                }
                match serde_json::to_string(&request.launch) {
                    Ok(json) => println!("{json}"),
                    Err(e) => tracing::warn!(error = %e, "failed to report forwarded request"),
                }
                if respond_to.send(was_in_tray).is_err() {
                    tracing::trace!("forward answer dropped (instance gone)");
                }
            }
            WindowCommand::Placement { respond_to } => {
                let _ = respond_to.send(self.placement);
            }
            WindowCommand::Show {
                command,
                respond_to,
            } => {
                self.placement = match command {
                    ShowCommand::Maximize => Placement::Maximized,
                    ShowCommand::Restore => Placement::Normal,
                };
                let _ = respond_to.send(());
            }
            WindowCommand::Foreground { respond_to } => {
                tracing::debug!("brought to foreground");
                let _ = respond_to.send(());
            }
        }
    }
}
