//! Secondary → primary handoff over real locks and endpoints.

mod common;

use common::{parse, spawn_fake_window, TEST_CLASS};
use padlaunch::instance::{
    InstanceCoordinator, InstanceRole, NamedLock, Outcome, Placement, SearchPolicy, ShowCommand,
};
use padlaunch::ipc::{endpoint_path, EndpointLocator, IpcServer};
use padlaunch::shutdown::ShutdownCoordinator;
use std::time::{Duration, Instant};

const LOCK_NAME: &str = "handoff-test";

fn quick_policy() -> SearchPolicy {
    SearchPolicy {
        retries: 3,
        delay: Duration::from_millis(10),
    }
}

#[test]
fn test_second_lock_sees_first_holder() {
    let dir = tempfile::tempdir().unwrap();

    let mut primary = NamedLock::acquire(dir.path(), LOCK_NAME).unwrap();
    assert!(!primary.already_running());

    let secondary = NamedLock::acquire(dir.path(), LOCK_NAME).unwrap();
    assert!(secondary.already_running());
    assert_eq!(
        InstanceRole::detect(secondary.already_running(), false),
        InstanceRole::Secondary
    );
    drop(secondary);

    primary.release();
    let next = NamedLock::acquire(dir.path(), LOCK_NAME).unwrap();
    assert!(!next.already_running());
}

#[tokio::test]
async fn test_secondary_forwards_files_to_running_primary() {
    let dir = tempfile::tempdir().unwrap();
    let _primary_lock = NamedLock::acquire(dir.path(), LOCK_NAME).unwrap();
    let (server, commands) = IpcServer::bind(dir.path(), TEST_CLASS).await.unwrap();
    let window = spawn_fake_window(commands, false, Placement::Maximized);
    let shutdown = ShutdownCoordinator::new();
    let server_task = tokio::spawn(server.run(shutdown.handle()));

    let mut secondary_lock = NamedLock::acquire(dir.path(), LOCK_NAME).unwrap();
    let role = InstanceRole::detect(secondary_lock.already_running(), false);
    let launch = parse(r#"-n10 notes.txt "with space.md""#);

    let mut coordinator =
        InstanceCoordinator::new(EndpointLocator::new(dir.path()), TEST_CLASS, quick_policy());
    let outcome = coordinator
        .resolve(role, &launch, || secondary_lock.release())
        .await;

    assert_eq!(outcome, Outcome::ForwardAndExit);
    assert_eq!(outcome.exit_code(), Some(0));
    {
        let log = window.lock();
        assert_eq!(log.forwarded.len(), 1);
        assert_eq!(log.forwarded[0].launch.files, vec!["notes.txt", "with space.md"]);
        assert_eq!(log.forwarded[0].launch.line, Some(10));
        assert_eq!(log.shown, vec![ShowCommand::Maximize]);
        assert_eq!(log.foreground, 1);
    }

    shutdown.signal();
    server_task.await.unwrap();
    assert!(!endpoint_path(dir.path(), TEST_CLASS).exists());
}

#[tokio::test]
async fn test_primary_in_tray_is_only_restored() {
    let dir = tempfile::tempdir().unwrap();
    let (server, commands) = IpcServer::bind(dir.path(), TEST_CLASS).await.unwrap();
    let window = spawn_fake_window(commands, true, Placement::Minimized);
    let shutdown = ShutdownCoordinator::new();
    tokio::spawn(server.run(shutdown.handle()));

    let mut coordinator =
        InstanceCoordinator::new(EndpointLocator::new(dir.path()), TEST_CLASS, quick_policy());
    let outcome = coordinator
        .resolve(InstanceRole::Secondary, &parse("a.txt"), || {})
        .await;

    assert_eq!(outcome, Outcome::ForwardAndExit);
    let log = window.lock();
    assert!(log.shown.is_empty());
    assert_eq!(log.foreground, 1);
    drop(log);

    shutdown.signal();
}

#[tokio::test]
async fn test_stale_lock_without_window_starts_as_primary() {
    let dir = tempfile::tempdir().unwrap();
    let _foreign_lock = NamedLock::acquire(dir.path(), LOCK_NAME).unwrap();
    let secondary_lock = NamedLock::acquire(dir.path(), LOCK_NAME).unwrap();
    let role = InstanceRole::detect(secondary_lock.already_running(), false);
    assert_eq!(role, InstanceRole::Secondary);

    let mut coordinator =
        InstanceCoordinator::new(EndpointLocator::new(dir.path()), TEST_CLASS, quick_policy());
    let started = Instant::now();
    let outcome = coordinator.resolve(role, &parse("a.txt"), || {}).await;

    assert_eq!(outcome, Outcome::ProceedAsPrimary);
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_multi_instance_never_searches() {
    let dir = tempfile::tempdir().unwrap();
    let _primary_lock = NamedLock::acquire(dir.path(), LOCK_NAME).unwrap();
    let lock = NamedLock::acquire(dir.path(), LOCK_NAME).unwrap();

    let launch = parse("-multiInst a.txt");
    let role = InstanceRole::detect(lock.already_running(), launch.multi_instance);
    assert_eq!(role, InstanceRole::Primary);

    let mut coordinator =
        InstanceCoordinator::new(EndpointLocator::new(dir.path()), TEST_CLASS, quick_policy());
    assert_eq!(
        coordinator.resolve(role, &launch, || {}).await,
        Outcome::ProceedAsPrimary
    );
}
