//! Named, process-wide mutual exclusion backed by an advisory file lock.
//!
//! Every instance that gets past the check keeps a shared lock on the file
//! until it exits. An instance is the first one exactly when its exclusive
//! attempt succeeds, so the name stays taken while any holder is alive,
//! not just the one that created it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

#[derive(Debug)]
pub struct NamedLock {
    path: PathBuf,
    file: Option<File>,
    already_running: bool,
}

impl NamedLock {
    /// Open `<dir>/<name>.lock`, test it with a non-blocking exclusive
    /// attempt, then settle on a shared hold.
    ///
    /// A lock held by another process is not an error: the result simply
    /// reports [`already_running`](Self::already_running).
    pub fn acquire(dir: &Path, name: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{name}.lock"));
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let already_running = match file.try_lock_exclusive() {
            Ok(()) => false,
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => true,
            Err(e) => return Err(e),
        };

        if already_running {
            // Exclusive holds only last while a newcomer writes its pid.
            file.lock_shared()?;
            tracing::debug!(path = %path.display(), "instance lock already held");
        } else {
            file.set_len(0)?;
            write!(file, "{}", std::process::id())?;
            // flock converts in place; LockFileEx stacks, so drop the
            // exclusive range first there.
            #[cfg(windows)]
            file.unlock()?;
            file.lock_shared()?;
            tracing::debug!(path = %path.display(), "instance lock acquired");
        }

        Ok(Self {
            path,
            file: Some(file),
            already_running,
        })
    }

    /// Another process held the lock when this one tried to take it.
    pub fn already_running(&self) -> bool {
        self.already_running
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop this process's hold on the name.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = file.unlock() {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to unlock instance lock");
            }
            tracing::debug!(path = %self.path.display(), "instance lock handle released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_sees_running_instance() {
        let dir = tempfile::tempdir().unwrap();

        let first = NamedLock::acquire(dir.path(), "inst").unwrap();
        assert!(!first.already_running());
        assert_eq!(first.path(), dir.path().join("inst.lock"));

        let second = NamedLock::acquire(dir.path(), "inst").unwrap();
        assert!(second.already_running());

        let other = NamedLock::acquire(dir.path(), "other").unwrap();
        assert!(!other.already_running());
    }

    #[test]
    fn release_frees_the_name() {
        let dir = tempfile::tempdir().unwrap();

        let mut first = NamedLock::acquire(dir.path(), "inst").unwrap();
        first.release();
        first.release();

        let second = NamedLock::acquire(dir.path(), "inst").unwrap();
        assert!(!second.already_running());
    }

    #[test]
    fn name_stays_taken_while_any_holder_lives() {
        let dir = tempfile::tempdir().unwrap();

        let first = NamedLock::acquire(dir.path(), "inst").unwrap();
        let second = NamedLock::acquire(dir.path(), "inst").unwrap();
        assert!(second.already_running());

        drop(first);
        let third = NamedLock::acquire(dir.path(), "inst").unwrap();
        assert!(third.already_running());

        drop(second);
        drop(third);
        let fourth = NamedLock::acquire(dir.path(), "inst").unwrap();
        assert!(!fourth.already_running());
    }

    #[test]
    fn stale_lock_file_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("inst.lock"), "99999").unwrap();

        let lock = NamedLock::acquire(dir.path(), "inst").unwrap();
        assert!(!lock.already_running());
        assert_eq!(
            fs::read_to_string(lock.path()).unwrap(),
            std::process::id().to_string()
        );
    }

    #[test]
    fn missing_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let lock = NamedLock::acquire(&nested, "inst").unwrap();
        assert!(lock.path().exists());
    }
}
