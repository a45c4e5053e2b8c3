//! Start/stop logic for the tracked server

use crate::liveness::{Liveness, LivenessCheck, ProcessProbe, RecordExists};
use crate::pid_record::PidRecord;
use crate::platform::resolve_server_executable;
use crate::process::{DetachedLauncher, LaunchSpec, OutputMode, ProcessLauncher};
use crate::signal::{SystemTerminator, Terminator};
use nxcache_core::{Error, Result, SERVER_LOG_DEFAULT, SERVER_LOG_VAR, SERVER_LOG_VERBOSE};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Options for a single `start` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOptions {
    pub pid_file: PathBuf,
    pub verbose: bool,
    pub output: OutputMode,
    /// Probe the recorded pid and clear the record if the process is gone
    pub reap_stale: bool,
}

impl StartOptions {
    pub fn new(pid_file: impl Into<PathBuf>) -> Self {
        Self {
            pid_file: pid_file.into(),
            verbose: false,
            output: OutputMode::Discard,
            reap_stale: false,
        }
    }
}

/// Result of a successful `start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Started {
    pub pid: u32,
    pub executable: PathBuf,
    pub pid_file: PathBuf,
}

/// Result of a successful `stop`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopped {
    pub pid: u32,
}

/// Starts at most one tracked server per pid file and stops it again
pub struct Controller<L = DetachedLauncher, T = SystemTerminator> {
    platform: String,
    install_dir: PathBuf,
    launcher: L,
    terminator: T,
}

impl Controller {
    /// Controller for the host platform using real process primitives
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self::with_parts(
            std::env::consts::OS,
            install_dir,
            DetachedLauncher,
            SystemTerminator,
        )
    }
}

impl<L: ProcessLauncher, T: Terminator> Controller<L, T> {
    pub fn with_parts(
        platform: impl Into<String>,
        install_dir: impl Into<PathBuf>,
        launcher: L,
        terminator: T,
    ) -> Self {
        Self {
            platform: platform.into(),
            install_dir: install_dir.into(),
            launcher,
            terminator,
        }
    }

    /// Spawn the server detached and record its pid.
    ///
    /// Fails without spawning when the platform is unsupported or a server
    /// is already tracked at `options.pid_file`.
    pub fn start(&self, options: &StartOptions) -> Result<Started> {
        let executable = resolve_server_executable(&self.platform, &self.install_dir)?;
        let record = PidRecord::new(&options.pid_file);

        let liveness: &dyn LivenessCheck = if options.reap_stale {
            &ProcessProbe
        } else {
            &RecordExists
        };

        match liveness.check(&record)? {
            Liveness::Absent => {}
            Liveness::Tracked(_) => return Err(Error::already_running(record.path())),
            Liveness::Stale { reason } => {
                warn!(pid_file = %record.path().display(), %reason, "removing stale pid file");
                record.remove()?;
            }
        }

        let spec = LaunchSpec {
            executable: executable.clone(),
            env: vec![(
                SERVER_LOG_VAR.to_string(),
                server_log_level(options.verbose).to_string(),
            )],
            output: options.output,
        };
        let pid = self.launcher.launch(&spec)?;

        if let Err(e) = record.create(pid) {
            // Another start won the race for the record; do not leave an
            // untracked server behind
            warn!(pid, error = %e, "could not record server pid, terminating it");
            if let Err(kill_err) = self.terminator.terminate(pid) {
                warn!(pid, error = %kill_err, "failed to terminate unrecorded server");
            }
            return Err(e);
        }

        info!(pid, pid_file = %record.path().display(), "server started");
        Ok(Started {
            pid,
            executable,
            pid_file: options.pid_file.clone(),
        })
    }

    /// Terminate the tracked server and remove its record.
    ///
    /// Once a record was found it is removed on every path, including a
    /// failed signal delivery, so a later `start` is never blocked by it.
    pub fn stop(&self, pid_file: &Path) -> Result<Stopped> {
        let record = PidRecord::new(pid_file);
        if !record.exists() {
            return Err(Error::not_running(pid_file));
        }

        let pid = match record.read() {
            Ok(pid) => pid,
            Err(e) => {
                remove_after_failure(&record);
                return Err(e);
            }
        };

        if let Err(e) = self.terminator.terminate(pid) {
            remove_after_failure(&record);
            return Err(e);
        }

        record.remove()?;
        info!(pid, "server stopped");
        Ok(Stopped { pid })
    }
}

fn remove_after_failure(record: &PidRecord) {
    if let Err(e) = record.remove() {
        warn!(pid_file = %record.path().display(), error = %e, "failed to remove pid file");
    }
}

/// `RUST_LOG` value handed to the server
pub const fn server_log_level(verbose: bool) -> &'static str {
    if verbose {
        SERVER_LOG_VERBOSE
    } else {
        SERVER_LOG_DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Default, Clone)]
    struct FakeLauncher {
        next_pid: Rc<Cell<u32>>,
        launched: Rc<RefCell<Vec<LaunchSpec>>>,
    }

    impl ProcessLauncher for FakeLauncher {
        fn launch(&self, spec: &LaunchSpec) -> Result<u32> {
            self.launched.borrow_mut().push(spec.clone());
            let pid = self.next_pid.get() + 1;
            self.next_pid.set(pid);
            Ok(pid)
        }
    }

    struct FailingLauncher;

    impl ProcessLauncher for FailingLauncher {
        fn launch(&self, spec: &LaunchSpec) -> Result<u32> {
            Err(Error::spawn(
                &spec.executable,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            ))
        }
    }

    #[derive(Default, Clone)]
    struct FakeTerminator {
        fail: bool,
        calls: Rc<RefCell<Vec<u32>>>,
    }

    impl Terminator for FakeTerminator {
        fn terminate(&self, pid: u32) -> Result<()> {
            self.calls.borrow_mut().push(pid);
            if self.fail {
                Err(Error::signal(pid, "no such process"))
            } else {
                Ok(())
            }
        }
    }

    fn controller(
        platform: &str,
        launcher: FakeLauncher,
        terminator: FakeTerminator,
    ) -> Controller<FakeLauncher, FakeTerminator> {
        Controller::with_parts(platform, "/opt/nxcache", launcher, terminator)
    }

    #[test]
    fn test_start_records_spawned_pid() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        let launcher = FakeLauncher::default();
        let ctl = controller("linux", launcher.clone(), FakeTerminator::default());

        let started = ctl.start(&StartOptions::new(&pid_file)).unwrap();

        assert_eq!(started.pid, 1);
        assert_eq!(fs::read_to_string(&pid_file).unwrap(), "1");
        let launched = launcher.launched.borrow();
        assert_eq!(launched.len(), 1);
        assert!(launched[0]
            .executable
            .ends_with(Path::new("bin").join("linux").join("nx-cache-server")));
        assert_eq!(launched[0].output, OutputMode::Discard);
    }

    #[test]
    fn test_start_sets_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let launcher = FakeLauncher::default();
        let ctl = controller("linux", launcher.clone(), FakeTerminator::default());

        ctl.start(&StartOptions::new(temp_dir.path().join("quiet.pid")))
            .unwrap();
        let mut verbose = StartOptions::new(temp_dir.path().join("loud.pid"));
        verbose.verbose = true;
        ctl.start(&verbose).unwrap();

        let launched = launcher.launched.borrow();
        assert_eq!(
            launched[0].env,
            vec![("RUST_LOG".to_string(), "info".to_string())]
        );
        assert_eq!(
            launched[1].env,
            vec![("RUST_LOG".to_string(), "trace".to_string())]
        );
    }

    #[test]
    fn test_second_start_conflicts_and_keeps_pid() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        let launcher = FakeLauncher::default();
        let ctl = controller("linux", launcher.clone(), FakeTerminator::default());
        let options = StartOptions::new(&pid_file);

        ctl.start(&options).unwrap();
        let second = ctl.start(&options);

        assert!(matches!(second, Err(Error::AlreadyRunning { .. })));
        assert_eq!(fs::read_to_string(&pid_file).unwrap(), "1");
        assert_eq!(launcher.launched.borrow().len(), 1);
    }

    #[test]
    fn test_start_on_unsupported_platform_spawns_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        let launcher = FakeLauncher::default();
        let ctl = controller("haiku", launcher.clone(), FakeTerminator::default());

        let result = ctl.start(&StartOptions::new(&pid_file));

        assert!(matches!(result, Err(Error::Configuration { .. })));
        assert!(launcher.launched.borrow().is_empty());
        assert!(!pid_file.exists());
    }

    #[test]
    fn test_start_selects_binary_per_platform() {
        let temp_dir = TempDir::new().unwrap();
        let cases = [
            ("win32", Path::new("bin").join("win").join("nx-cache-server.exe")),
            ("linux", Path::new("bin").join("linux").join("nx-cache-server")),
            ("darwin", Path::new("bin").join("mac").join("nx-cache-server")),
        ];

        for (platform, suffix) in cases {
            let launcher = FakeLauncher::default();
            let ctl = controller(platform, launcher.clone(), FakeTerminator::default());
            let pid_file = temp_dir.path().join(format!("{platform}.pid"));

            ctl.start(&StartOptions::new(&pid_file)).unwrap();

            assert!(launcher.launched.borrow()[0].executable.ends_with(&suffix));
        }
    }

    #[test]
    fn test_spawn_failure_propagates_without_record() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        let ctl = Controller::with_parts(
            "linux",
            "/opt/nxcache",
            FailingLauncher,
            FakeTerminator::default(),
        );

        let result = ctl.start(&StartOptions::new(&pid_file));

        assert!(matches!(result, Err(Error::Spawn { .. })));
        assert!(!pid_file.exists());
    }

    #[test]
    fn test_lost_record_race_terminates_child() {
        struct RacingLauncher {
            pid_file: PathBuf,
        }

        impl ProcessLauncher for RacingLauncher {
            fn launch(&self, _spec: &LaunchSpec) -> Result<u32> {
                // A concurrent start writes its record while we spawn
                fs::write(&self.pid_file, "7").unwrap();
                Ok(99)
            }
        }

        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        let terminator = FakeTerminator::default();
        let ctl = Controller::with_parts(
            "linux",
            "/opt/nxcache",
            RacingLauncher {
                pid_file: pid_file.clone(),
            },
            terminator.clone(),
        );

        let result = ctl.start(&StartOptions::new(&pid_file));

        assert!(matches!(result, Err(Error::AlreadyRunning { .. })));
        assert_eq!(*terminator.calls.borrow(), vec![99]);
        assert_eq!(fs::read_to_string(&pid_file).unwrap(), "7");
    }

    #[test]
    fn test_stale_record_blocks_start_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        fs::write(&pid_file, "not-available").unwrap();
        let launcher = FakeLauncher::default();
        let ctl = controller("linux", launcher.clone(), FakeTerminator::default());

        let result = ctl.start(&StartOptions::new(&pid_file));

        assert!(matches!(result, Err(Error::AlreadyRunning { .. })));
        assert!(launcher.launched.borrow().is_empty());
    }

    #[test]
    fn test_reap_stale_replaces_unusable_record() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        fs::write(&pid_file, "not-available").unwrap();
        let launcher = FakeLauncher::default();
        let ctl = controller("linux", launcher.clone(), FakeTerminator::default());
        let mut options = StartOptions::new(&pid_file);
        options.reap_stale = true;

        let started = ctl.start(&options).unwrap();

        assert_eq!(fs::read_to_string(&pid_file).unwrap(), started.pid.to_string());
    }

    #[test]
    fn test_reap_stale_still_refuses_live_server() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        fs::write(&pid_file, std::process::id().to_string()).unwrap();
        let launcher = FakeLauncher::default();
        let ctl = controller("linux", launcher.clone(), FakeTerminator::default());
        let mut options = StartOptions::new(&pid_file);
        options.reap_stale = true;

        let result = ctl.start(&options);

        assert!(matches!(result, Err(Error::AlreadyRunning { .. })));
        assert!(launcher.launched.borrow().is_empty());
    }

    #[test]
    fn test_stop_without_record_sends_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let terminator = FakeTerminator::default();
        let ctl = controller("linux", FakeLauncher::default(), terminator.clone());

        let result = ctl.stop(&temp_dir.path().join("server.pid"));

        assert!(matches!(result, Err(Error::NotRunning { .. })));
        assert!(terminator.calls.borrow().is_empty());
    }

    #[test]
    fn test_stop_signals_recorded_pid_and_removes_record() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        fs::write(&pid_file, "10").unwrap();
        let terminator = FakeTerminator::default();
        let ctl = controller("linux", FakeLauncher::default(), terminator.clone());

        let stopped = ctl.stop(&pid_file).unwrap();

        assert_eq!(stopped, Stopped { pid: 10 });
        assert_eq!(*terminator.calls.borrow(), vec![10]);
        assert!(!pid_file.exists());
    }

    #[test]
    fn test_failed_stop_still_removes_record() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        fs::write(&pid_file, "10").unwrap();
        let terminator = FakeTerminator {
            fail: true,
            ..Default::default()
        };
        let ctl = controller("linux", FakeLauncher::default(), terminator.clone());

        let result = ctl.stop(&pid_file);

        assert!(matches!(result, Err(Error::Signal { pid: 10, .. })));
        assert_eq!(*terminator.calls.borrow(), vec![10]);
        assert!(!pid_file.exists());
    }

    #[test]
    fn test_unparsable_record_is_removed_without_signal() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        fs::write(&pid_file, "not-available").unwrap();
        let terminator = FakeTerminator::default();
        let ctl = controller("linux", FakeLauncher::default(), terminator.clone());

        let result = ctl.stop(&pid_file);

        assert!(matches!(result, Err(Error::InvalidPidRecord { .. })));
        assert!(terminator.calls.borrow().is_empty());
        assert!(!pid_file.exists());
    }

    #[test]
    fn test_start_stop_start_cycle() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("server.pid");
        let terminator = FakeTerminator::default();
        let ctl = controller("linux", FakeLauncher::default(), terminator.clone());
        let options = StartOptions::new(&pid_file);

        let first = ctl.start(&options).unwrap();
        ctl.stop(&pid_file).unwrap();
        let second = ctl.start(&options).unwrap();

        assert_eq!(*terminator.calls.borrow(), vec![first.pid]);
        assert_eq!(fs::read_to_string(&pid_file).unwrap(), second.pid.to_string());
    }
}
