//! Shell command executor

use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use super::dry_run::DryRun;
use super::retry::{retry, RetryPolicy};
use crate::display::logger;
use crate::error::{OptikitError, OptikitResult};

/// Runs external command lines
pub trait CommandRunner {
    /// Run to completion, echoing output, and return the trimmed stdout
    fn run(&self, command: &str) -> OptikitResult<String>;

    /// Run to completion without echoing anything; used for presence checks
    fn run_silent(&self, command: &str) -> OptikitResult<String>;

    /// Run with the terminal attached (interactive tools, GUI launchers)
    fn run_attached(&self, command: &str) -> OptikitResult<()>;

    /// Run up to `policy.max_attempts` times, pausing between failures
    fn run_with_retry(&self, command: &str, policy: RetryPolicy) -> OptikitResult<String> {
        retry(policy, command, |_| self.run(command))
    }
}

/// Rewrite a `flutter ...` command to go through FVM when requested
pub fn flutter_command(base: &str, use_fvm: bool) -> String {
    match base.strip_prefix("flutter ") {
        Some(rest) if use_fvm => format!("fvm flutter {}", rest),
        _ => base.to_string(),
    }
}

/// Spawns command lines through the platform shell
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor<'a> {
    dry_run: Option<&'a DryRun>,
    working_dir: Option<PathBuf>,
    verbose: bool,
}

impl<'a> ShellExecutor<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record mutating commands instead of running them while `dry_run` is enabled
    pub fn with_dry_run(mut self, dry_run: &'a DryRun) -> Self {
        self.dry_run = Some(dry_run);
        self
    }

    /// Run commands inside `dir` instead of the current directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    fn skipped_by_dry_run(&self, command: &str) -> bool {
        match self.dry_run {
            Some(dry_run) if dry_run.is_enabled() => {
                let description = match &self.working_dir {
                    Some(dir) => format!("Run in {}", dir.display()),
                    None => "Run".to_string(),
                };
                dry_run.record_command(&description, command);
                true
            }
            _ => false,
        }
    }

    fn shell_command(&self, command: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        logger::debug(self.verbose, format!("$ {}", command));
        cmd
    }
}

impl CommandRunner for ShellExecutor<'_> {
    fn run(&self, command: &str) -> OptikitResult<String> {
        if self.skipped_by_dry_run(command) {
            return Ok(String::new());
        }

        let mut child = self
            .shell_command(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(command, e))?;

        // Drain stderr on its own thread so neither pipe can fill up and block the child.
        let stderr = child.stderr.take();
        let stderr_reader = thread::spawn(move || match stderr {
            Some(stderr) => echo_lines(stderr, &mut io::stderr()),
            None => String::new(),
        });

        let stdout_text = match child.stdout.take() {
            Some(stdout) => echo_lines(stdout, &mut io::stdout()),
            None => String::new(),
        };

        let status = child.wait().map_err(|e| spawn_error(command, e))?;
        let stderr_text = stderr_reader.join().unwrap_or_default();

        finish(command, status, &stdout_text, &stderr_text)
    }

    fn run_silent(&self, command: &str) -> OptikitResult<String> {
        let output = self
            .shell_command(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(command, e))?;

        finish(
            command,
            output.status,
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        )
    }

    fn run_attached(&self, command: &str) -> OptikitResult<()> {
        if self.skipped_by_dry_run(command) {
            return Ok(());
        }

        let status = self
            .shell_command(command)
            .status()
            .map_err(|e| spawn_error(command, e))?;

        finish(command, status, "", "").map(|_| ())
    }
}

/// Copy `source` line by line to `sink` until EOF and return everything read.
/// Invalid UTF-8 is replaced lossily and never ends the read.
fn echo_lines(source: impl Read, sink: &mut impl Write) -> String {
    let mut reader = BufReader::new(source);
    let mut captured = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let _ = sink.write_all(line.as_bytes());
                captured.push_str(&line);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }

    let _ = sink.flush();
    captured
}

fn spawn_error(command: &str, err: std::io::Error) -> OptikitError {
    OptikitError::CommandSpawn {
        command: command.to_string(),
        message: err.to_string(),
    }
}

fn finish(command: &str, status: ExitStatus, stdout: &str, stderr: &str) -> OptikitResult<String> {
    if status.success() {
        return Ok(stdout.trim().to_string());
    }

    let detail = if stderr.trim().is_empty() {
        stdout.trim()
    } else {
        stderr.trim()
    };

    Err(OptikitError::CommandFailed {
        command: command.to_string(),
        status: describe_status(status),
        detail: detail.to_string(),
    })
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    struct AlwaysFails {
        calls: Cell<u32>,
    }

    impl CommandRunner for AlwaysFails {
        fn run(&self, command: &str) -> OptikitResult<String> {
            self.calls.set(self.calls.get() + 1);
            Err(OptikitError::CommandFailed {
                command: command.to_string(),
                status: "exit code 1".into(),
                detail: format!("failure #{}", self.calls.get()),
            })
        }

        fn run_silent(&self, command: &str) -> OptikitResult<String> {
            self.run(command)
        }

        fn run_attached(&self, command: &str) -> OptikitResult<()> {
            self.run(command).map(|_| ())
        }
    }

    #[test]
    fn test_flutter_command_rewrite() {
        assert_eq!(flutter_command("flutter clean", true), "fvm flutter clean");
        assert_eq!(flutter_command("flutter pub get", false), "flutter pub get");
        assert_eq!(flutter_command("pod install", true), "pod install");
    }

    #[test]
    fn test_run_with_retry_surfaces_last_failure() {
        let runner = AlwaysFails {
            calls: Cell::new(0),
        };
        let err = runner
            .run_with_retry("pod install", RetryPolicy::new(3, Duration::ZERO))
            .unwrap_err();

        assert_eq!(runner.calls.get(), 3);
        match err {
            OptikitError::CommandFailed { detail, .. } => assert_eq!(detail, "failure #3"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_dry_run_skips_execution() {
        let dry_run = DryRun::new(true);
        let executor = ShellExecutor::new().with_dry_run(&dry_run);

        let output = executor.run("exit 7").unwrap();
        assert!(output.is_empty());
        assert_eq!(dry_run.operations().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_returns_trimmed_stdout() {
        let output = ShellExecutor::new().run("echo '  hello  '").unwrap();
        assert_eq!(output, "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_silent_reports_stderr_on_failure() {
        let err = ShellExecutor::new()
            .run_silent("echo oops 1>&2; exit 3")
            .unwrap_err();

        match err {
            OptikitError::CommandFailed { status, detail, .. } => {
                assert_eq!(status, "exit code 3");
                assert_eq!(detail, "oops");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_silent_ignores_dry_run() {
        let dry_run = DryRun::new(true);
        let executor = ShellExecutor::new().with_dry_run(&dry_run);

        assert_eq!(executor.run_silent("echo present").unwrap(), "present");
        assert!(dry_run.operations().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_in_working_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();

        let output = ShellExecutor::new()
            .in_dir(dir.path())
            .run_silent("ls")
            .unwrap();
        assert_eq!(output, "marker.txt");
    }

    #[test]
    fn test_echo_lines_keeps_reading_past_invalid_utf8() {
        let input: &[u8] = b"caf\xe9\nok\nlast";
        let mut sink = Vec::new();

        let captured = echo_lines(input, &mut sink);
        assert_eq!(captured, "caf\u{fffd}\nok\nlast");
        assert_eq!(sink, captured.as_bytes());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_output_after_non_utf8_line() {
        let output = ShellExecutor::new().run("printf 'caf\\351\\nok\\n'").unwrap();
        assert!(output.contains("ok"), "output was {:?}", output);
        assert!(output.starts_with("caf"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_drains_long_output_after_non_utf8_line() {
        let output = ShellExecutor::new()
            .run("printf '\\377\\n'; yes line | head -n 20000; echo done")
            .unwrap();
        assert!(output.ends_with("done"));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_command_is_failure() {
        let err = ShellExecutor::new()
            .run_silent("definitely-not-a-real-command-optikit")
            .unwrap_err();
        assert!(err.is_command_failure());
    }
}
