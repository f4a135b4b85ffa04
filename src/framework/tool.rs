//! Running external tools with a time limit

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, SpeckitError};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs an external program to completion
///
/// Implementations report a non-zero exit, a spawn failure and a timeout all
/// as [`SpeckitError::ToolFailed`].
pub trait ToolRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path, timeout: Duration) -> Result<()>;
}

/// [`ToolRunner`] backed by `std::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolRunner;

fn tool_failed(program: &str, reason: impl Into<String>) -> SpeckitError {
    SpeckitError::ToolFailed {
        tool: program.to_string(),
        reason: reason.into(),
    }
}

/// Drain a child pipe on its own thread so a chatty tool never blocks on a full pipe
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut text);
        }
        text
    })
}

fn wait_with_deadline(
    child: &mut Child,
    program: &str,
    timeout: Duration,
) -> Result<std::process::ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(tool_failed(
                program,
                format!("timed out after {}s", timeout.as_secs_f32()),
            ));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

impl ToolRunner for SystemToolRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path, timeout: Duration) -> Result<()> {
        tracing::debug!(program, ?args, cwd = %cwd.display(), "running tool");

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| tool_failed(program, e.to_string()))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let status = wait_with_deadline(&mut child, program, timeout)?;

        let _ = stdout.join();
        let stderr = stderr.join().unwrap_or_default();

        if status.success() {
            return Ok(());
        }

        let detail = stderr.lines().rev().find(|line| !line.trim().is_empty());
        Err(tool_failed(
            program,
            match detail {
                Some(line) => format!("{status}: {}", line.trim()),
                None => status.to_string(),
            },
        ))
    }
}
