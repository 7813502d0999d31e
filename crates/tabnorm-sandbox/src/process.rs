//! Child process supervision: output draining and the wall-clock timeout.

use std::io::Read;
use std::process::{Child, ExitStatus};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Result, SandboxError};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long to wait for the output pipes to close after the child is gone.
/// Background processes the child left behind may keep them open.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Bytes kept per stream; the rest is read and dropped.
const MAX_CAPTURE_BYTES: usize = 64 * 1024;

pub(crate) struct Finished {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub timed_out: bool,
}

struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
    handle: Option<JoinHandle<()>>,
}

impl Capture {
    fn start<R: Read + Send + 'static>(stream: Option<R>) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let handle = stream.map(|mut stream| {
            let sink = Arc::clone(&buffer);
            thread::spawn(move || {
                let mut chunk = [0u8; 8192];
                loop {
                    match stream.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            if let Ok(mut buf) = sink.lock() {
                                let room = MAX_CAPTURE_BYTES.saturating_sub(buf.len());
                                buf.extend_from_slice(&chunk[..n.min(room)]);
                            }
                        }
                    }
                }
            })
        });
        Self { buffer, handle }
    }

    fn finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Collect what was captured. Joins the reader if it has finished,
    /// otherwise leaves it detached.
    fn take(mut self) -> Vec<u8> {
        if let Some(handle) = self.handle.take()
            && handle.is_finished()
        {
            let _ = handle.join();
        }
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }
}

/// Kill the child and, on unix, every process left in its process group.
///
/// Must run before the child is reaped, while its pid still names the group.
fn kill_process_group(child: &mut Child) {
    #[cfg(unix)]
    {
        use std::process::{Command, Stdio};

        let group = format!("-{}", child.id());
        let result = Command::new("kill")
            .args(["-KILL", "--", group.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(error) = result {
            tracing::debug!(%error, "could not signal the process group");
        }
    }
    let _ = child.kill();
}

/// Wait for `child` up to `timeout`, killing it when the deadline passes.
pub(crate) fn supervise(mut child: Child, timeout: Duration) -> Result<Finished> {
    let stdout = Capture::start(child.stdout.take());
    let stderr = Capture::start(child.stderr.take());

    let start = Instant::now();
    let mut timed_out = false;
    let status = loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|source| SandboxError::Wait { source })?
        {
            break status;
        }

        if start.elapsed() > timeout {
            timed_out = true;
            kill_process_group(&mut child);
            let status = child.wait().map_err(|source| SandboxError::Wait { source })?;
            break status;
        }

        thread::sleep(POLL_INTERVAL);
    };

    let drain_start = Instant::now();
    while !(stdout.finished() && stderr.finished()) && drain_start.elapsed() < DRAIN_GRACE {
        thread::sleep(Duration::from_millis(10));
    }

    Ok(Finished {
        status,
        stdout: stdout.take(),
        stderr: stderr.take(),
        timed_out,
    })
}
