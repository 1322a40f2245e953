//! Local subprocess launching.
//!
//! Children are spawned in their own process group and left running when
//! the server exits. Their output is drained and logged by a tokio task per
//! child, so a chatty or silent program never stalls the dispatch loop.

use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::LaunchError;

/// Starts a program with its final argv. Does not wait for it.
pub trait Spawner {
    fn spawn(&self, program: &str, args: &[String]) -> Result<(), LaunchError>;
}

/// A started child and the task that drains it.
#[derive(Debug)]
pub struct LaunchedProcess {
    pub pid: Option<u32>,
    /// Resolves with the exit status once output is drained and the child
    /// has been reaped.
    pub finished: JoinHandle<Option<ExitStatus>>,
}

/// Spawns real processes on a tokio runtime.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    runtime: Handle,
}

impl ProcessLauncher {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    pub fn launch(&self, program: &str, args: &[String]) -> Result<LaunchedProcess, LaunchError> {
        let _guard = self.runtime.enter();
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|source| LaunchError {
            program: program.to_string(),
            source,
        })?;
        let pid = child.id();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let program = program.to_string();

        let finished = self.runtime.spawn(async move {
            tokio::join!(
                drain(stdout, &program, "stdout"),
                drain(stderr, &program, "stderr")
            );
            match child.wait().await {
                Ok(status) => {
                    info!(program = %program, %status, "program exited");
                    Some(status)
                }
                Err(e) => {
                    warn!(program = %program, "failed to reap program: {e}");
                    None
                }
            }
        });

        Ok(LaunchedProcess { pid, finished })
    }
}

impl Spawner for ProcessLauncher {
    fn spawn(&self, program: &str, args: &[String]) -> Result<(), LaunchError> {
        let launched = self.launch(program, args)?;
        info!(program, pid = ?launched.pid, "started");
        Ok(())
    }
}

async fn drain<R>(pipe: Option<R>, program: &str, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return;
    };
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => return,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                info!(program, stream, "output: {}", line.trim_end());
            }
            Err(e) => {
                warn!(program, stream, "stopped reading output: {e}");
                return;
            }
        }
    }
}
