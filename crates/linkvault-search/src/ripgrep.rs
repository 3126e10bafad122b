//! Text search backed by a `rg --json` subprocess.
//!
//! Output is consumed line by line while the process runs, so memory grows
//! with the number of results rather than with file or line size. Once the
//! result limit is reached the process is killed; that kill is a normal
//! outcome, not a failure. On unix the tool runs in its own process group
//! and the whole group is killed, so helpers it started cannot hold the
//! pipes open.

use crate::engine::{SearchEngine, absolute_root, require_text, resolve_search_root};
use crate::parse::parse_rg_line;
use crate::query::SearchQuery;
use async_trait::async_trait;
use linkvault_core::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Name used for the tool in errors
pub const TOOL_NAME: &str = "ripgrep";

/// Exit code ripgrep uses for "ran fine, nothing matched"
const EXIT_NO_MATCH: i32 = 1;

/// How the stdout stream stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The result limit was reached and the process was killed
    LimitReached,
    /// The process closed stdout on its own
    Exhausted,
    /// The caller's cancellation token fired
    Cancelled,
}

/// Search engine running ripgrep as a child process.
#[derive(Debug, Clone)]
pub struct RipgrepEngine {
    vault_root: PathBuf,
    program: PathBuf,
}

impl RipgrepEngine {
    /// Create an engine for `vault_root` using the `rg` on `PATH`
    pub fn new(vault_root: impl Into<PathBuf>) -> Self {
        Self::with_program(vault_root, "rg")
    }

    /// Create an engine using a specific ripgrep binary
    pub fn with_program(vault_root: impl Into<PathBuf>, program: impl Into<PathBuf>) -> Self {
        Self {
            vault_root: vault_root.into(),
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether `program --version` runs successfully.
    pub async fn probe(program: &Path) -> bool {
        let status = Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        match status {
            Ok(status) => status.success(),
            Err(e) => {
                log::debug!("ripgrep probe of {} failed: {}", program.display(), e);
                false
            }
        }
    }

    fn command(&self, text: &str, scope: &Path, case_sensitive: bool) -> Command {
        let mut command = Command::new(&self.program);
        command.args(["--json", "--line-number", "--glob", "*.md"]);
        if !case_sensitive {
            command.arg("-i");
        }
        command
            .arg("--")
            .arg(text)
            .arg(scope)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);
        command
    }

    /// Read match lines until exhaustion, the limit or cancellation.
    async fn read_matches<R: AsyncRead + Unpin>(
        reader: &mut BufReader<R>,
        root: &Path,
        query: &SearchQuery,
        cancel: &CancellationToken,
        results: &mut Vec<SearchResult>,
    ) -> io::Result<StreamEnd> {
        let mut line = Vec::new();
        loop {
            line.clear();
            let read = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(StreamEnd::Cancelled),
                read = reader.read_until(b'\n', &mut line) => read?,
            };
            if read == 0 {
                return Ok(StreamEnd::Exhausted);
            }
            if let Some(result) = parse_rg_line(&line, root, query.context_chars()) {
                results.push(result);
                if results.len() >= query.limit() {
                    return Ok(StreamEnd::LimitReached);
                }
            }
        }
    }
}

/// Kill the tool together with its process group.
fn kill_tool(child: &mut Child) {
    kill_group(child);
    if let Err(e) = child.start_kill() {
        log::trace!("ripgrep already exited: {}", e);
    }
}

#[cfg(unix)]
fn kill_group(child: &Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        log::debug!("Failed to kill ripgrep process group {}: {}", pid, e);
    }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) {}

async fn drain_stderr(mut stderr: ChildStderr) -> String {
    let mut buf = Vec::new();
    if let Err(e) = stderr.read_to_end(&mut buf).await {
        log::debug!("Failed to read ripgrep stderr: {}", e);
    }
    String::from_utf8_lossy(&buf).trim().to_string()
}

/// Turn the stream outcome and exit status into the call's result.
///
/// A limit-reached stream is successful whatever the exit status says,
/// since the process was killed on purpose.
pub fn settle(
    end: StreamEnd,
    status: io::Result<ExitStatus>,
    stderr: &str,
    results: Vec<SearchResult>,
) -> Result<Vec<SearchResult>> {
    match end {
        StreamEnd::Cancelled => Err(Error::Cancelled),
        StreamEnd::LimitReached => Ok(results),
        StreamEnd::Exhausted => {
            let status = status.map_err(Error::io)?;
            match status.code() {
                Some(0) => Ok(results),
                Some(EXIT_NO_MATCH) => Ok(Vec::new()),
                _ => {
                    let message = if stderr.is_empty() {
                        status.to_string()
                    } else {
                        stderr.to_string()
                    };
                    Err(Error::execution(TOOL_NAME, message))
                }
            }
        }
    }
}

#[async_trait]
impl SearchEngine for RipgrepEngine {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    #[instrument(skip(self, query, cancel), fields(query = %query, limit = query.limit()), name = "ripgrep_search")]
    async fn search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        let text = require_text(self.name(), query)?;
        let root = absolute_root(&self.vault_root)?;
        let scope = resolve_search_root(&self.vault_root, query.path_prefix())?;

        let mut child = match self.command(text, &scope, query.case_sensitive()).spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::tool_unavailable(TOOL_NAME));
            }
            Err(e) => return Err(Error::io(e)),
        };
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::other("ripgrep stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::other("ripgrep stderr was not captured"))?;
        let mut stderr_task = tokio::spawn(drain_stderr(stderr));

        let mut reader = BufReader::new(stdout);
        let mut results = Vec::new();
        let end = match Self::read_matches(&mut reader, &root, query, cancel, &mut results).await {
            Ok(end) => end,
            Err(e) => {
                kill_tool(&mut child);
                let _ = child.wait().await;
                stderr_task.abort();
                return Err(Error::io(e));
            }
        };
        drop(reader);

        if end != StreamEnd::Exhausted {
            kill_tool(&mut child);
            stderr_task.abort();
        }
        let status = child.wait().await;

        // Only the caller's deadline cuts the drain short.
        let stderr_text = if end == StreamEnd::Exhausted {
            tokio::select! {
                text = &mut stderr_task => text.unwrap_or_default(),
                _ = cancel.cancelled() => {
                    stderr_task.abort();
                    String::new()
                }
            }
        } else {
            String::new()
        };

        log::debug!(
            "ripgrep stream ended with {:?} after {} results",
            end,
            results.len()
        );
        settle(end, status, &stderr_text, results)
    }
}
