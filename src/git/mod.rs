//! Best-effort git queries
//!
//! Repository history is read through three read-only `git` subprocess
//! invocations: the current commit, a path's last-modified timestamp, and
//! added/deleted line counts within a lookback window. Each invocation
//! runs with a fixed 30-second timeout; a missing binary, a non-zero
//! exit, a timeout, or unparseable output is reported as a [`GitError`]
//! which callers degrade to "no signal". A repository with no history at
//! all still scans, with every age/churn component at zero.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Fixed timeout applied to every subprocess invocation.
pub const SUBPROCESS_TIMEOUT_SECS: u64 = 30;

/// Why a subprocess query produced no usable result.
///
/// Callers treat every variant as "signal unavailable" for scoring; the
/// variants exist so diagnostics can tell a missing tool from a timeout.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to launch {0}: {1}")]
    Spawn(String, #[source] std::io::Error),
    #[error("i/o error while running {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("{0} timed out after {1}s")]
    Timeout(String, u64),
    #[error("{0} exited with status {1}")]
    Exit(String, i32),
    #[error("unparseable output from {0}")]
    Parse(String),
}

/// Run a command in `cwd`, capturing stdout, enforcing the fixed timeout.
///
/// stdout is drained on a separate thread so a chatty child can never
/// block on a full pipe while the poll loop waits for it to exit.
pub(crate) fn run_command(argv: &[&str], cwd: &Path) -> Result<String, GitError> {
    let name = argv[..argv.len().min(2)].join(" ");
    debug!("Running {:?} in {}", argv, cwd.display());

    let mut child = Command::new(argv[0])
        .args(&argv[1..])
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| GitError::Spawn(name.clone(), e))?;

    let mut stdout_pipe = child.stdout.take();
    let reader = std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(ref mut out) = stdout_pipe {
            let _ = out.read_to_string(&mut buf);
        }
        buf
    });

    let deadline = Instant::now() + Duration::from_secs(SUBPROCESS_TIMEOUT_SECS);
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = reader.join().unwrap_or_default();
                if status.success() {
                    return Ok(stdout);
                }
                return Err(GitError::Exit(name, status.code().unwrap_or(-1)));
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GitError::Timeout(name, SUBPROCESS_TIMEOUT_SECS));
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(e) => {
                let _ = child.kill();
                return Err(GitError::Io(name, e));
            }
        }
    }
}

/// Current HEAD commit of the repository, if it has one.
pub fn head_commit(repo_root: &Path) -> Result<String, GitError> {
    let out = run_command(&["git", "rev-parse", "HEAD"], repo_root)?;
    let sha = out.trim();
    if sha.is_empty() {
        return Err(GitError::Parse("git rev-parse".to_string()));
    }
    Ok(sha.to_string())
}

/// Timestamp of the most recent commit touching `rel_path`.
pub fn last_modified(repo_root: &Path, rel_path: &str) -> Result<DateTime<Utc>, GitError> {
    let out = run_command(
        &["git", "log", "-1", "--format=%ct", "--", rel_path],
        repo_root,
    )?;
    let secs: i64 = out
        .trim()
        .parse()
        .map_err(|_| GitError::Parse("git log".to_string()))?;
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| GitError::Parse("git log".to_string()))
}

/// Added+deleted line counts per path over the last `since_days` days.
///
/// Binary files report `-` in numstat columns and are skipped.
pub fn churn(repo_root: &Path, since_days: u32) -> Result<HashMap<String, u64>, GitError> {
    let since = (Utc::now() - chrono::Duration::days(i64::from(since_days)))
        .format("%Y-%m-%d")
        .to_string();
    let since_arg = format!("--since={since}");
    let out = run_command(
        &[
            "git",
            "log",
            since_arg.as_str(),
            "--numstat",
            "--pretty=format:---%H",
        ],
        repo_root,
    )?;

    let mut churn: HashMap<String, u64> = HashMap::new();
    for line in out.lines() {
        let mut columns = line.splitn(3, '\t');
        let (Some(adds), Some(dels), Some(path)) = (columns.next(), columns.next(), columns.next())
        else {
            continue;
        };
        let (Ok(adds), Ok(dels)) = (adds.parse::<u64>(), dels.parse::<u64>()) else {
            continue;
        };
        *churn.entry(path.to_string()).or_insert(0) += adds + dels;
    }
    Ok(churn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_captures_stdout() {
        let out = run_command(&["echo", "hello"], Path::new(".")).expect("echo runs");
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let err = run_command(&["debtscan-no-such-tool"], Path::new("."))
            .expect_err("must not resolve");
        assert!(matches!(err, GitError::Spawn(_, _)));
    }

    #[test]
    fn test_nonzero_exit_is_exit_error() {
        let err = run_command(&["false"], Path::new(".")).expect_err("false exits 1");
        assert!(matches!(err, GitError::Exit(_, 1)));
    }

    #[test]
    fn test_queries_degrade_outside_a_repository() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(head_commit(dir.path()).is_err());
        assert!(last_modified(dir.path(), "src/app.ts").is_err());
        assert!(churn(dir.path(), 30).is_err());
    }
}
