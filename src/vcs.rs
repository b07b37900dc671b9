//! Git collaborator: thin wrapper over the `git` binary for the diff,
//! history, and untracked-file surfaces. Every call runs with a timeout
//! and surfaces failures as `IndexError::VcsUnavailable` rather than
//! panicking — a project with no git repository, or no `git` on `PATH`,
//! degrades gracefully (spec §6's version-control collaborator contract).

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

use crate::error::{IndexError, IndexResult};

const LIST_TIMEOUT: Duration = Duration::from_secs(10);
const LOG_TIMEOUT: Duration = Duration::from_secs(30);

/// One line of `git log -L`: a hunk of history for a specific line range.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub commit: String,
    pub author: String,
    pub date: String,
    pub summary: String,
}

/// Files changed between `base_ref` and the working tree (`git diff
/// --name-only <base_ref>`), as project-relative paths.
pub fn changed_files(root: &Path, base_ref: &str) -> IndexResult<Vec<PathBuf>> {
    let output = run(root, &["diff", "--name-only", base_ref], LIST_TIMEOUT)?;
    Ok(lines(&output).map(PathBuf::from).collect())
}

/// Untracked files (`git ls-files --others --exclude-standard`).
pub fn untracked_files(root: &Path) -> IndexResult<Vec<PathBuf>> {
    let output = run(root, &["ls-files", "--others", "--exclude-standard"], LIST_TIMEOUT)?;
    Ok(lines(&output).map(PathBuf::from).collect())
}

/// The contents of `path` as it existed at `git_ref` (`git show
/// <git_ref>:<path>`). Used by `diff` to compare a symbol's signature
/// against a prior revision without touching the working tree.
pub fn show_file(root: &Path, git_ref: &str, path: &Path) -> IndexResult<Vec<u8>> {
    let spec = format!("{git_ref}:{}", path.display());
    let output = run_raw(root, &["show", &spec], LIST_TIMEOUT)?;
    Ok(output)
}

/// History of a specific line range in a file (`git log -L
/// <start>,<end>:<path>`), newest first, paginated via `--skip`/`-n`.
pub fn line_history(
    root: &Path,
    path: &Path,
    line_start: usize,
    line_end: usize,
    offset: usize,
    limit: usize,
) -> IndexResult<Vec<LogEntry>> {
    let range = format!("{line_start},{line_end}:{}", path.display());
    let skip = offset.to_string();
    let count = limit.to_string();
    let output = run(
        root,
        &[
            "log",
            "--no-patch",
            "--format=%H%x1f%an%x1f%ad%x1f%s%x1e",
            "--date=short",
            "-L",
            &range,
            "--skip",
            &skip,
            "-n",
            &count,
        ],
        LOG_TIMEOUT,
    )?;

    Ok(output
        .split('\u{1e}')
        .map(str::trim)
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let mut fields = record.split('\u{1f}');
            Some(LogEntry {
                commit: fields.next()?.to_string(),
                author: fields.next()?.to_string(),
                date: fields.next()?.to_string(),
                summary: fields.next()?.to_string(),
            })
        })
        .collect())
}

fn lines(output: &str) -> impl Iterator<Item = &str> {
    output.lines().map(str::trim).filter(|l| !l.is_empty())
}

fn run(root: &Path, args: &[&str], timeout: Duration) -> IndexResult<String> {
    let bytes = run_raw(root, args, timeout)?;
    String::from_utf8(bytes).map_err(|err| IndexError::VcsUnavailable {
        reason: format!("git produced non-UTF8 output: {err}"),
    })
}

fn run_raw(root: &Path, args: &[&str], timeout: Duration) -> IndexResult<Vec<u8>> {
    let mut child = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| IndexError::VcsUnavailable {
            reason: format!("failed to spawn git: {err}"),
        })?;

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = child.wait_with_output();
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(output)) if output.status.success() => Ok(output.stdout),
        Ok(Ok(output)) => Err(IndexError::VcsUnavailable {
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        Ok(Err(err)) => Err(IndexError::VcsUnavailable {
            reason: err.to_string(),
        }),
        Err(_) => Err(IndexError::VcsUnavailable {
            reason: format!("git {} timed out after {timeout:?}", args.join(" ")),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_repo(root: &Path) {
        std::process::Command::new("git")
            .args(["init", "-q"])
            .current_dir(root)
            .status()
            .unwrap();
        std::process::Command::new("git")
            .args(["config", "user.email", "test@example.com"])
            .current_dir(root)
            .status()
            .unwrap();
        std::process::Command::new("git")
            .args(["config", "user.name", "test"])
            .current_dir(root)
            .status()
            .unwrap();
    }

    #[test]
    fn untracked_files_reports_new_file() {
        let tmp = tempfile::tempdir().unwrap();
        init_repo(tmp.path());
        std::fs::write(tmp.path().join("new.rs"), "fn a() {}").unwrap();

        let files = untracked_files(tmp.path()).unwrap();
        assert!(files.iter().any(|p| p == Path::new("new.rs")));
    }

    #[test]
    fn non_repo_returns_vcs_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let err = untracked_files(tmp.path()).unwrap_err();
        assert!(matches!(err, IndexError::VcsUnavailable { .. }));
    }
}
