//! Git backend using the git CLI.
//!
//! ## Requirements
//!
//! - `git` on `PATH` (without it nothing counts as tracked and history
//!   steps fail with `VcsError::NotInstalled`)
//! - a configured author identity for commits

use std::path::{Component, Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::{debug, trace};

use super::{Remote, Vcs};
use crate::error::{Result, VcsError};

/// Git repository rooted at `root`.
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Check if the git CLI is available.
    pub fn installed() -> bool {
        which::which("git").is_ok()
    }

    /// Check if `root` is inside a git work tree.
    pub fn is_repo(&self) -> bool {
        Self::installed()
            && Command::new("git")
                .arg("-C")
                .arg(&self.root)
                .args(["rev-parse", "--is-inside-work-tree"])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|s| s.success())
                .unwrap_or(false)
    }

    fn command(&self) -> Command {
        self.command_in(&self.root)
    }

    fn command_in(&self, dir: &Path) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(dir)
            .arg("--literal-pathspecs")
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, step: &'static str, cmd: &mut Command) -> Result<Output> {
        if !Self::installed() {
            return Err(VcsError::NotInstalled.into());
        }
        trace!(step, root = %self.root.display(), "running git");
        let output = cmd
            .output()
            .map_err(|source| VcsError::Spawn { step, source })?;
        Ok(output)
    }

    fn run_checked(&self, step: &'static str, cmd: &mut Command) -> Result<Output> {
        let output = self.run(step, cmd)?;
        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                step,
                detail: failure_detail(&output),
            }
            .into());
        }
        Ok(output)
    }

    /// Top of the work tree containing `root`.
    fn toplevel(&self) -> Result<PathBuf> {
        let output = self.run_checked(
            "rev-parse",
            self.command().args(["rev-parse", "--show-toplevel"]),
        )?;
        let top = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(PathBuf::from(top))
    }

    /// Path of `path` relative to `root`, if inside it.
    fn relative(&self, path: &Path) -> Option<PathBuf> {
        relative_to(&self.root, path)
    }

    fn relative_all(&self, step: &'static str, paths: &[&Path]) -> Result<Vec<PathBuf>> {
        paths
            .iter()
            .map(|p| {
                self.relative(p).ok_or_else(|| {
                    VcsError::CommandFailed {
                        step,
                        detail: format!("{} is outside the repository", p.display()),
                    }
                    .into()
                })
            })
            .collect()
    }
}

impl Vcs for Git {
    fn is_tracked(&self, path: &Path) -> Result<bool> {
        if !self.is_repo() {
            debug!(root = %self.root.display(), "not a git work tree, nothing is tracked");
            return Ok(false);
        }
        // Resolved against the work tree top, not `root`.
        let top = self.toplevel()?;
        let Some(rel) = relative_to(&top, path) else {
            debug!(path = %path.display(), "outside the work tree, not tracked");
            return Ok(false);
        };

        let output = self.run_checked(
            "ls-files",
            self.command_in(&top)
                .args(["ls-files", "--cached", "--"])
                .arg(&rel),
        )?;
        let tracked = !output.stdout.iter().all(u8::is_ascii_whitespace);
        debug!(path = %rel.display(), tracked, "checked tracking");
        Ok(tracked)
    }

    fn stage(&self, paths: &[&Path]) -> Result<()> {
        let rels = self.relative_all("add", paths)?;
        self.run_checked("add", self.command().args(["add", "--"]).args(&rels))?;
        debug!(paths = rels.len(), "staged");
        Ok(())
    }

    fn has_staged_changes(&self, paths: &[&Path]) -> Result<bool> {
        let rels = self.relative_all("diff", paths)?;
        let output = self.run(
            "diff",
            self.command()
                .args(["diff", "--cached", "--quiet", "--"])
                .args(&rels),
        )?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(VcsError::CommandFailed {
                step: "diff",
                detail: failure_detail(&output),
            }
            .into()),
        }
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run_checked("commit", self.command().args(["commit", "-q", "-m", message]))?;
        debug!("committed");
        Ok(())
    }

    fn push(&self, remote: &Remote) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("push");
        if let Some(name) = &remote.name {
            cmd.arg(name);
            if let Some(branch) = &remote.branch {
                cmd.arg(branch);
            }
        }
        self.run_checked("push", &mut cmd)?;
        debug!(remote = ?remote.name, branch = ?remote.branch, "pushed");
        Ok(())
    }

    fn pull(&self, remote: &Remote) -> Result<String> {
        let mut cmd = self.command();
        cmd.args(["pull", "--ff-only"]);
        cmd.arg(remote.name.as_deref().unwrap_or("origin"));
        if let Some(branch) = &remote.branch {
            cmd.arg(branch);
        }
        let output = self.run_checked("pull", &mut cmd)?;
        Ok(combined_output(&output))
    }
}

fn combined_output(output: &Output) -> String {
    [&output.stdout, &output.stderr]
        .iter()
        .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn failure_detail(output: &Output) -> String {
    let text = combined_output(output);
    if text.is_empty() {
        format!("exited with {}", output.status)
    } else {
        text
    }
}

/// Path of `path` relative to `base`, if inside it.
fn relative_to(base: &Path, path: &Path) -> Option<PathBuf> {
    let base = resolve(base)?;
    let path = resolve(path)?;
    let rel = path.strip_prefix(&base).ok()?.to_path_buf();
    if rel.as_os_str().is_empty() {
        Some(PathBuf::from("."))
    } else {
        Some(rel)
    }
}

/// Absolute, symlink-resolved form of `path`, even if it does not exist.
///
/// The longest existing ancestor is canonicalized and the remaining
/// components are appended lexically.
fn resolve(path: &Path) -> Option<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    let absolute = normalize(&absolute);

    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            let mut out = canonical;
            out.extend(rest.iter().rev());
            return Some(out);
        }
        rest.push(existing.file_name()?.to_os_string());
        existing = existing.parent()?;
    }
}

/// Remove `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
