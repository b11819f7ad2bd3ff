//! System git backend - zero dependencies
//!
//! Runs `git format-patch` as a subprocess with an isolated environment.
//! No ambient state: the metadata directory is passed to the child via an
//! explicit GIT_DIR on the command, never by mutating our own environment.

use super::{PatchExport, PatchNames};
use crate::core::error::{GenResult, GitError, ResultExt};
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository metadata directory (`<repo>/.git`)
  git_dir: PathBuf,
}

impl SystemGit {
  /// Open a git repository by its checkout path
  pub fn open(repo: &Path) -> GenResult<Self> {
    let git_dir = repo.join(".git");
    if !git_dir.exists() {
      return Err(
        GitError::RepoNotFound {
          path: repo.to_path_buf(),
        }
        .into(),
      );
    }

    Ok(Self { git_dir })
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Points GIT_DIR at the source repository's metadata
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }
    cmd.env("GIT_DIR", &self.git_dir);

    cmd
  }
}

impl PatchExport for SystemGit {
  /// Run `git format-patch <base>..<branch>` in `out_dir`
  ///
  /// format-patch writes one file per commit into its working directory
  /// and prints each file name on stdout; the returned stream yields the
  /// names as they appear rather than waiting for the whole range, which
  /// bounds memory for large exports.
  fn export(&self, base: &str, branch: &str, out_dir: &Path) -> GenResult<PatchNames> {
    let range = format!("{}..{}", base, branch);
    let mut cmd = self.git_cmd();
    cmd
      .args(["format-patch", range.as_str()])
      .current_dir(out_dir)
      .stdout(Stdio::piped())
      .stderr(Stdio::piped());

    let mut child = cmd.spawn().context("Failed to run git format-patch")?;

    // stdout is always piped, so take() cannot return None here
    let stdout = child
      .stdout
      .take()
      .ok_or_else(|| crate::core::error::GenError::message("git format-patch stdout not captured"))?;

    Ok(Box::new(FormatPatchStream {
      command: format!("git format-patch {}", range),
      child,
      lines: BufReader::new(stdout).lines(),
      done: false,
    }))
  }
}

/// Streaming iterator over `git format-patch` output
///
/// Yields one file name per stdout line. After the last line it reaps the
/// child and, if the exit status is non-zero, yields a final error with
/// the captured stderr.
struct FormatPatchStream {
  command: String,
  child: Child,
  lines: Lines<BufReader<ChildStdout>>,
  done: bool,
}

impl FormatPatchStream {
  fn finish(&mut self) -> GenResult<()> {
    let mut stderr = String::new();
    if let Some(mut pipe) = self.child.stderr.take() {
      // Best effort; an unreadable stderr should not mask the exit status.
      let _ = pipe.read_to_string(&mut stderr);
    }

    let status = self.child.wait().context("Failed to wait for git format-patch")?;
    if !status.success() {
      return Err(
        GitError::CommandFailed {
          command: self.command.clone(),
          stderr,
        }
        .into(),
      );
    }

    Ok(())
  }
}

impl Iterator for FormatPatchStream {
  type Item = GenResult<String>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if self.done {
        return None;
      }

      match self.lines.next() {
        Some(Ok(line)) => {
          let name = line.trim();
          if name.is_empty() {
            continue;
          }
          return Some(Ok(name.to_string()));
        }
        Some(Err(e)) => {
          self.done = true;
          return Some(Err(e.into()));
        }
        None => {
          self.done = true;
          match self.finish() {
            Ok(()) => return None,
            Err(e) => return Some(Err(e)),
          }
        }
      }
    }
  }
}

impl Drop for FormatPatchStream {
  fn drop(&mut self) {
    // An abandoned stream (caller hit a fatal error mid-export) must not
    // leave the subprocess running.
    if !self.done {
      let _ = self.child.kill();
      let _ = self.child.wait();
    }
  }
}
