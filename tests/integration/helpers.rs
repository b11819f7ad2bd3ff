//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway source repository with commit history to export
pub struct SourceRepo {
  _root: TempDir,
  pub path: PathBuf,
}

impl SourceRepo {
  /// Create a repo with one base commit, returning it plus the base sha
  pub fn new() -> Result<(Self, String)> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(path.join("README"), "base\n")?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Base commit"])?;

    let repo = Self { _root: root, path };
    let base = repo.head_sha()?;
    Ok((repo, base))
  }

  /// Add a commit touching one file, returning its sha
  pub fn commit_file(&self, file: &str, content: &str, message: &str) -> Result<String> {
    std::fs::write(self.path.join(file), content)?;
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    self.head_sha()
  }

  /// Current HEAD sha
  pub fn head_sha(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// A throwaway Debian patch tree (the tool's working directory)
pub struct PatchTree {
  _root: TempDir,
  pub path: PathBuf,
}

impl PatchTree {
  /// Create debian/patches with the managed subdirectory and a series file
  pub fn new(series: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::create_dir_all(path.join("debian/patches/features/all/securelevel"))?;
    std::fs::write(path.join("debian/patches/series"), series)?;

    Ok(Self { _root: root, path })
  }

  /// Read the series manifest
  pub fn series(&self) -> Result<String> {
    std::fs::read_to_string(self.path.join("debian/patches/series")).context("Failed to read series")
  }

  /// Check whether a path (relative to the tree root) exists
  pub fn exists(&self, rel: &str) -> bool {
    self.path.join(rel).exists()
  }

  /// Read a managed patch file by its series-relative name
  pub fn read_patch(&self, name: &str) -> Result<String> {
    let path = self.path.join("debian/patches").join(name);
    std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
  }

  /// Managed patch names currently listed in the series, in order
  pub fn managed_entries(&self) -> Result<Vec<String>> {
    Ok(
      self
        .series()?
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("features/all/securelevel/"))
        .map(String::from)
        .collect(),
    )
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the genpatch binary, succeeding or failing as the test expects
pub fn run_genpatch(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_genpatch_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "genpatch failed: genpatch {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the genpatch binary without asserting on its exit status
pub fn run_genpatch_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_genpatch");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run genpatch")
}
