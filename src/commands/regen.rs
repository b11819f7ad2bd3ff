//! Regenerate the managed patch series from a git commit range

use crate::core::error::GenResult;
use crate::core::series::{self, SeriesLayout};
use crate::core::vcs::SystemGit;
use std::path::Path;

/// Run a full regeneration against the fixed Debian patch layout
///
/// Reads `debian/patches/series` relative to the current directory,
/// re-exports `(base, branch]` from `repo`, and prints one line per
/// added or obsoleted patch.
pub fn run_regen(repo: &Path, base: &str, branch: &str) -> GenResult<()> {
  let layout = SeriesLayout::default();
  let git = SystemGit::open(repo)?;

  let report = series::regenerate(&layout, &git, base, branch)?;

  for name in &report.added {
    println!("Added patch {}", layout.patch_dir.join(name).display());
  }
  for name in &report.removed {
    println!("Obsoleted patch {}", layout.patch_dir.join(name).display());
  }

  Ok(())
}
