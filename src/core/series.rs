//! Series manifest reconciliation
//!
//! The `series` file lists every patch in application order. Entries under
//! the managed subdirectory are owned by this tool and replaced wholesale
//! on each run; everything else is foreign and copied through untouched,
//! byte for byte. The new manifest is staged under `series.new` and
//! renamed over `series` only once the whole run has succeeded, so a
//! half-written manifest is never observable.

use crate::core::error::{GenResult, ResultExt};
use crate::core::patch;
use crate::core::vcs::PatchExport;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// On-disk layout of the Debian patch tree
///
/// Fixed by convention: this tool is not a general patch manager.
pub struct SeriesLayout {
  /// Directory holding the series file and all patches
  pub patch_dir: PathBuf,

  /// Subdirectory (relative to `patch_dir`) owned by this tool
  pub managed_dir: String,
}

impl Default for SeriesLayout {
  fn default() -> Self {
    Self {
      patch_dir: PathBuf::from("debian/patches"),
      managed_dir: "features/all/securelevel".to_string(),
    }
  }
}

impl SeriesLayout {
  /// Path of the live series manifest
  pub fn series_path(&self) -> PathBuf {
    self.patch_dir.join("series")
  }

  /// Path the new manifest is staged at before the atomic swap
  fn staging_path(&self) -> PathBuf {
    self.patch_dir.join("series.new")
  }

  /// Absolute path of the managed subdirectory
  pub fn managed_path(&self) -> PathBuf {
    self.patch_dir.join(&self.managed_dir)
  }

  /// Prefix that marks a series entry as managed
  fn managed_prefix(&self) -> String {
    format!("{}/", self.managed_dir)
  }
}

/// Outcome of a reconciliation run
///
/// Both lists hold series-relative patch names, sorted lexicographically.
pub struct RegenReport {
  pub added: Vec<String>,
  pub removed: Vec<String>,
}

/// Regenerate the managed patches and reconcile the series manifest
///
/// Foreign entries keep their exact bytes and relative order. The export
/// is triggered once, at the first managed entry, and its patches land in
/// the manifest at that position. The swap to the live `series` name
/// happens last; any failure before it leaves the original manifest
/// untouched.
pub fn regenerate(
  layout: &SeriesLayout,
  source: &dyn PatchExport,
  base: &str,
  branch: &str,
) -> GenResult<RegenReport> {
  let series_path = layout.series_path();
  let series = fs::read_to_string(&series_path)
    .with_context(|| format!("Failed to read {}", series_path.display()))?;

  let staging_path = layout.staging_path();
  let staging = File::create(&staging_path)
    .with_context(|| format!("Failed to create {}", staging_path.display()))?;
  let mut staging = BufWriter::new(staging);

  let prefix = layout.managed_prefix();
  let mut old_set: BTreeSet<String> = BTreeSet::new();
  let mut new_set: BTreeSet<String> = BTreeSet::new();
  let mut exported = false;

  for raw in series.split_inclusive('\n') {
    let name = raw.trim();
    if !name.starts_with(&prefix) {
      staging.write_all(raw.as_bytes())?;
      continue;
    }

    old_set.insert(name.to_string());
    if exported {
      continue;
    }
    exported = true;

    for produced in source.export(base, branch, &layout.managed_path())? {
      let file_name = produced?;
      let entry = format!("{}/{}", layout.managed_dir, file_name);
      let path = layout.patch_dir.join(&entry);

      rewrite_patch(&path)?;

      writeln!(staging, "{}", entry)?;
      new_set.insert(entry);
    }
  }

  staging
    .into_inner()
    .map_err(|e| e.into_error())
    .and_then(|f| f.sync_all())
    .with_context(|| format!("Failed to write {}", staging_path.display()))?;

  fs::rename(&staging_path, &series_path)
    .with_context(|| format!("Failed to replace {}", series_path.display()))?;

  Ok(RegenReport {
    added: new_set.difference(&old_set).cloned().collect(),
    removed: old_set.difference(&new_set).cloned().collect(),
  })
}

/// Rewrite one freshly exported patch in place, adding its Origin header
///
/// The stale file (if any) is unlinked before the rewrite so a prior
/// run's content can never leak through; a missing file is benign, any
/// other unlink failure is fatal.
fn rewrite_patch(path: &Path) -> GenResult<()> {
  let content =
    fs::read_to_string(path).with_context(|| format!("Failed to read exported patch {}", path.display()))?;

  let first_line = content.lines().next().unwrap_or("");
  let sha = patch::commit_id(first_line, path)?;
  let origin = patch::origin_url(sha);
  let rewritten = patch::insert_origin(&content, &origin, path)?;

  if let Err(e) = fs::remove_file(path) {
    if e.kind() != ErrorKind::NotFound {
      return Err(e).with_context(|| format!("Failed to remove stale patch {}", path.display()));
    }
  }

  fs::write(path, rewritten).with_context(|| format!("Failed to write patch {}", path.display()))
}
