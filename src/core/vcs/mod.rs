pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::GenResult;
use std::path::Path;

/// Lazy stream of generated patch file names
pub type PatchNames = Box<dyn Iterator<Item = GenResult<String>>>;

/// Capability to export a commit range as a sequence of patch files
///
/// Implementations write one patch file per commit in `(base, branch]`
/// into `out_dir` and yield the file names in the order the backing tool
/// creates them (chronological, oldest first). Names are yielded as they
/// are produced so callers can process patches incrementally.
pub trait PatchExport {
  fn export(&self, base: &str, branch: &str, out_dir: &Path) -> GenResult<PatchNames>;
}
