//! Patch header rewriting
//!
//! git format-patch emits mbox-style patches whose first line is
//! `From <commit-sha> <date>`. We pull the commit sha out of that line,
//! turn it into a commit-lookup URL on the upstream repository, and splice
//! an `Origin: <url>` field into the patch header so the shipped Debian
//! patch records where it came from.

use crate::core::error::{GenResult, PatchError};
use std::path::Path;

/// Upstream commit-lookup endpoint the Origin field points at
const ORIGIN_BASE: &str = "https://git.kernel.org/cgit/linux/kernel/git/jforbes/linux.git/commit?id=";

/// Extract the commit sha from the first line of an exported patch
///
/// The line must match `From <40 lowercase hex chars> <rest>`. Anything
/// else means the export tool produced something we do not understand,
/// which is fatal.
pub fn commit_id<'a>(first_line: &'a str, path: &Path) -> GenResult<&'a str> {
  let malformed = || PatchError::MalformedFrom {
    path: path.to_path_buf(),
    line: first_line.trim_end().to_string(),
  };

  let rest = first_line.strip_prefix("From ").ok_or_else(malformed)?;
  let bytes = rest.as_bytes();
  let is_hex = |b: &u8| b.is_ascii_digit() || (b'a'..=b'f').contains(b);
  if bytes.len() <= 40 || bytes[40] != b' ' || !bytes[..40].iter().all(is_hex) {
    return Err(malformed().into());
  }

  // All 40 leading bytes are ASCII hex, so this slice is on a char boundary.
  Ok(&rest[..40])
}

/// Build the provenance URL for a commit sha
pub fn origin_url(sha: &str) -> String {
  format!("{}{}", ORIGIN_BASE, sha)
}

/// Header-boundary predicate
///
/// The header ends at the first blank line, the first line led by a symbol
/// (diff markers like `---` or `@@`), or the first `Index:` line.
fn is_header_end(line: &str) -> bool {
  let stripped = line.strip_suffix('\n').unwrap_or(line);
  if stripped.is_empty() {
    return true;
  }
  if stripped.starts_with("Index:") {
    return true;
  }
  match stripped.chars().next() {
    Some(c) => !(c.is_alphanumeric() || c == '_' || c.is_whitespace()),
    None => false,
  }
}

/// Insert exactly one `Origin:` field into a patch header
///
/// Scans in two states, InHeader then InBody. At the header/body boundary
/// the Origin line is written, followed by a separating blank line unless
/// the boundary line is itself blank; the boundary line and everything
/// after it pass through byte-for-byte. A patch with no boundary at all
/// is malformed input.
pub fn insert_origin(patch: &str, origin: &str, path: &Path) -> GenResult<String> {
  let mut out = String::with_capacity(patch.len() + origin.len() + 16);
  let mut in_header = true;

  for line in patch.split_inclusive('\n') {
    if in_header && is_header_end(line) {
      out.push_str("Origin: ");
      out.push_str(origin);
      out.push('\n');
      if line != "\n" {
        out.push('\n');
      }
      in_header = false;
    }
    out.push_str(line);
  }

  if in_header {
    return Err(
      PatchError::NoHeaderBoundary {
        path: path.to_path_buf(),
      }
      .into(),
    );
  }

  Ok(out)
}
