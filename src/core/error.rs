//! Error types for genpatch with contextual messages and exit codes
//!
//! Every failure in this tool is fatal: the run either completes and swaps
//! the series manifest into place, or it aborts before the swap. Errors are
//! categorized so the binary can report them and pick an exit code.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for genpatch
#[derive(Debug)]
pub enum GenError {
  /// Git subprocess errors
  Git(GitError),

  /// Malformed exported patch content
  Patch(PatchError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message { message: String, context: Option<String> },
}

impl GenError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    GenError::Message {
      message: msg.into(),
      context: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      GenError::Message { message, context } => GenError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
      },
      GenError::Io(e) => GenError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
      },
      other => other,
    }
  }

  /// Get the process exit code for this error
  ///
  /// Usage errors exit 2 via clap before we ever get here; everything that
  /// reaches this path is an internal failure.
  pub fn exit_code(&self) -> i32 {
    1
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      GenError::Git(e) => e.help_message(),
      GenError::Patch(e) => e.help_message(),
      _ => None,
    }
  }
}

impl fmt::Display for GenError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GenError::Git(e) => write!(f, "{}", e),
      GenError::Patch(e) => write!(f, "{}", e),
      GenError::Io(e) => write!(f, "I/O error: {}", e),
      GenError::Message { message, context } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for GenError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      GenError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for GenError {
  fn from(err: io::Error) -> Self {
    GenError::Io(err)
  }
}

impl From<GitError> for GenError {
  fn from(err: GitError) -> Self {
    GenError::Git(err)
  }
}

impl From<PatchError> for GenError {
  fn from(err: PatchError) -> Self {
    GenError::Patch(err)
  }
}

impl From<String> for GenError {
  fn from(msg: String) -> Self {
    GenError::message(msg)
  }
}

impl From<&str> for GenError {
  fn from(msg: &str) -> Self {
    GenError::message(msg)
  }
}

/// Git subprocess errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "REPO must be a git checkout containing the patches to export; no .git was found under {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Malformed exported patch content
///
/// These are invariant violations: git format-patch output we do not
/// recognize means the inputs are untrustworthy and nothing we produce
/// would be safe to ship, so the run aborts before the series swap.
#[derive(Debug)]
pub enum PatchError {
  /// First line does not match `From <40 hex chars> `
  MalformedFrom { path: PathBuf, line: String },

  /// No header/body boundary found, so there is nowhere to put Origin:
  NoHeaderBoundary { path: PathBuf },
}

impl PatchError {
  fn help_message(&self) -> Option<String> {
    match self {
      PatchError::MalformedFrom { .. } => {
        Some("Expected git format-patch output starting with 'From <commit-sha> <date>'.".to_string())
      }
      PatchError::NoHeaderBoundary { .. } => {
        Some("The exported patch has no body; check the commit range.".to_string())
      }
    }
  }
}

impl fmt::Display for PatchError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PatchError::MalformedFrom { path, line } => {
        write!(f, "Malformed patch {}: bad From line: {}", path.display(), line)
      }
      PatchError::NoHeaderBoundary { path } => {
        write!(f, "Malformed patch {}: no header/body boundary found", path.display())
      }
    }
  }
}

/// Result type alias for genpatch
pub type GenResult<T> = Result<T, GenError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> GenResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> GenResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<GenError>,
{
  fn context(self, ctx: impl Into<String>) -> GenResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> GenResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &GenError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
