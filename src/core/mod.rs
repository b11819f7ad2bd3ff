pub mod error;
pub mod patch;
pub mod series;
pub mod vcs;
