mod commands;
mod core;

use clap::Parser;
use crate::core::error::print_error;
use std::path::PathBuf;

/// Regenerate the securelevel patch series from a git branch
///
/// Re-exports the commits in (BASE, BRANCH] from REPO as patch files under
/// debian/patches/features/all/securelevel/, stamps each with an Origin:
/// provenance header, and rewrites debian/patches/series to match.
#[derive(Parser)]
#[command(name = "genpatch")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Git repo containing securelevel patches between BASE and BRANCH
  repo: PathBuf,

  /// Base ref; commits up to and including it are not exported
  base: String,

  /// Branch (tip) ref whose commits are exported
  branch: String,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  if let Err(err) = commands::run_regen(&cli.repo, &cli.base, &cli.branch) {
    print_error(&err);
    std::process::exit(err.exit_code());
  }
}
