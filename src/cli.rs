// src/cli.rs
use clap::{
    Parser, ValueHint,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use std::path::PathBuf;

const HELP_STR: &str = r#"
{before-help}{name} {version}
{author-with-newline}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"#;

/// Reuses `ErrorReporter`'s own palette (red for errors, yellow for
/// messages, blue for the `Location:` label, cyan for the span itself)
/// rather than an unrelated color scheme, so `--help` and diagnostic output
/// read as one tool.
pub fn custom_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
        .valid(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .invalid(AnsiColor::BrightYellow.on_default() | Effects::BOLD | Effects::UNDERLINE)
        .placeholder(AnsiColor::BrightBlue.on_default())
        .usage(AnsiColor::BrightCyan.on_default() | Effects::BOLD | Effects::UNDERLINE)
}

fn parse_c_file(s: &str) -> Result<PathBuf, String> {
    let p = PathBuf::from(s);
    let is_c = p.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("c")).unwrap_or(false);
    if is_c {
        Ok(p)
    } else {
        Err("expected a path to a .c file".into())
    }
}

#[derive(Parser, Debug)]
#[command(
    version = clap::crate_version!(),
    author = clap::crate_authors!("\n"),
    about,
    long_about = None,
    help_template = HELP_STR,
    styles = custom_styles()
)]
pub struct Args {
    /// Input file for compilation (a .c file is required)
    #[arg(
        short,
        long,
        value_name = "FILE",
        value_hint = ValueHint::FilePath,
        value_parser = parse_c_file
    )]
    pub input: PathBuf,

    /// Show verbose output (stage-boundary logging and SCCP iteration trace)
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the generated SSA IR before optimization
    #[arg(long)]
    pub emit_ir: bool,

    /// Skip the SCCP pass
    #[arg(long)]
    pub no_sccp: bool,

    /// Upper bound on SCCP fixpoint iterations before failing fast
    #[arg(long, default_value_t = 10_000)]
    pub max_iterations: usize,
}
