//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// surveymerge - survey dataset consolidation
///
/// Merge the homelessness anxiety and demographics datasets on the person
/// identifier (HID) and write the result back to the bucket.
#[derive(Parser, Debug)]
#[command(
    name = "surveymerge",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Merge homelessness survey datasets by person identifier (HID)",
    long_about = "surveymerge reads the anxiety and demographics survey datasets from an \
                  object-store bucket, equi-joins them on the HID column, and writes the \
                  merged CSV under processed/. The invocation result is reported as a \
                  status envelope (200/400/500 plus message) printed as JSON.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  surveymerge run --bucket ./bucket\n    \
                  surveymerge run --lenient --raw-prefix\n    \
                  surveymerge run --event event.json\n    \
                  surveymerge run --policy policy.yaml\n\n\
                  \x1b[1m\x1b[32mConfiguration:\x1b[0m\n    \
                  SURVEYMERGE_BUCKET names the bucket directory when --bucket is not given"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one merge invocation and print the status envelope
    Run(RunArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  Merge with the default strict policy:\n    surveymerge run --bucket ./bucket\n\n\
                  Outer-join, tolerating a missing HID column:\n    surveymerge run --lenient\n\n\
                  Read inputs staged under raw/:\n    surveymerge run --raw-prefix\n\n\
                  React to an object-created event:\n    surveymerge run --event event.json\n\n\
                  Fold an alternate key spelling:\n    surveymerge run --rename 'Person ID=HID'")]
pub struct RunArgs {
    /// Bucket directory (overrides SURVEYMERGE_BUCKET)
    #[arg(long, short = 'b', value_name = "DIR")]
    pub bucket: Option<PathBuf>,

    /// Invocation event payload (JSON file); omit for a poll-based run
    #[arg(long, short = 'e', value_name = "FILE")]
    pub event: Option<PathBuf>,

    /// Outer-join and synthesize a null HID column where missing
    #[arg(long)]
    pub lenient: bool,

    /// Read the input datasets from under the raw/ prefix
    #[arg(long)]
    pub raw_prefix: bool,

    /// Merge policy file (YAML); flags override its settings
    #[arg(long, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// Additional join-key rename, OLD=NEW (repeatable)
    #[arg(long, value_name = "OLD=NEW")]
    pub rename: Vec<String>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    surveymerge completions --shell bash > ~/.bash_completion.d/surveymerge\n\n\
                  Generate zsh completions:\n    surveymerge completions --shell zsh > ~/.zfunc/_surveymerge\n\n\
                  Generate fish completions:\n    surveymerge completions --shell fish > ~/.config/fish/completions/surveymerge.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
