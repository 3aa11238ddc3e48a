use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Run(RunArgs),
    Fetch(FetchArgs),
    Extract(ExtractArgs),
    Count(CountArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// What to do when a heading line appears a second time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RepeatPolicy {
    /// The later section's count replaces the earlier one.
    #[default]
    Overwrite,
    /// Counts of all sections with the same heading are summed.
    Accumulate,
    /// Fail the analysis.
    Reject,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Google Docs document id.
    #[arg(long)]
    pub document_id: String,

    /// Output directory for the extracted text (file named after the document title).
    #[arg(long)]
    pub out_dir: String,

    /// Stored OAuth token (used when DOCCHAPTERS_ACCESS_TOKEN is unset).
    #[arg(long, default_value = "token.json")]
    pub token_file: String,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// How to handle a chapter heading that appears more than once.
    #[arg(long, value_enum, default_value_t = RepeatPolicy::Overwrite)]
    pub on_repeat: RepeatPolicy,

    /// Overwrite an existing text file.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Google Docs document id.
    #[arg(long)]
    pub document_id: String,

    /// Output file path for the document JSON.
    #[arg(long)]
    pub out: String,

    /// Stored OAuth token (used when DOCCHAPTERS_ACCESS_TOKEN is unset).
    #[arg(long, default_value = "token.json")]
    pub token_file: String,

    /// Overwrite an existing output file.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Document JSON (created by `fetch`).
    #[arg(long)]
    pub document: String,

    /// Output directory for the extracted text (file named after the document title).
    #[arg(long)]
    pub out_dir: String,

    /// Overwrite an existing text file.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct CountArgs {
    /// Extracted text file (created by `extract`).
    #[arg(long)]
    pub text: String,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// How to handle a chapter heading that appears more than once.
    #[arg(long, value_enum, default_value_t = RepeatPolicy::Overwrite)]
    pub on_repeat: RepeatPolicy,
}
