use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    docchapters::logging::init().context("init logging")?;

    let cli = docchapters::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        docchapters::cli::Command::Run(args) => {
            docchapters::build::run(args).await.context("run")?;
        }
        docchapters::cli::Command::Fetch(args) => {
            docchapters::google::run(args).await.context("fetch")?;
        }
        docchapters::cli::Command::Extract(args) => {
            docchapters::extract::run(args).context("extract")?;
        }
        docchapters::cli::Command::Count(args) => {
            docchapters::report::run(args).context("count")?;
        }
    }

    Ok(())
}
