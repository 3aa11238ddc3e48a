use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::cli::RunArgs;
use crate::formats::{ChapterReport, Document};
use crate::google::DocsConfig;

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let out_dir = PathBuf::from(&args.out_dir);

    tracing::info!(document_id = %args.document_id, "run: fetch");
    let config = DocsConfig::from_env(Path::new(&args.token_file)).context("load docs config")?;
    let client = crate::google::http_client()?;
    let document: Document = crate::google::fetch_document(&client, &config, &args.document_id)
        .await
        .context("fetch")?;

    tracing::info!(title = %document.title, "run: extract");
    let text_path =
        crate::extract::write_document_text(&document, &out_dir, args.force).context("extract")?;

    tracing::info!(text = %text_path.display(), "run: count");
    let ledger = crate::report::analyze_file(&text_path, args.on_repeat).context("count")?;
    let report = ChapterReport::from_ledger(&ledger).context("summarize chapters")?;

    print!("{}", crate::report::render(&report, args.format)?);
    Ok(())
}
