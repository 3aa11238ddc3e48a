use std::path::PathBuf;

use anyhow::Context as _;

use crate::chapters::{ChapterError, ChapterLedger, ChapterScanner};
use crate::cli::{CountArgs, RepeatPolicy, ReportFormat};
use crate::formats::{ChapterRecord, ChapterReport};

const CHAPTER_WIDTH: usize = 15;

pub fn run(args: CountArgs) -> anyhow::Result<()> {
    let text_path = PathBuf::from(&args.text);
    let ledger = analyze_file(&text_path, args.on_repeat)?;
    let report = ChapterReport::from_ledger(&ledger).context("summarize chapters")?;

    print!("{}", render(&report, args.format)?);
    Ok(())
}

/// Reads `path` line by line and segments it into chapters.
pub fn analyze_file(path: &std::path::Path, policy: RepeatPolicy) -> anyhow::Result<ChapterLedger> {
    let mut scanner = ChapterScanner::new(policy);
    for line in crate::text_store::read_lines(path)? {
        scanner.feed(&line?)?;
    }
    let ledger = scanner
        .finish()
        .with_context(|| format!("analyze chapters: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        chapters = ledger.len(),
        "analyzed chapters"
    );
    Ok(ledger)
}

impl ChapterReport {
    pub fn from_ledger(ledger: &ChapterLedger) -> Result<Self, ChapterError> {
        let average_words_per_chapter = ledger.average_words_per_chapter()?;
        let chapters = ledger
            .iter()
            .map(|(chapter, words)| ChapterRecord {
                chapter: chapter.to_owned(),
                words,
            })
            .collect();

        Ok(Self {
            chapters,
            average_words_per_chapter,
        })
    }
}

pub fn render(report: &ChapterReport, format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(report).context("serialize report json")?;
            json.push('\n');
            Ok(json)
        }
        ReportFormat::Yaml => serde_yaml::to_string(report).context("serialize report yaml"),
    }
}

pub fn render_text(report: &ChapterReport) -> String {
    let mut out = String::new();
    for record in &report.chapters {
        out.push_str(&format!(
            "{:<width$}: {:>2} palavras\n",
            record.chapter,
            record.words,
            width = CHAPTER_WIDTH
        ));
    }
    out.push_str(&format!(
        "MÉDIA DE PALAVRAS POR CAPÍTULO: {:.2}\n",
        report.average_words_per_chapter
    ));
    out
}
