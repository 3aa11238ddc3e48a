use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::ExtractArgs;
use crate::formats::{Document, ParagraphElement, StructuralElement};

pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let document_path = PathBuf::from(&args.document);
    let out_dir = PathBuf::from(&args.out_dir);

    let document = read_document(&document_path)?;
    let path = write_document_text(&document, &out_dir, args.force)?;

    println!("{}", path.display());
    Ok(())
}

pub fn read_document(path: &std::path::Path) -> anyhow::Result<Document> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read document: {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parse document: {}", path.display()))
}

/// Extracts the document body and stores it under the document title.
pub fn write_document_text(
    document: &Document,
    out_dir: &std::path::Path,
    force: bool,
) -> anyhow::Result<PathBuf> {
    let text = read_structural_elements(&document.body.content);
    tracing::info!(
        title = %document.title,
        elements = document.body.content.len(),
        chars = text.chars().count(),
        "extracted document text"
    );

    crate::text_store::write_text(out_dir, &document.title, &text, force)
        .context("write extracted text")
}

pub fn read_paragraph_element(element: &ParagraphElement) -> &str {
    match &element.text_run {
        Some(run) => &run.content,
        None => "",
    }
}

/// Concatenates every text run reachable from `elements`, depth-first in document order.
///
/// Table cells and table-of-contents blocks hold nested content trees and are read recursively.
pub fn read_structural_elements(elements: &[StructuralElement]) -> String {
    let mut text = String::new();
    append_structural_elements(elements, &mut text);
    text
}

fn append_structural_elements(elements: &[StructuralElement], text: &mut String) {
    for element in elements {
        match element {
            StructuralElement::Paragraph(paragraph) => {
                for elem in &paragraph.elements {
                    text.push_str(read_paragraph_element(elem));
                }
            }
            StructuralElement::Table(table) => {
                for row in &table.table_rows {
                    for cell in &row.table_cells {
                        append_structural_elements(&cell.content, text);
                    }
                }
            }
            StructuralElement::TableOfContents(toc) => {
                append_structural_elements(&toc.content, text);
            }
            StructuralElement::SectionBreak => {}
            StructuralElement::Unrecognized { kinds } => {
                tracing::warn!(?kinds, "skipping unrecognized structural element");
            }
        }
    }
}
