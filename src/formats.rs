use serde::{Deserialize, Serialize};

/// A Google Docs document as returned by `documents.get`.
///
/// Only the fields needed for text extraction are modelled; everything else in the
/// API response is ignored on decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// One node of the document content tree.
///
/// The API marks the node kind by which key is present (`paragraph`, `table`, ...).
/// Decoding goes through [`RawStructuralElement`] so that exactly one variant is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStructuralElement", into = "RawStructuralElement")]
pub enum StructuralElement {
    Paragraph(Paragraph),
    Table(Table),
    TableOfContents(TableOfContents),
    SectionBreak,
    Unrecognized { kinds: Vec<String> },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStructuralElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    paragraph: Option<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table_of_contents: Option<TableOfContents>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    section_break: Option<serde_json::Value>,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

impl From<RawStructuralElement> for StructuralElement {
    fn from(raw: RawStructuralElement) -> Self {
        if let Some(paragraph) = raw.paragraph {
            return Self::Paragraph(paragraph);
        }
        if let Some(table) = raw.table {
            return Self::Table(table);
        }
        if let Some(toc) = raw.table_of_contents {
            return Self::TableOfContents(toc);
        }
        if raw.section_break.is_some() {
            return Self::SectionBreak;
        }
        Self::Unrecognized {
            kinds: raw.other.keys().cloned().collect(),
        }
    }
}

impl From<StructuralElement> for RawStructuralElement {
    fn from(element: StructuralElement) -> Self {
        let mut raw = Self::default();
        match element {
            StructuralElement::Paragraph(paragraph) => raw.paragraph = Some(paragraph),
            StructuralElement::Table(table) => raw.table = Some(table),
            StructuralElement::TableOfContents(toc) => raw.table_of_contents = Some(toc),
            StructuralElement::SectionBreak => {
                raw.section_break = Some(serde_json::Value::Object(serde_json::Map::new()));
            }
            StructuralElement::Unrecognized { kinds } => {
                for kind in kinds {
                    raw.other
                        .insert(kind, serde_json::Value::Object(serde_json::Map::new()));
                }
            }
        }
        raw
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableOfContents {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub chapter: String,
    pub words: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterReport {
    pub chapters: Vec<ChapterRecord>,
    pub average_words_per_chapter: f64,
}
