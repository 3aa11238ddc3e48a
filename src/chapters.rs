use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::cli::RepeatPolicy;

pub const PROLOGUE_MARKER: &str = "Prólogo";

/// `Capítulo` followed by an identifying word or number, at the start of the line.
static CHAPTER_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Capítulo \w+").expect("chapter heading pattern is valid"));

#[derive(Debug, thiserror::Error)]
pub enum ChapterError {
    #[error("no chapter heading found in text")]
    NoChapterDetected,
    #[error("average words per chapter is undefined: no chapters besides the prologue")]
    DivisionUndefined,
    #[error("chapter heading repeated: {key}")]
    RepeatedHeading { key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Prologue,
    Chapter,
}

/// Classifies a line whose trailing whitespace has already been removed.
pub fn classify_heading(line: &str) -> Option<Heading> {
    if line == PROLOGUE_MARKER {
        Some(Heading::Prologue)
    } else if CHAPTER_HEADING_RE.is_match(line) {
        Some(Heading::Chapter)
    } else {
        None
    }
}

/// Chapter heading → word count, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterLedger {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl ChapterLedger {
    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(key, words)| (key.as_str(), *words))
    }

    /// Mean word count over every entry except the prologue.
    pub fn average_words_per_chapter(&self) -> Result<f64, ChapterError> {
        let (chapters, words) = self
            .iter()
            .filter(|(key, _)| *key != PROLOGUE_MARKER)
            .fold((0_usize, 0_usize), |(chapters, total), (_, words)| {
                (chapters + 1, total + words)
            });

        if chapters == 0 {
            return Err(ChapterError::DivisionUndefined);
        }
        Ok(words as f64 / chapters as f64)
    }

    fn seed(&mut self, key: &str) {
        if !self.contains(key) {
            self.index.insert(key.to_owned(), self.entries.len());
            self.entries.push((key.to_owned(), 0));
        }
    }

    fn flush(&mut self, key: &str, words: usize, policy: RepeatPolicy) {
        self.seed(key);
        let Some(&i) = self.index.get(key) else {
            return;
        };
        match policy {
            RepeatPolicy::Overwrite | RepeatPolicy::Reject => self.entries[i].1 = words,
            RepeatPolicy::Accumulate => self.entries[i].1 += words,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    NoChapterOpen,
    ChapterOpen { key: String, words: usize },
}

/// Single-pass chapter segmentation over text lines.
///
/// Feed lines in order, then call [`ChapterScanner::finish`] to flush the open chapter.
#[derive(Debug)]
pub struct ChapterScanner {
    policy: RepeatPolicy,
    state: ScanState,
    ledger: ChapterLedger,
    front_matter_words: usize,
}

impl ChapterScanner {
    pub fn new(policy: RepeatPolicy) -> Self {
        Self {
            policy,
            state: ScanState::NoChapterOpen,
            ledger: ChapterLedger::default(),
            front_matter_words: 0,
        }
    }

    pub fn feed(&mut self, line: &str) -> Result<(), ChapterError> {
        let line = line.trim_end();

        if classify_heading(line).is_some() {
            self.flush_open_chapter();
            self.open_chapter(line)?;
            return Ok(());
        }

        let words = count_words_in(line);
        match &mut self.state {
            ScanState::ChapterOpen { words: open, .. } => *open += words,
            ScanState::NoChapterOpen => self.front_matter_words += words,
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<ChapterLedger, ChapterError> {
        if self.state == ScanState::NoChapterOpen {
            return Err(ChapterError::NoChapterDetected);
        }
        self.flush_open_chapter();

        if self.front_matter_words > 0 {
            tracing::warn!(
                words = self.front_matter_words,
                "dropped text before the first chapter heading"
            );
        }
        Ok(self.ledger)
    }

    fn open_chapter(&mut self, key: &str) -> Result<(), ChapterError> {
        if self.ledger.contains(key) {
            if self.policy == RepeatPolicy::Reject {
                return Err(ChapterError::RepeatedHeading {
                    key: key.to_owned(),
                });
            }
            tracing::warn!(chapter = key, policy = ?self.policy, "chapter heading repeated");
        }

        self.ledger.seed(key);
        self.state = ScanState::ChapterOpen {
            key: key.to_owned(),
            words: 0,
        };
        Ok(())
    }

    fn flush_open_chapter(&mut self) {
        let state = std::mem::replace(&mut self.state, ScanState::NoChapterOpen);
        if let ScanState::ChapterOpen { key, words } = state {
            tracing::debug!(chapter = %key, words, "flush chapter");
            self.ledger.flush(&key, words, self.policy);
        }
    }
}

pub fn count_words_in(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Runs a [`ChapterScanner`] over `lines` and returns the finished ledger.
pub fn count_words<I, S>(lines: I, policy: RepeatPolicy) -> Result<ChapterLedger, ChapterError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = ChapterScanner::new(policy);
    for line in lines {
        scanner.feed(line.as_ref())?;
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(ledger: &ChapterLedger) -> Vec<(&str, usize)> {
        ledger.iter().collect()
    }

    #[test]
    fn classify_recognizes_the_heading_vocabulary() {
        assert_eq!(classify_heading("Prólogo"), Some(Heading::Prologue));
        assert_eq!(classify_heading("Capítulo 1"), Some(Heading::Chapter));
        assert_eq!(classify_heading("Capítulo Um"), Some(Heading::Chapter));
        assert_eq!(classify_heading("Capítulo 12: O início"), Some(Heading::Chapter));

        assert_eq!(classify_heading("Capítulo"), None);
        assert_eq!(classify_heading("Capítulo "), None);
        assert_eq!(classify_heading("  Capítulo 1"), None);
        assert_eq!(classify_heading("No Capítulo 1 vimos"), None);
        assert_eq!(classify_heading("Prólogos"), None);
        assert_eq!(classify_heading("hello world"), None);
    }

    #[test]
    fn scanner_states_follow_feed_and_finish() -> anyhow::Result<()> {
        let mut scanner = ChapterScanner::new(RepeatPolicy::Overwrite);
        assert_eq!(scanner.state, ScanState::NoChapterOpen);

        scanner.feed("front matter")?;
        assert_eq!(scanner.state, ScanState::NoChapterOpen);

        scanner.feed("Capítulo 1")?;
        scanner.feed("one two")?;
        assert_eq!(
            scanner.state,
            ScanState::ChapterOpen {
                key: "Capítulo 1".to_owned(),
                words: 2
            }
        );
        assert_eq!(scanner.ledger.get("Capítulo 1"), Some(0));

        let ledger = scanner.finish()?;
        assert_eq!(entries(&ledger), vec![("Capítulo 1", 2)]);

        Ok(())
    }

    #[test]
    fn segments_chapters_and_counts_words() -> anyhow::Result<()> {
        let ledger = count_words(
            ["Prólogo", "hello world", "Capítulo 1", "one two three", "four"],
            RepeatPolicy::Overwrite,
        )?;

        assert_eq!(entries(&ledger), vec![("Prólogo", 2), ("Capítulo 1", 4)]);
        assert_eq!(ledger.average_words_per_chapter()?, 4.0);

        Ok(())
    }

    #[test]
    fn trailing_whitespace_and_blank_lines_are_ignored() -> anyhow::Result<()> {
        let ledger = count_words(
            ["Capítulo 1  \t", "", "  one   two  ", "   "],
            RepeatPolicy::Overwrite,
        )?;

        assert_eq!(entries(&ledger), vec![("Capítulo 1", 2)]);

        Ok(())
    }

    #[test]
    fn prologue_never_contributes_to_average() -> anyhow::Result<()> {
        let ledger = count_words(
            [
                "Prólogo",
                "a b c d e f g h i j k l",
                "Capítulo 1",
                "x y",
                "Capítulo 2",
                "z",
            ],
            RepeatPolicy::Overwrite,
        )?;

        assert_eq!(ledger.get(PROLOGUE_MARKER), Some(12));
        assert_eq!(ledger.average_words_per_chapter()?, 1.5);

        Ok(())
    }

    #[test]
    fn prologue_only_ledger_has_undefined_average() -> anyhow::Result<()> {
        let ledger = count_words(["Prólogo", "words here"], RepeatPolicy::Overwrite)?;

        assert!(matches!(
            ledger.average_words_per_chapter(),
            Err(ChapterError::DivisionUndefined)
        ));

        Ok(())
    }

    #[test]
    fn heading_at_end_of_input_yields_zero_entry() -> anyhow::Result<()> {
        let ledger = count_words(
            ["Capítulo 1", "one", "Capítulo 2"],
            RepeatPolicy::Overwrite,
        )?;

        assert_eq!(entries(&ledger), vec![("Capítulo 1", 1), ("Capítulo 2", 0)]);
        assert_eq!(ledger.average_words_per_chapter()?, 0.5);

        Ok(())
    }

    #[test]
    fn text_before_first_heading_is_dropped() -> anyhow::Result<()> {
        let ledger = count_words(
            ["O Livro", "por alguém", "Capítulo 1", "one"],
            RepeatPolicy::Overwrite,
        )?;

        assert_eq!(entries(&ledger), vec![("Capítulo 1", 1)]);

        Ok(())
    }

    #[test]
    fn text_without_headings_is_rejected() {
        let result = count_words(["just", "some text"], RepeatPolicy::Overwrite);
        assert!(matches!(result, Err(ChapterError::NoChapterDetected)));

        let result = count_words(Vec::<String>::new(), RepeatPolicy::Overwrite);
        assert!(matches!(result, Err(ChapterError::NoChapterDetected)));
    }

    #[test]
    fn repeated_heading_overwrites_by_default() -> anyhow::Result<()> {
        let lines = [
            "Capítulo 1",
            "toc entry",
            "Capítulo 2",
            "Capítulo 1",
            "a b c",
            "Capítulo 2",
            "d e",
        ];

        let ledger = count_words(lines, RepeatPolicy::Overwrite)?;
        assert_eq!(entries(&ledger), vec![("Capítulo 1", 3), ("Capítulo 2", 2)]);

        let ledger = count_words(lines, RepeatPolicy::Accumulate)?;
        assert_eq!(entries(&ledger), vec![("Capítulo 1", 5), ("Capítulo 2", 2)]);

        let result = count_words(lines, RepeatPolicy::Reject);
        assert!(matches!(
            result,
            Err(ChapterError::RepeatedHeading { key }) if key == "Capítulo 1"
        ));

        Ok(())
    }
}
