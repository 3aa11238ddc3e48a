use std::fs::OpenOptions;
use std::io::{BufRead as _, BufReader, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

/// Maps a document title to a file name, replacing characters that would escape `dir`.
pub fn file_name_for_title(title: &str) -> String {
    let name = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect::<String>();

    match name.trim() {
        "" | "." | ".." => "untitled".to_owned(),
        _ => name,
    }
}

pub fn text_path(dir: &Path, title: &str) -> PathBuf {
    dir.join(file_name_for_title(title))
}

/// Writes `text` byte-for-byte to `dir/<title>`.
pub fn write_text(dir: &Path, title: &str, text: &str, force: bool) -> anyhow::Result<PathBuf> {
    let path = text_path(dir, title);
    if path.exists() && !force {
        anyhow::bail!("text output already exists: {}", path.display());
    }

    write_atomic(&path, text.as_bytes(), force)?;

    tracing::info!(path = %path.display(), bytes = text.len(), "wrote text");
    Ok(path)
}

/// Stages `bytes` in a temp file next to `path` and persists it once complete,
/// so `path` never holds a partial write.
pub fn write_atomic(path: &Path, bytes: &[u8], force: bool) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output dir: {}", dir.display()))?;

    let mut staged = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in: {}", dir.display()))?;
    staged
        .write_all(bytes)
        .with_context(|| format!("write: {}", path.display()))?;
    staged
        .flush()
        .with_context(|| format!("flush: {}", path.display()))?;

    let persisted = if force {
        staged.persist(path)
    } else {
        staged.persist_noclobber(path)
    };
    persisted.map_err(|err| anyhow::anyhow!("persist {}: {}", path.display(), err.error))?;

    Ok(())
}

/// Opens `path` as a lazy sequence of lines with terminators removed.
pub fn read_lines(path: &Path) -> anyhow::Result<impl Iterator<Item = anyhow::Result<String>>> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("open text: {}", path.display()))?;
    let reader = BufReader::new(file);

    Ok(reader
        .lines()
        .map(|line| line.context("read text line")))
}
