//! Line-level diff rendering

use colored::Colorize;
use std::io::{self, Write};

/// Renders the difference between two text blobs.
///
/// An empty blob on one side means the other side was added or removed as a whole.
pub trait DiffRenderer {
    fn render(&self, old: &[u8], new: &[u8], out: &mut dyn Write) -> io::Result<()>;
}

/// Longest-common-subsequence line diff.
///
/// Prints nothing for identical blobs. Otherwise every line is written with a
/// two-character prefix: `  ` kept, `- ` removed, `+ ` added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineDiffRenderer {
    color: bool,
}

impl LineDiffRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn write_line(&self, out: &mut dyn Write, line: &LineChange<'_>) -> io::Result<()> {
        let (prefix, text) = match line {
            LineChange::Kept(text) => ("  ", text),
            LineChange::Removed(text) => ("- ", text),
            LineChange::Added(text) => ("+ ", text),
        };
        let text = String::from_utf8_lossy(text);
        let rendered = format!("{prefix}{text}");

        if self.color {
            match line {
                LineChange::Kept(_) => writeln!(out, "{rendered}"),
                LineChange::Removed(_) => writeln!(out, "{}", rendered.red()),
                LineChange::Added(_) => writeln!(out, "{}", rendered.green()),
            }
        } else {
            writeln!(out, "{rendered}")
        }
    }
}

impl DiffRenderer for LineDiffRenderer {
    fn render(&self, old: &[u8], new: &[u8], out: &mut dyn Write) -> io::Result<()> {
        if old == new {
            return Ok(());
        }
        for change in diff_lines(&split_lines(old), &split_lines(new)) {
            self.write_line(out, &change)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineChange<'a> {
    Kept(&'a [u8]),
    Removed(&'a [u8]),
    Added(&'a [u8]),
}

fn split_lines(blob: &[u8]) -> Vec<&[u8]> {
    if blob.is_empty() {
        return Vec::new();
    }
    let blob = blob.strip_suffix(b"\n").unwrap_or(blob);
    blob.split(|byte| *byte == b'\n').collect()
}

fn diff_lines<'a>(old: &[&'a [u8]], new: &[&'a [u8]]) -> Vec<LineChange<'a>> {
    let (n, m) = (old.len(), new.len());

    // lcs[i][j] is the LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut changes = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            changes.push(LineChange::Kept(old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            changes.push(LineChange::Removed(old[i]));
            i += 1;
        } else {
            changes.push(LineChange::Added(new[j]));
            j += 1;
        }
    }
    changes.extend(old[i..].iter().copied().map(LineChange::Removed));
    changes.extend(new[j..].iter().copied().map(LineChange::Added));
    changes
}
