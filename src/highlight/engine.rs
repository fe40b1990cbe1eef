//! Highlighter engine.
//!
//! Applies a [`RuleSet`] to one line at a time. Offsets count characters
//! of the original line, not bytes.

use super::{Category, RuleSet};
use std::collections::HashMap;
use std::ops::Range;

/// Lines cached by a [`BlockHighlighter`] before the cache is reset.
const MAX_CACHED_LINES: usize = 4096;

/// A categorized range of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Character offset of the first character.
    pub start: usize,
    /// Length in characters.
    pub length: usize,
    /// Category painted over the range.
    pub category: Category,
}

impl HighlightSpan {
    /// Creates a new span.
    pub fn new(start: usize, length: usize, category: Category) -> Self {
        Self {
            start,
            length,
            category,
        }
    }

    /// Character offset one past the last character.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Byte range of the span within `line`, for slicing.
    ///
    /// Returns `None` if the span does not fit the line.
    pub fn byte_range(&self, line: &str) -> Option<Range<usize>> {
        let mut bounds = line
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()));
        let start = bounds.nth(self.start)?;
        let end = match self.length {
            0 => start,
            n => bounds.nth(n - 1)?,
        };
        Some(start..end)
    }
}

/// Highlights a line with the standard rule set.
pub fn highlight(line: &str) -> Vec<HighlightSpan> {
    Highlighter::standard().highlight(line)
}

/// Stateless line highlighter over a borrowed rule set.
#[derive(Debug, Clone, Copy)]
pub struct Highlighter<'a> {
    rules: &'a RuleSet,
}

impl Highlighter<'static> {
    /// Creates a highlighter over the shared standard rules.
    pub fn standard() -> Self {
        Self::new(RuleSet::standard())
    }
}

impl<'a> Highlighter<'a> {
    /// Creates a highlighter over the given rules.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Returns every rule match as a span, in rule application order.
    ///
    /// Spans may overlap; when they do, the later span wins. Lines whose
    /// uppercase form does not keep byte offsets aligned are returned
    /// unformatted.
    pub fn highlight(&self, line: &str) -> Vec<HighlightSpan> {
        if line.is_empty() || !case_fold_preserves_offsets(line) {
            return Vec::new();
        }

        let upper = line.to_uppercase();
        let chars = CharIndex::new(line);
        let mut spans = Vec::new();

        for rule in self.rules.rules() {
            let subject = if rule.category().is_case_folded() {
                upper.as_str()
            } else {
                line
            };

            spans.extend(
                rule.pattern()
                    .find_iter(subject)
                    .filter(|m| !m.is_empty())
                    .map(|m| {
                        let start = chars.at(m.start());
                        HighlightSpan::new(start, chars.at(m.end()) - start, rule.category())
                    }),
            );
        }

        spans
    }

    /// Resolves overlapping spans into one category per character.
    ///
    /// Spans are painted in order onto a blank canvas, so the last rule
    /// covering a position decides its category.
    pub fn classify(&self, line: &str) -> Vec<Option<Category>> {
        let mut canvas = vec![None; line.chars().count()];
        for span in self.highlight(line) {
            for slot in &mut canvas[span.start..span.end()] {
                *slot = Some(span.category);
            }
        }
        canvas
    }

    /// Returns non-overlapping spans describing the effective category of
    /// every painted range, left to right.
    pub fn effective_spans(&self, line: &str) -> Vec<HighlightSpan> {
        let canvas = self.classify(line);
        let mut spans: Vec<HighlightSpan> = Vec::new();

        for (offset, slot) in canvas.iter().enumerate() {
            let Some(category) = *slot else {
                continue;
            };
            match spans.last_mut() {
                Some(last) if last.category == category && last.end() == offset => {
                    last.length += 1;
                }
                _ => spans.push(HighlightSpan::new(offset, 1, category)),
            }
        }

        spans
    }
}

/// Maps byte offsets of a line to character offsets.
struct CharIndex {
    /// Character offset for each byte offset, plus one entry for the end.
    /// Empty for ASCII lines, where the two coincide.
    table: Vec<usize>,
}

impl CharIndex {
    fn new(line: &str) -> Self {
        if line.is_ascii() {
            return Self { table: Vec::new() };
        }
        let mut table = vec![0; line.len() + 1];
        let mut count = 0;
        for (i, c) in line.char_indices() {
            table[i..i + c.len_utf8()].fill(count);
            count += 1;
        }
        table[line.len()] = count;
        Self { table }
    }

    fn at(&self, byte: usize) -> usize {
        self.table.get(byte).copied().unwrap_or(byte)
    }
}

/// Returns true when uppercasing every character keeps its UTF-8 width,
/// so match offsets in the uppercased copy are valid in the original.
fn case_fold_preserves_offsets(line: &str) -> bool {
    if line.is_ascii() {
        return true;
    }
    line.chars().all(|c| {
        let mut upper = c.to_uppercase();
        matches!((upper.next(), upper.next()), (Some(u), None) if u.len_utf8() == c.len_utf8())
    })
}

/// Per-block highlighter for an editor document.
///
/// Results are cached by line content for the current revision; bumping
/// the revision drops the cache, as does reaching the cache limit.
#[derive(Debug)]
pub struct BlockHighlighter {
    rules: RuleSet,
    revision: u64,
    cache: HashMap<String, Vec<HighlightSpan>>,
}

impl BlockHighlighter {
    /// Creates a block highlighter with the default rules.
    pub fn new() -> Self {
        Self::with_rules(RuleSet::default())
    }

    /// Creates a block highlighter with custom rules.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self {
            rules,
            revision: 0,
            cache: HashMap::new(),
        }
    }

    /// Returns the current revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Moves to the given revision; cached lines from other revisions are dropped.
    pub fn set_revision(&mut self, revision: u64) {
        if revision != self.revision {
            self.revision = revision;
            self.cache.clear();
        }
    }

    /// Returns the number of cached lines.
    pub fn cached_lines(&self) -> usize {
        self.cache.len()
    }

    /// Highlights one edited block (line).
    pub fn highlight_block(&mut self, line: &str) -> Vec<HighlightSpan> {
        if let Some(spans) = self.cache.get(line) {
            return spans.clone();
        }
        let spans = Highlighter::new(&self.rules).effective_spans(line);
        if self.cache.len() >= MAX_CACHED_LINES {
            self.cache.clear();
        }
        self.cache.insert(line.to_string(), spans.clone());
        spans
    }

    /// Highlights a whole document, one entry per line.
    pub fn highlight_document(&mut self, text: &str) -> Vec<Vec<HighlightSpan>> {
        text.lines().map(|line| self.highlight_block(line)).collect()
    }
}

impl Default for BlockHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
