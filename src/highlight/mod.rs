//! SQL syntax highlighting.
//!
//! Lexical classification only: words and structural markers are matched
//! with an ordered list of regex rules, and later rules paint over earlier
//! ones. Nothing here parses or validates SQL.

mod engine;
mod rules;
pub mod theme;

pub use engine::{highlight, BlockHighlighter, HighlightSpan, Highlighter};
pub use rules::{Rule, RuleSet, ALTER_WORDS, JOIN_WORDS, KEYWORDS};

use std::fmt;

/// Token category assigned by the highlighter.
///
/// The declaration order is the rule application order: a category later
/// in the list wins wherever its matches overlap an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Aggregates, casts and `UPDATE`.
    AlterFunction,
    /// Reserved words (`SELECT`, `FROM`, ...).
    Keyword,
    /// Join and predicate words (`JOIN`, `AND`, `NULL`, ...).
    JoinWord,
    /// Single-quoted literal.
    StringLiteral,
    /// `--` line comment.
    Comment,
}

impl Category {
    /// All categories in application order.
    pub const ALL: [Category; 5] = [
        Category::AlterFunction,
        Category::Keyword,
        Category::JoinWord,
        Category::StringLiteral,
        Category::Comment,
    ];

    /// Returns true for categories matched against the uppercased line.
    pub fn is_case_folded(&self) -> bool {
        matches!(self, Self::AlterFunction | Self::Keyword | Self::JoinWord)
    }

    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlterFunction => "alter",
            Self::Keyword => "keyword",
            Self::JoinWord => "join",
            Self::StringLiteral => "string",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
