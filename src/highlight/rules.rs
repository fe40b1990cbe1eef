//! Highlight rule set.
//!
//! Word lists are static configuration; the compiled rule set is built once
//! and shared read-only.

use super::Category;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Words painted as [`Category::AlterFunction`].
pub const ALTER_WORDS: &[&str] = &["CAST", "SUM", "MAX", "AVG", "UPDATE", "CONCAT"];

/// Words painted as [`Category::Keyword`].
pub const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "INSERT", "DELETE", "GROUP", "ORDER", "BY", "HAVING", "AS",
    "DISTINCT", "CREATE", "ALTER", "DROP", "INDEX", "TABLE", "PRIMARY", "FOREIGN", "KEY",
    "UNION", "EXISTS", "ASC", "DESC", "TOP", "VALUES", "INTO", "SET", "PROCEDURE", "VIEW", "IF",
    "ELSE", "BEGIN", "END", "RETURN", "WHILE", "DECLARE", "CURSOR", "OPEN", "FETCH", "CLOSE",
    "DEALLOCATE", "NEXT", "EXEC", "EXECUTE", "PRINT", "RAISEERROR", "TRY", "CATCH",
    "TRANSACTION", "COMMIT", "ROLLBACK", "CASE", "WHEN", "THEN",
];

/// Words painted as [`Category::JoinWord`].
pub const JOIN_WORDS: &[&str] = &[
    "JOIN", "INNER", "LEFT", "RIGHT", "OUTER", "LIKE", "AND", "OR", "NULL", "EXISTS", "IN", "NOT",
    "BETWEEN", "IS",
];

const STRING_PATTERN: &str = r"'[^']*'";
const COMMENT_PATTERN: &str = r"--.*";

/// A single (pattern, category) rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    category: Category,
}

impl Rule {
    /// Returns the compiled pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Returns the category this rule paints.
    pub fn category(&self) -> Category {
        self.category
    }
}

/// Ordered, immutable collection of highlight rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Builds a rule set from the three word tables plus the fixed string
    /// and comment patterns, in application order.
    pub fn from_words(alter: &[&str], keywords: &[&str], joins: &[&str]) -> Self {
        let mut rules = Vec::with_capacity(alter.len() + keywords.len() + joins.len() + 2);

        for (words, category) in [
            (alter, Category::AlterFunction),
            (keywords, Category::Keyword),
            (joins, Category::JoinWord),
        ] {
            rules.extend(words.iter().filter_map(|word| word_rule(word, category)));
        }

        rules.extend(compile(STRING_PATTERN, Category::StringLiteral));
        rules.extend(compile(COMMENT_PATTERN, Category::Comment));

        Self { rules }
    }

    /// Returns the process-wide rule set built from the default word tables.
    pub fn standard() -> &'static RuleSet {
        static STANDARD: OnceLock<RuleSet> = OnceLock::new();
        STANDARD.get_or_init(|| Self::from_words(ALTER_WORDS, KEYWORDS, JOIN_WORDS))
    }

    /// Returns all rules in application order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the patterns of one category, in application order.
    pub fn patterns(&self, category: Category) -> impl Iterator<Item = &Regex> {
        self.rules
            .iter()
            .filter(move |rule| rule.category == category)
            .map(|rule| &rule.pattern)
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_words(ALTER_WORDS, KEYWORDS, JOIN_WORDS)
    }
}

/// Wraps a word in word-boundary anchors. Matching happens on an uppercased
/// copy, so the word itself is uppercased here too.
fn word_rule(word: &str, category: Category) -> Option<Rule> {
    let pattern = format!(r"\b{}\b", regex::escape(&word.to_uppercase()));
    compile(&pattern, category)
}

fn compile(pattern: &str, category: Category) -> Option<Rule> {
    match Regex::new(pattern) {
        Ok(pattern) => Some(Rule { pattern, category }),
        Err(e) => {
            warn!("Skipping highlight pattern {pattern:?}: {e}");
            None
        }
    }
}
