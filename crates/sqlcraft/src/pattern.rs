//! Regular-expression to SQL pattern translation.
//!
//! Simple expressions (anchors plus literal text and `.`/`.*` wildcards)
//! compile to `LIKE`/`ILIKE` patterns, which are portable and index-friendly
//! for prefix/suffix/substring matches. Anything using real regex features
//! bypasses translation and uses the dialect's native regex operator.

use crate::dialect::Dialect;
use crate::escape::escape_string;

/// A regular-expression value destined for a SQL pattern match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqlRegex {
    source: String,
    case_insensitive: bool,
}

impl SqlRegex {
    /// Create a case-sensitive pattern.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            case_insensitive: false,
        }
    }

    /// Create a case-insensitive pattern.
    pub fn case_insensitive(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            case_insensitive: true,
        }
    }

    /// Build from a compiled [`regex::Regex`], honoring a leading inline
    /// `(?i)` flag.
    pub fn from_regex(re: &regex::Regex) -> Self {
        let src = re.as_str();
        if let Some(rest) = src.strip_prefix("(?i)") {
            Self::case_insensitive(rest)
        } else {
            Self::new(src)
        }
    }

    /// The raw pattern source (anchors included).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether matching ignores case.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

impl From<&regex::Regex> for SqlRegex {
    fn from(re: &regex::Regex) -> Self {
        SqlRegex::from_regex(re)
    }
}

/// Outcome of translating a pattern.
#[derive(Debug, PartialEq, Eq)]
pub enum Translated {
    /// Simple pattern: usable with LIKE/ILIKE.
    Like(String),
    /// Complex pattern: must use the dialect's native regex operator.
    Complex,
}

/// Translate a pattern into a LIKE pattern, or report it as complex.
pub fn translate(rx: &SqlRegex) -> Translated {
    let mut src = rx.source.as_str();
    let anchored_start = src.starts_with('^');
    if anchored_start {
        src = &src[1..];
    }
    let anchored_end = src.ends_with('$') && !src.ends_with("\\$");
    if anchored_end {
        src = &src[..src.len() - 1];
    }

    let mut like = String::with_capacity(src.len() + 2);
    if !anchored_start {
        like.push('%');
    }
    let mut chars = src.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    like.push('%');
                } else {
                    like.push('_');
                }
            }
            '%' => like.push_str("\\%"),
            '_' => like.push_str("\\_"),
            '\\' => match chars.next() {
                // Character-class and word-boundary escapes need a real
                // regex engine.
                Some('d' | 'D' | 's' | 'S' | 'w' | 'W' | 'b' | 'B') => return Translated::Complex,
                Some('%') => like.push_str("\\%"),
                Some('_') => like.push_str("\\_"),
                Some(c) => like.push(c),
                None => return Translated::Complex,
            },
            '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '?' | '+' | '*' | '|' => {
                return Translated::Complex;
            }
            _ => like.push(ch),
        }
    }
    if !anchored_end {
        like.push('%');
    }
    Translated::Like(like)
}

/// The inline literal a bare regex compiles to: the LIKE pattern for simple
/// expressions, the raw source for complex ones.
pub(crate) fn literal_pattern(rx: &SqlRegex) -> String {
    match translate(rx) {
        Translated::Like(like) => like,
        Translated::Complex => rx.source.clone(),
    }
}

/// Render a full pattern-match condition for an already-escaped column.
///
/// Complex case-insensitive patterns on MySQL rely on `REGEXP` under the
/// server's default collation; against a case-sensitive or binary collation
/// the match turns case-sensitive.
pub(crate) fn match_condition(dialect: Dialect, column_sql: &str, rx: &SqlRegex) -> String {
    match translate(rx) {
        Translated::Like(like) => {
            let lit = escape_string(dialect, &like);
            match (dialect, rx.case_insensitive) {
                (Dialect::Postgres, true) => format!("{column_sql} ILIKE {lit}"),
                (Dialect::Postgres, false) => format!("{column_sql} LIKE {lit}"),
                (Dialect::MySql, true) => format!("LOWER({column_sql}) LIKE LOWER({lit})"),
                (Dialect::MySql, false) => format!("{column_sql} LIKE {lit}"),
            }
        }
        Translated::Complex => match dialect {
            Dialect::Postgres => {
                // Postgres spells word boundaries \y rather than \b.
                let source = rx.source.replace("\\b", "\\y");
                let lit = escape_string(dialect, &source);
                let op = if rx.case_insensitive { "~*" } else { "~" };
                format!("{column_sql} {op} {lit}")
            }
            Dialect::MySql => {
                // MySQL REGEXP is case-insensitive under the default
                // collation; BINARY forces a case-sensitive match.
                let lit = escape_string(dialect, rx.source());
                if rx.case_insensitive {
                    format!("{column_sql} REGEXP {lit}")
                } else {
                    format!("{column_sql} REGEXP BINARY {lit}")
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_literal_is_exact_like() {
        let rx = SqlRegex::new("^admin$");
        assert_eq!(translate(&rx), Translated::Like("admin".to_string()));
    }

    #[test]
    fn unanchored_gets_percent_wrapping() {
        let rx = SqlRegex::new("admin");
        assert_eq!(translate(&rx), Translated::Like("%admin%".to_string()));
    }

    #[test]
    fn prefix_match() {
        let rx = SqlRegex::new("^adm");
        assert_eq!(translate(&rx), Translated::Like("adm%".to_string()));
    }

    #[test]
    fn dot_star_becomes_percent_dot_becomes_underscore() {
        let rx = SqlRegex::new("^a.*b.c$");
        assert_eq!(translate(&rx), Translated::Like("a%b_c".to_string()));
    }

    #[test]
    fn literal_percent_and_underscore_escaped() {
        let rx = SqlRegex::new("^100%_done$");
        assert_eq!(translate(&rx), Translated::Like("100\\%\\_done".to_string()));
    }

    #[test]
    fn class_escape_is_complex() {
        assert_eq!(translate(&SqlRegex::new("^a\\d+$")), Translated::Complex);
        assert_eq!(translate(&SqlRegex::new("\\bword\\b")), Translated::Complex);
    }

    #[test]
    fn alternation_and_groups_are_complex() {
        assert_eq!(translate(&SqlRegex::new("^(a|b)$")), Translated::Complex);
        assert_eq!(translate(&SqlRegex::new("a{2,3}")), Translated::Complex);
        assert_eq!(translate(&SqlRegex::new("colou?r")), Translated::Complex);
    }

    #[test]
    fn escaped_literal_dot_stays_simple() {
        let rx = SqlRegex::new("^a\\.b$");
        assert_eq!(translate(&rx), Translated::Like("a.b".to_string()));
    }

    #[test]
    fn simple_condition_pg() {
        let rx = SqlRegex::new("^adm");
        assert_eq!(
            match_condition(Dialect::Postgres, "\"name\"", &rx),
            "\"name\" LIKE 'adm%'"
        );
        let rx = SqlRegex::case_insensitive("^adm");
        assert_eq!(
            match_condition(Dialect::Postgres, "\"name\"", &rx),
            "\"name\" ILIKE 'adm%'"
        );
    }

    #[test]
    fn simple_condition_mysql_ci_lowers_both_sides() {
        let rx = SqlRegex::case_insensitive("^adm");
        assert_eq!(
            match_condition(Dialect::MySql, "`name`", &rx),
            "LOWER(`name`) LIKE LOWER('adm%')"
        );
    }

    #[test]
    fn complex_condition_pg_rewrites_word_boundary() {
        let rx = SqlRegex::new("\\bword\\b");
        assert_eq!(
            match_condition(Dialect::Postgres, "\"name\"", &rx),
            "\"name\" ~ E'\\\\yword\\\\y'"
        );
    }

    #[test]
    fn complex_condition_mysql_case_modes() {
        let rx = SqlRegex::new("^(a|b)$");
        assert_eq!(
            match_condition(Dialect::MySql, "`name`", &rx),
            "`name` REGEXP BINARY '^(a|b)$'"
        );
        let rx = SqlRegex::case_insensitive("^(a|b)$");
        assert_eq!(
            match_condition(Dialect::MySql, "`name`", &rx),
            "`name` REGEXP '^(a|b)$'"
        );
    }

    #[test]
    fn from_regex_reads_inline_flag() {
        let re = regex::Regex::new("(?i)^abc$").unwrap();
        let rx = SqlRegex::from_regex(&re);
        assert!(rx.is_case_insensitive());
        assert_eq!(rx.source(), "^abc$");
    }
}
