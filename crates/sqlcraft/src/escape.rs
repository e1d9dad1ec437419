//! Identifier quoting and string-literal escaping.
//!
//! Both functions are pure and total: any input string produces a quoted
//! output with embedded quote characters neutralized. Escaping the same raw
//! name twice always yields the same text; escaping already-escaped text is
//! a caller error (quoting is deliberately not idempotent).

use heck::ToSnakeCase;

use crate::dialect::{Dialect, QueryConfig};

/// Escape an identifier (column, table, or alias name).
///
/// `*` passes through unchanged. Dotted names (`table.column`) have each
/// segment quoted independently. When `convert_case` is enabled, every
/// segment is converted to snake_case before quoting.
pub fn escape_ident(cfg: &QueryConfig, name: &str) -> String {
    if name == "*" {
        return name.to_string();
    }
    let quote = cfg.dialect.quote_char();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, segment) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        if segment == "*" {
            out.push('*');
            continue;
        }
        let converted;
        let segment = if cfg.convert_case {
            converted = segment.to_snake_case();
            converted.as_str()
        } else {
            segment
        };
        out.push(quote);
        for ch in segment.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
    }
    out
}

/// Escape a string value as an inline SQL literal.
///
/// Postgres doubles embedded quotes and backslashes, switching to the
/// `E'...'` form only when a backslash had to be escaped. MySQL maps a fixed
/// control-character set to named backslash sequences.
pub fn escape_string(dialect: Dialect, value: &str) -> String {
    match dialect {
        Dialect::Postgres => {
            let mut body = String::with_capacity(value.len() + 2);
            let mut escaped_backslash = false;
            for ch in value.chars() {
                match ch {
                    '\'' => body.push_str("''"),
                    '\\' => {
                        body.push_str("\\\\");
                        escaped_backslash = true;
                    }
                    _ => body.push(ch),
                }
            }
            if escaped_backslash {
                format!("E'{body}'")
            } else {
                format!("'{body}'")
            }
        }
        Dialect::MySql => {
            let mut out = String::with_capacity(value.len() + 2);
            out.push('\'');
            for ch in value.chars() {
                match ch {
                    '\0' => out.push_str("\\0"),
                    '\u{8}' => out.push_str("\\b"),
                    '\t' => out.push_str("\\t"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\u{1a}' => out.push_str("\\Z"),
                    '"' => out.push_str("\\\""),
                    '\'' => out.push_str("\\'"),
                    '\\' => out.push_str("\\\\"),
                    _ => out.push(ch),
                }
            }
            out.push('\'');
            out
        }
    }
}
