//! SQL dialect selection and compile-time configuration.
//!
//! Two fixed flavors are supported. They differ in placeholder style,
//! identifier quoting, boolean literal form and upsert/RETURNING surface:
//!
//! | | [`Dialect::Postgres`] | [`Dialect::MySql`] |
//! |---|---|---|
//! | placeholders | `$1`, `$2`, ... | `?` |
//! | identifiers | `"name"` | `` `name` `` |
//! | booleans | `'t'` / `'f'` | `true` / `false` |
//! | RETURNING | yes | no (driver insert id) |
//! | upsert | `ON CONFLICT` | `ON DUPLICATE KEY UPDATE` |

/// One of the two supported SQL dialects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    /// PostgreSQL: `$n` placeholders, double-quoted identifiers.
    Postgres,
    /// MySQL: sequential `?` placeholders, backtick identifiers.
    MySql,
}

impl Dialect {
    /// The identifier quote character.
    pub fn quote_char(self) -> char {
        match self {
            Dialect::Postgres => '"',
            Dialect::MySql => '`',
        }
    }

    /// Whether placeholders carry an explicit 1-based index (`$n`).
    pub fn indexed_placeholders(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// Whether the dialect supports a `RETURNING` clause.
    pub fn supports_returning(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// Render a boolean literal.
    pub fn bool_literal(self, value: bool) -> &'static str {
        match self {
            Dialect::Postgres => {
                if value {
                    "'t'"
                } else {
                    "'f'"
                }
            }
            Dialect::MySql => {
                if value {
                    "true"
                } else {
                    "false"
                }
            }
        }
    }
}

/// Compile-time configuration shared by every builder.
#[derive(Clone, Copy, Debug)]
pub struct QueryConfig {
    /// Target dialect.
    pub dialect: Dialect,
    /// Convert camelCase identifiers to snake_case before escaping, and
    /// result row keys back to camelCase after execution.
    pub convert_case: bool,
}

impl QueryConfig {
    /// Configuration for the given dialect with case conversion disabled.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            convert_case: false,
        }
    }

    /// Enable or disable identifier/result-key case conversion.
    pub fn with_convert_case(mut self, enabled: bool) -> Self {
        self.convert_case = enabled;
        self
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::new(Dialect::Postgres)
    }
}
