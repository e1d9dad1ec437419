use crate::compile::Compiler;
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::expr::Expr;

/// Per-column conflict resolution strategy.
///
/// `NEW` below denotes the incoming value reference: `EXCLUDED."col"` on the
/// indexed dialect, `` VALUES(`col`) `` on the loose dialect.
#[derive(Clone, Debug)]
pub enum ConflictRule {
    /// `col = NEW`.
    Update,
    /// `col = COALESCE(existing, NEW)`: write only when currently unset.
    Fill,
    /// `col = existing + 1`.
    Inc,
    /// `col = existing - 1`.
    Dec,
    /// `col = existing + NEW`.
    Add,
    /// `col = existing - NEW`.
    Sub,
    /// `col = GREATEST(existing, NEW)`.
    Max,
    /// `col = LEAST(existing, NEW)`.
    Min,
    /// `col = <expression>`.
    Expr(Expr),
}

impl ConflictRule {
    /// Parse a strategy name, case-insensitively.
    pub fn parse(name: &str) -> SqlResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "update" => Ok(ConflictRule::Update),
            "fill" => Ok(ConflictRule::Fill),
            "inc" => Ok(ConflictRule::Inc),
            "dec" => Ok(ConflictRule::Dec),
            "add" => Ok(ConflictRule::Add),
            "sub" => Ok(ConflictRule::Sub),
            "max" => Ok(ConflictRule::Max),
            "min" => Ok(ConflictRule::Min),
            other => Err(SqlError::UnknownConflictRule(other.to_string())),
        }
    }
}

/// What to do when an insert collides with an existing unique key.
#[derive(Clone, Debug)]
pub enum OnConflict {
    /// Drop the colliding row. `INSERT IGNORE` on the loose dialect skips
    /// any-error rows; `DO NOTHING` on the indexed dialect skips only the
    /// declared conflict target. The divergence is deliberate.
    Ignore,
    /// Per-column update rules.
    Update(Vec<(String, ConflictRule)>),
}

/// Reference to the incoming (proposed) value for a column.
fn new_value(c: &mut Compiler<'_>, column: &str) {
    match c.dialect() {
        Dialect::Postgres => {
            c.push("EXCLUDED.");
            c.push_ident(column);
        }
        Dialect::MySql => {
            c.push("VALUES(");
            c.push_ident(column);
            c.push(")");
        }
    }
}

/// Reference to the existing stored value, table-qualified.
fn existing_value(c: &mut Compiler<'_>, table: &str, column: &str) {
    c.push_ident(&format!("{table}.{column}"));
}

fn render_rule(
    c: &mut Compiler<'_>,
    table: &str,
    column: &str,
    rule: &ConflictRule,
) -> SqlResult<()> {
    c.push_ident(column);
    c.push("=");
    match rule {
        ConflictRule::Update => new_value(c, column),
        ConflictRule::Fill => {
            c.push("COALESCE(");
            existing_value(c, table, column);
            c.push(",");
            new_value(c, column);
            c.push(")");
        }
        ConflictRule::Inc => {
            existing_value(c, table, column);
            c.push("+1");
        }
        ConflictRule::Dec => {
            existing_value(c, table, column);
            c.push("-1");
        }
        ConflictRule::Add => {
            existing_value(c, table, column);
            c.push("+");
            new_value(c, column);
        }
        ConflictRule::Sub => {
            existing_value(c, table, column);
            c.push("-");
            new_value(c, column);
        }
        ConflictRule::Max => {
            c.push("GREATEST(");
            existing_value(c, table, column);
            c.push(",");
            new_value(c, column);
            c.push(")");
        }
        ConflictRule::Min => {
            c.push("LEAST(");
            existing_value(c, table, column);
            c.push(",");
            new_value(c, column);
            c.push(")");
        }
        ConflictRule::Expr(e) => c.expr(e)?,
    }
    Ok(())
}

/// Append the conflict clause for an INSERT. Returns an error when the
/// indexed dialect has a conflict policy without a unique-column set.
/// On the loose dialect `OnConflict::Ignore` is handled by the INSERT
/// keyword itself and emits nothing here.
pub(crate) fn render_conflict(
    c: &mut Compiler<'_>,
    table: &str,
    unique: Option<&[String]>,
    conflict: &OnConflict,
) -> SqlResult<()> {
    match c.dialect() {
        Dialect::Postgres => {
            let unique = match unique {
                Some(columns) if !columns.is_empty() => columns,
                _ => {
                    return Err(SqlError::config(
                        "conflict resolution requires a unique column set on this dialect",
                    ));
                }
            };
            c.push(" ON CONFLICT (");
            for (i, col) in unique.iter().enumerate() {
                if i > 0 {
                    c.push(",");
                }
                c.push_ident(col);
            }
            c.push(")");
            match conflict {
                OnConflict::Ignore => c.push(" DO NOTHING"),
                OnConflict::Update(rules) => {
                    c.push(" DO UPDATE SET ");
                    for (i, (col, rule)) in rules.iter().enumerate() {
                        if i > 0 {
                            c.push(",");
                        }
                        render_rule(c, table, col, rule)?;
                    }
                }
            }
        }
        Dialect::MySql => match conflict {
            OnConflict::Ignore => {}
            OnConflict::Update(rules) => {
                c.push(" ON DUPLICATE KEY UPDATE ");
                for (i, (col, rule)) in rules.iter().enumerate() {
                    if i > 0 {
                        c.push(",");
                    }
                    render_rule(c, table, col, rule)?;
                }
            }
        },
    }
    Ok(())
}
