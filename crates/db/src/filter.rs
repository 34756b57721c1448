//! Composable query predicates for list and count operations.
//!
//! Repositories accept a [`Condition`] tree and render it into a
//! parameterized `WHERE` clause with [`sqlx::QueryBuilder`]. Column names
//! are never interpolated from input: every condition is validated against
//! the owning repository's column allowlist before any SQL is built, and
//! all values travel as bind parameters.

use chrono::{DateTime, Utc};
use eyre::{bail, Result};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<Uuid> for Scalar {
    fn from(v: Uuid) -> Self {
        Scalar::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(v: DateTime<Utc>) -> Self {
        Scalar::Timestamp(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Scalar),
    Ne(String, Scalar),
    Lt(String, Scalar),
    Lte(String, Scalar),
    Gt(String, Scalar),
    Gte(String, Scalar),
    /// Case-insensitive substring match.
    Contains(String, String),
    In(String, Vec<Scalar>),
    IsNull(String),
    IsNotNull(String),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn eq(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Condition::Eq(column.into(), value.into())
    }

    pub fn contains(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Condition::Contains(column.into(), needle.into())
    }

    /// Checks every referenced column against the allowlist. Must pass
    /// before the condition is rendered into SQL.
    pub fn validate(&self, columns: &[&str]) -> Result<()> {
        match self {
            Condition::Eq(col, _)
            | Condition::Ne(col, _)
            | Condition::Lt(col, _)
            | Condition::Lte(col, _)
            | Condition::Gt(col, _)
            | Condition::Gte(col, _)
            | Condition::Contains(col, _)
            | Condition::In(col, _)
            | Condition::IsNull(col)
            | Condition::IsNotNull(col) => ensure_column(col, columns),
            Condition::And(children) | Condition::Or(children) => {
                for child in children {
                    child.validate(columns)?;
                }
                Ok(())
            }
            Condition::Not(child) => child.validate(columns),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Ordering and pagination applied after an optional filter.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub filter: Option<Condition>,
    pub order_by: Option<(String, SortDirection)>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn ensure_column(column: &str, columns: &[&str]) -> Result<()> {
    if columns.contains(&column) {
        Ok(())
    } else {
        bail!("unknown filter column: {column}");
    }
}

// Backslash-escape LIKE wildcards; backslash is the Postgres default
// escape character.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn push_scalar(qb: &mut QueryBuilder<'_, Postgres>, value: &Scalar) {
    match value {
        Scalar::Bool(v) => {
            qb.push_bind(*v);
        }
        Scalar::Int(v) => {
            qb.push_bind(*v);
        }
        Scalar::Float(v) => {
            qb.push_bind(*v);
        }
        Scalar::Text(v) => {
            qb.push_bind(v.clone());
        }
        Scalar::Uuid(v) => {
            qb.push_bind(*v);
        }
        Scalar::Timestamp(v) => {
            qb.push_bind(*v);
        }
    }
}

fn push_comparison(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    operator: &str,
    value: &Scalar,
) {
    qb.push(column);
    qb.push(operator);
    push_scalar(qb, value);
}

/// Renders a validated condition into the builder. Callers are expected
/// to have run [`Condition::validate`] against their column allowlist.
pub fn push_condition(qb: &mut QueryBuilder<'_, Postgres>, condition: &Condition) {
    match condition {
        Condition::Eq(col, v) => push_comparison(qb, col, " = ", v),
        Condition::Ne(col, v) => push_comparison(qb, col, " <> ", v),
        Condition::Lt(col, v) => push_comparison(qb, col, " < ", v),
        Condition::Lte(col, v) => push_comparison(qb, col, " <= ", v),
        Condition::Gt(col, v) => push_comparison(qb, col, " > ", v),
        Condition::Gte(col, v) => push_comparison(qb, col, " >= ", v),
        Condition::Contains(col, needle) => {
            qb.push(col);
            qb.push(" ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(needle)));
        }
        Condition::In(col, values) => {
            // An empty membership set matches nothing.
            if values.is_empty() {
                qb.push("FALSE");
                return;
            }
            qb.push(col);
            qb.push(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                push_scalar(qb, value);
            }
            qb.push(")");
        }
        Condition::IsNull(col) => {
            qb.push(col);
            qb.push(" IS NULL");
        }
        Condition::IsNotNull(col) => {
            qb.push(col);
            qb.push(" IS NOT NULL");
        }
        Condition::And(children) => {
            if children.is_empty() {
                qb.push("TRUE");
                return;
            }
            qb.push("(");
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    qb.push(" AND ");
                }
                push_condition(qb, child);
            }
            qb.push(")");
        }
        Condition::Or(children) => {
            if children.is_empty() {
                qb.push("FALSE");
                return;
            }
            qb.push("(");
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                push_condition(qb, child);
            }
            qb.push(")");
        }
        Condition::Not(child) => {
            qb.push("NOT (");
            push_condition(qb, child);
            qb.push(")");
        }
    }
}

/// Appends WHERE / ORDER BY / LIMIT / OFFSET clauses for a list query.
/// Validates the filter and the ordering column against the allowlist.
pub fn push_list_clauses(
    qb: &mut QueryBuilder<'_, Postgres>,
    options: &ListOptions,
    columns: &[&str],
) -> Result<()> {
    if let Some(filter) = &options.filter {
        filter.validate(columns)?;
        qb.push(" WHERE ");
        push_condition(qb, filter);
    }

    if let Some((column, direction)) = &options.order_by {
        ensure_column(column, columns)?;
        qb.push(" ORDER BY ");
        qb.push(column.as_str());
        qb.push(match direction {
            SortDirection::Asc => " ASC",
            SortDirection::Desc => " DESC",
        });
    }

    if let Some(limit) = options.limit {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }

    if let Some(offset) = options.offset {
        qb.push(" OFFSET ");
        qb.push_bind(offset);
    }

    Ok(())
}

/// Appends an optional WHERE clause for a count query.
pub fn push_count_clause(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: Option<&Condition>,
    columns: &[&str],
) -> Result<()> {
    if let Some(filter) = filter {
        filter.validate(columns)?;
        qb.push(" WHERE ");
        push_condition(qb, filter);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COLUMNS: &[&str] = &["id", "status", "first_name", "last_name", "date", "price"];

    fn render(condition: &Condition) -> String {
        let mut qb = QueryBuilder::new("SELECT * FROM t WHERE ");
        push_condition(&mut qb, condition);
        qb.into_sql()
    }

    #[test]
    fn renders_equality_with_bind_parameter() {
        let sql = render(&Condition::eq("status", "ACTIVE"));
        assert_eq!(sql, "SELECT * FROM t WHERE status = $1");
    }

    #[test]
    fn renders_range_comparisons() {
        let from = Utc::now();
        let sql = render(&Condition::Gte("date".to_string(), from.into()));
        assert_eq!(sql, "SELECT * FROM t WHERE date >= $1");
    }

    #[test]
    fn renders_nested_boolean_composition() {
        let condition = Condition::And(vec![
            Condition::eq("status", "ACTIVE"),
            Condition::Or(vec![
                Condition::contains("first_name", "ana"),
                Condition::contains("last_name", "ana"),
            ]),
            Condition::Not(Box::new(Condition::IsNull("date".to_string()))),
        ]);
        let sql = render(&condition);
        assert_eq!(
            sql,
            "SELECT * FROM t WHERE (status = $1 AND (first_name ILIKE $2 OR last_name ILIKE $3) AND NOT (date IS NULL))"
        );
    }

    #[test]
    fn renders_membership_set() {
        let condition = Condition::In(
            "status".to_string(),
            vec!["CREATED".into(), "CONFIRMED".into()],
        );
        let sql = render(&condition);
        assert_eq!(sql, "SELECT * FROM t WHERE status IN ($1, $2)");
    }

    #[test]
    fn empty_membership_set_matches_nothing() {
        let sql = render(&Condition::In("status".to_string(), vec![]));
        assert_eq!(sql, "SELECT * FROM t WHERE FALSE");
    }

    #[test]
    fn validate_rejects_unknown_column() {
        let condition = Condition::And(vec![
            Condition::eq("status", "ACTIVE"),
            Condition::eq("password_hash; DROP TABLE t", "x"),
        ]);
        assert!(condition.validate(COLUMNS).is_err());
    }

    #[test]
    fn validate_accepts_nested_allowlisted_columns() {
        let condition = Condition::Not(Box::new(Condition::Or(vec![
            Condition::eq("id", Uuid::new_v4()),
            Condition::Lte("price".to_string(), 10.0.into()),
        ])));
        assert!(condition.validate(COLUMNS).is_ok());
    }

    #[test]
    fn escapes_like_wildcards_in_contains() {
        let mut qb = QueryBuilder::<Postgres>::new("");
        push_condition(
            &mut qb,
            &Condition::contains("first_name", "100%_done\\x"),
        );
        // Pattern text travels as a bind value, so only the clause shape
        // is visible in the SQL.
        assert_eq!(qb.into_sql(), "first_name ILIKE $1");
        assert_eq!(escape_like("100%_done\\x"), "100\\%\\_done\\\\x");
    }

    #[test]
    fn list_clauses_validate_order_column() {
        let options = ListOptions {
            filter: None,
            order_by: Some(("evil; --".to_string(), SortDirection::Asc)),
            limit: None,
            offset: None,
        };
        let mut qb = QueryBuilder::new("SELECT * FROM t");
        assert!(push_list_clauses(&mut qb, &options, COLUMNS).is_err());
    }

    #[test]
    fn list_clauses_append_order_and_pagination() {
        let options = ListOptions {
            filter: Some(Condition::eq("status", "ACTIVE")),
            order_by: Some(("date".to_string(), SortDirection::Desc)),
            limit: Some(20),
            offset: Some(40),
        };
        let mut qb = QueryBuilder::new("SELECT * FROM t");
        push_list_clauses(&mut qb, &options, COLUMNS).unwrap();
        assert_eq!(
            qb.into_sql(),
            "SELECT * FROM t WHERE status = $1 ORDER BY date DESC LIMIT $2 OFFSET $3"
        );
    }
}
