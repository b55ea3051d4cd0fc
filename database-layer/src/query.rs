//! Query builder for filtered, windowed listings.
//!
//! Wraps `sqlx::QueryBuilder` so repositories can append optional filters
//! without hand-numbering bind parameters.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{Postgres, QueryBuilder};

/// Filtered query builder.
///
/// The base query must already contain a `WHERE` clause (`WHERE 1=1` is
/// fine); every filter is appended with `AND`.
///
/// ```rust,ignore
/// let mut query = FilteredQuery::new("SELECT * FROM claims c WHERE 1=1");
/// query
///     .filter_contains("c.status", Some("denied"))
///     .order_by("c.id", "ASC")
///     .window(0, 30);
/// let rows: Vec<Claim> = query.build_query_as().fetch_all(&pool).await?;
/// ```
pub struct FilteredQuery<'a> {
    query: QueryBuilder<'a, Postgres>,
}

impl<'a> FilteredQuery<'a> {
    pub fn new(base_query: &str) -> Self {
        Self {
            query: QueryBuilder::new(base_query),
        }
    }

    /// Case-insensitive substring filter on the value as given; `None` and
    /// empty values add nothing.
    pub fn filter_contains(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.query.push(format!(" AND {column} ILIKE "));
            self.query.push_bind(format!("%{}%", escape_like(value)));
        }
        self
    }

    /// Add ORDER BY clause
    pub fn order_by(&mut self, column: &str, direction: &str) -> &mut Self {
        self.query.push(format!(" ORDER BY {column} {direction}"));
        self
    }

    /// Apply an explicit LIMIT/OFFSET window.
    pub fn window(&mut self, offset: i64, limit: i64) -> &mut Self {
        self.query.push(" LIMIT ");
        self.query.push_bind(limit.max(0));
        self.query.push(" OFFSET ");
        self.query.push_bind(offset.max(0));
        self
    }

    /// Build the final query as a typed query
    pub fn build_query_as<T>(&mut self) -> QueryAs<'_, Postgres, T, PgArguments>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
    {
        self.query.build_query_as()
    }

    /// SQL text built so far
    pub fn sql(&self) -> &str {
        self.query.sql()
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_contains_adds_ilike() {
        let mut query = FilteredQuery::new("SELECT * FROM claims WHERE 1=1");
        query.filter_contains("status", Some("denied"));
        assert_eq!(query.sql(), "SELECT * FROM claims WHERE 1=1 AND status ILIKE $1");
    }

    #[test]
    fn test_filter_contains_ignores_empty() {
        let mut query = FilteredQuery::new("SELECT * FROM claims WHERE 1=1");
        query
            .filter_contains("status", None)
            .filter_contains("insurer_name", Some(""));
        assert_eq!(query.sql(), "SELECT * FROM claims WHERE 1=1");
    }

    #[test]
    fn test_filter_contains_keeps_whitespace() {
        let mut query = FilteredQuery::new("SELECT * FROM claims WHERE 1=1");
        query.filter_contains("insurer_name", Some(" Aetna"));
        assert_eq!(
            query.sql(),
            "SELECT * FROM claims WHERE 1=1 AND insurer_name ILIKE $1"
        );
    }

    #[test]
    fn test_order_and_window() {
        let mut query = FilteredQuery::new("SELECT * FROM claims WHERE 1=1");
        query
            .filter_contains("status", Some("paid"))
            .filter_contains("insurer_name", Some("aetna"))
            .order_by("id", "ASC")
            .window(30, 30);
        assert_eq!(
            query.sql(),
            "SELECT * FROM claims WHERE 1=1 AND status ILIKE $1 AND insurer_name ILIKE $2 \
             ORDER BY id ASC LIMIT $3 OFFSET $4"
        );
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c\\d"), "c\\\\d");
        assert_eq!(escape_like("Blue Cross"), "Blue Cross");
    }
}
