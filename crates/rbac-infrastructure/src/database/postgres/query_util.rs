//! Shared helpers for building filtered, ordered and paged queries

use rbac_core::error::DomainError;
use rbac_shared::{OrderField, PageResult, PaginationParam, QueryResult};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder};
use tracing::{error, warn};

/// Map a sqlx error to `DatabaseError`, logging it with `context`.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(format!("{}: {}", context, e))
    }
}

pub(crate) fn db_ids(ids: &[u64]) -> Vec<i64> {
    ids.iter().map(|id| *id as i64).collect()
}

/// Escape LIKE wildcards so `value` matches literally.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `ORDER BY` clause for `fields`. Keys without a column are skipped.
pub(crate) fn order_by(fields: &[OrderField], column: fn(&str) -> Option<&'static str>) -> String {
    let terms: Vec<String> = fields
        .iter()
        .filter_map(|field| match column(&field.key) {
            Some(col) => Some(format!("{} {}", col, field.direction.as_sql())),
            None => {
                warn!("Ignoring unknown order field: {}", field.key);
                None
            }
        })
        .collect();

    if terms.is_empty() {
        String::new()
    } else {
        format!(" ORDER BY {}", terms.join(", "))
    }
}

/// Run a filtered query the way `page` asks for.
///
/// `build` returns `SELECT <select> FROM ... WHERE ...` for the given select
/// list; it is called once for the count and once for the rows.
pub(crate) async fn fetch_page<Row, T, F>(
    conn: &mut PgConnection,
    page: &PaginationParam,
    columns: &str,
    order: &str,
    build: F,
    context: &'static str,
) -> Result<QueryResult<T>, DomainError>
where
    F: Fn(&str) -> QueryBuilder<'static, Postgres>,
    Row: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    T: From<Row>,
{
    let mut page_result = None;

    if page.only_count || page.pagination {
        let mut count = build("COUNT(*)");
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&mut *conn)
            .await
            .map_err(db_error(context))?;

        let result = PageResult {
            total: total as u64,
            current: page.current(),
            page_size: page.page_size(),
        };
        if page.only_count || total == 0 {
            return Ok(QueryResult { data: Vec::new(), page_result: Some(result) });
        }
        page_result = Some(result);
    }

    let mut rows = build(columns);
    rows.push(order);
    if page.pagination {
        rows.push(" LIMIT ")
            .push_bind(i64::from(page.page_size()))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
    }

    let data: Vec<Row> = rows
        .build_query_as()
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error(context))?;

    Ok(QueryResult {
        data: data.into_iter().map(T::from).collect(),
        page_result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbac_shared::OrderDirection;

    fn column(key: &str) -> Option<&'static str> {
        match key {
            "id" => Some("id"),
            "sequence" => Some("sequence"),
            _ => None,
        }
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("1/2"), "1/2");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_order_by_skips_unknown_keys() {
        let fields = vec![
            OrderField::new("sequence", OrderDirection::Desc),
            OrderField::new("name; DROP TABLE menus", OrderDirection::Asc),
            OrderField::new("id", OrderDirection::Asc),
        ];
        assert_eq!(order_by(&fields, column), " ORDER BY sequence DESC, id ASC");
        assert_eq!(order_by(&[], column), "");
    }
}
