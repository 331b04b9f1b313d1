use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    Postgres,
};
use uuid::Uuid;

#[derive(Clone)]
pub enum SqlxBinds {
    Uuid(Uuid),
}

pub fn binds_query_as<'a, T: for<'r> sqlx::FromRow<'r, PgRow>>(
    stmt: &'a str,
    binds: Vec<SqlxBinds>,
) -> QueryAs<'a, Postgres, T, PgArguments> {
    let mut q: QueryAs<'_, Postgres, T, PgArguments> = sqlx::query_as(stmt);
    for bind in binds {
        q = match bind {
            SqlxBinds::Uuid(val) => q.bind(val),
        };
    }
    q
}

/// Builds a `SELECT *` statement. Filters are joined with `AND`.
pub fn query_builder(table_name: &str, wheres: &[String], order_by: &[String]) -> String {
    let mut stmt = format!("SELECT * FROM {}", table_name);

    if !wheres.is_empty() {
        stmt.push_str(" WHERE ");
        stmt.push_str(&wheres.join(" AND "));
    }

    if !order_by.is_empty() {
        stmt.push_str(" ORDER BY ");
        stmt.push_str(&order_by.join(", "));
    }
    stmt
}
