pub mod companies;
pub mod interviews;
pub mod jobs;
pub mod reviews;
pub mod sources;
pub mod users;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait, IntoColumnRef, LikeExpr};
use sea_orm::{ColumnTrait, Condition, Database, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Escape character used in substring patterns.
const LIKE_ESCAPE: char = '\\';

/// Open a SeaORM connection pool.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Rows strictly after `(created_at, id)` in `created_at DESC, id DESC` order.
pub(crate) fn keyset_after<C: ColumnTrait>(
    created_at_col: C,
    id_col: C,
    created_at: DateTime<Utc>,
    id: Uuid,
) -> Condition {
    Condition::any()
        .add(created_at_col.lt(created_at))
        .add(
            Condition::all()
                .add(created_at_col.eq(created_at))
                .add(id_col.lt(id)),
        )
}

/// `%needle%` with the pattern metacharacters of `needle` escaped.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `col` contains `needle` as a literal substring.
pub(crate) fn contains_literal<C: IntoColumnRef>(col: C, needle: &str) -> Condition {
    Condition::all().add(
        Expr::col(col).like(LikeExpr::new(like_pattern(needle)).escape(LIKE_ESCAPE)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%_off"), r"%100\%\_off%");
        assert_eq!(like_pattern(r"C:\dev"), r"%C:\\dev%");
    }
}
