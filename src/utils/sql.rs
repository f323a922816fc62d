use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition};

pub const LIKE_ESCAPE: char = '\\';

/// 转义 LIKE 模式中的通配符
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// 在多列上做子串匹配（任一列命中即可）
pub fn search_condition<C: ColumnTrait>(columns: &[C], term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like_pattern(term));
    columns.iter().fold(Condition::any(), |cond, column| {
        cond.add(column.like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a_b"), "a\\_b");
        assert_eq!(escape_like_pattern("c:\\x"), "c:\\\\x");
        assert_eq!(escape_like_pattern("渋谷"), "渋谷");
    }
}
