use super::Expr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for Direction {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Direction> {
        match s.to_ascii_lowercase().as_str() {
            "" | "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(crate::Error::validation(format!(
                "unknown sort order `{s}`; expected `asc` or `desc`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    /// The expression
    pub expr: Expr,

    /// Ascending or descending
    pub order: Direction,
}

impl OrderByExpr {
    pub fn new(expr: Expr, order: Direction) -> OrderByExpr {
        OrderByExpr { expr, order }
    }
}
