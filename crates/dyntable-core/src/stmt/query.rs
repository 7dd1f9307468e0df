use super::{Expr, Name, OrderByExpr, Statement};

/// A single-table `SELECT`.
#[derive(Debug, Clone)]
pub struct Query {
    /// Source table
    pub from: Name,

    /// Projection, in output column order
    pub returning: Vec<Expr>,

    /// `WHERE` clause
    pub filter: Option<Expr>,

    /// `GROUP BY` expressions
    pub group_by: Vec<Expr>,

    /// `ORDER BY` expressions
    pub order_by: Vec<OrderByExpr>,

    /// `LIMIT` / `OFFSET`
    pub limit: Option<Limit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub limit: u64,
    pub offset: Option<u64>,
}

impl Query {
    pub fn new(from: Name, returning: Vec<Expr>) -> Query {
        Query {
            from,
            returning,
            filter: None,
            group_by: vec![],
            order_by: vec![],
            limit: None,
        }
    }

    /// `SELECT COUNT(*) FROM <from> [WHERE <filter>]`
    pub fn count(from: Name, filter: Option<Expr>) -> Query {
        Query {
            filter,
            ..Query::new(from, vec![Expr::count_star()])
        }
    }
}

impl From<Query> for Statement {
    fn from(value: Query) -> Self {
        Self::Query(value)
    }
}
