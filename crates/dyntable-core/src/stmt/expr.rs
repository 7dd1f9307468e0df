use super::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of expressions
    And(Vec<Expr>),

    /// Binary comparison
    BinaryOp(ExprBinaryOp),

    /// Reference to a column of the statement's table
    Column(String),

    /// Aggregate function call
    Func(ExprFunc),

    /// `expr [NOT] IN (values...)`
    InList(ExprInList),

    /// `expr IS [NOT] NULL`
    IsNull(ExprIsNull),

    /// Pattern match ignoring ASCII case
    Like(ExprLike),

    /// A bound parameter
    Value(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinaryOp {
    pub lhs: Box<Expr>,
    pub op: BinaryOp,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub expr: Box<Expr>,
    pub list: Vec<Value>,
    pub negate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprIsNull {
    pub expr: Box<Expr>,
    pub negate: bool,
}

/// `expr [NOT] LIKE pattern ESCAPE '\'`.
///
/// `pattern` is a complete LIKE pattern; wildcards in user input must already
/// be escaped with a backslash.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprLike {
    pub expr: Box<Expr>,
    pub pattern: String,
    pub negate: bool,
}

/// Aggregate functions. Results of `Sum`, `Avg`, `Min` and `Max` are cast to
/// double precision by the serializer so every dialect returns a float.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprFunc {
    /// `COUNT(*)` when `None`, `COUNT(expr)` otherwise
    Count(Option<Box<Expr>>),
    Sum(Box<Expr>),
    Avg(Box<Expr>),
    Min(Box<Expr>),
    Max(Box<Expr>),
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Expr {
        Expr::Column(name.into())
    }

    pub fn value(value: impl Into<Value>) -> Expr {
        Expr::Value(value.into())
    }

    pub fn binary_op(lhs: impl Into<Expr>, op: BinaryOp, rhs: impl Into<Expr>) -> Expr {
        Expr::BinaryOp(ExprBinaryOp {
            lhs: Box::new(lhs.into()),
            op,
            rhs: Box::new(rhs.into()),
        })
    }

    pub fn eq(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Expr {
        Expr::binary_op(lhs, BinaryOp::Eq, rhs)
    }

    pub fn in_list(expr: impl Into<Expr>, list: Vec<Value>) -> Expr {
        Expr::InList(ExprInList {
            expr: Box::new(expr.into()),
            list,
            negate: false,
        })
    }

    pub fn is_null(expr: impl Into<Expr>, negate: bool) -> Expr {
        Expr::IsNull(ExprIsNull {
            expr: Box::new(expr.into()),
            negate,
        })
    }

    pub fn count_star() -> Expr {
        Expr::Func(ExprFunc::Count(None))
    }

    /// Combines expressions with AND. Returns `None` for an empty input and
    /// the expression itself for a single one.
    pub fn and_all(mut operands: Vec<Expr>) -> Option<Expr> {
        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(Expr::And(operands)),
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}
