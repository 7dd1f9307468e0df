use super::{statement::Bind, Comma, Delimited, Flavor, Formatter, Ident, Params, ToSql};

use dyntable_core::stmt::{self, BinaryOp, ExprFunc};

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use stmt::Expr::*;

        match self {
            And(operands) => {
                fmt!(f, Delimited(operands, " AND "));
            }
            BinaryOp(expr) => {
                let (lhs, rhs) = (&*expr.lhs, &*expr.rhs);
                fmt!(f, lhs " " expr.op " " rhs);
            }
            Column(name) => {
                fmt!(f, Ident(name));
            }
            Func(func) => {
                fmt!(f, func);
            }
            InList(expr) if expr.list.is_empty() => {
                // Nothing is in the empty set.
                fmt!(f, if expr.negate { "1 = 1" } else { "1 = 0" });
            }
            InList(expr) => {
                let op = if expr.negate { " NOT IN " } else { " IN " };
                fmt!(f, &*expr.expr op "(" Comma(expr.list.iter().map(Bind)) ")");
            }
            IsNull(expr) => {
                let op = if expr.negate {
                    " IS NOT NULL"
                } else {
                    " IS NULL"
                };
                fmt!(f, &*expr.expr op);
            }
            Like(expr) => {
                // PostgreSQL's LIKE is case-sensitive. MySQL's default
                // collations and SQLite's LIKE already ignore ASCII case.
                let op = match (f.serializer.flavor, expr.negate) {
                    (Flavor::Postgresql, false) => " ILIKE ",
                    (Flavor::Postgresql, true) => " NOT ILIKE ",
                    (_, false) => " LIKE ",
                    (_, true) => " NOT LIKE ",
                };
                // MySQL string literals treat backslash as an escape.
                let escape = if f.serializer.is_mysql() {
                    " ESCAPE '\\\\'"
                } else {
                    " ESCAPE '\\'"
                };
                let pattern = stmt::Value::String(expr.pattern.clone());
                fmt!(f, &*expr.expr op Bind(&pattern) escape);
            }
            Value(value) => {
                fmt!(f, Bind(value));
            }
        }
    }
}

impl ToSql for &Box<stmt::Expr> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        (**self).to_sql(f);
    }
}

impl ToSql for BinaryOp {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(
            f,
            match self {
                BinaryOp::Eq => "=",
                BinaryOp::Ne => "<>",
                BinaryOp::Gt => ">",
                BinaryOp::Ge => ">=",
                BinaryOp::Lt => "<",
                BinaryOp::Le => "<=",
            }
        );
    }
}

impl ToSql for &ExprFunc {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let (name, arg) = match self {
            ExprFunc::Count(None) => return fmt!(f, "COUNT(*)"),
            ExprFunc::Count(Some(arg)) => return fmt!(f, "COUNT(" arg ")"),
            ExprFunc::Sum(arg) => ("SUM(", arg),
            ExprFunc::Avg(arg) => ("AVG(", arg),
            ExprFunc::Min(arg) => ("MIN(", arg),
            ExprFunc::Max(arg) => ("MAX(", arg),
        };

        // Numeric aggregates come back as DECIMAL/NUMERIC otherwise, which
        // each driver decodes differently.
        let double = match f.serializer.flavor {
            Flavor::Postgresql => "DOUBLE PRECISION",
            Flavor::Mysql => "DOUBLE",
            Flavor::Sqlite => "REAL",
        };

        fmt!(f, "CAST(" name arg ") AS " double ")");
    }
}
