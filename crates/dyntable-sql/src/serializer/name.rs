use super::{Delimited, Ident, Params, ToSql};

use dyntable_core::stmt::Name;

impl ToSql for &Name {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, Delimited(self.parts().iter().map(Ident), "."));
    }
}
