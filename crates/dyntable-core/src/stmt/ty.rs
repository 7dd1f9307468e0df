/// Physical column storage type.
///
/// Each variant has exactly one rendering per SQL dialect; the serializer owns
/// that table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    BigInt,
    Numeric,
    VarChar(u64),
    Text,
    Date,
    Timestamp,
}
