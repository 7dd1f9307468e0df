use super::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    /// Start a transaction. With `read_only`, drivers that support it ask the
    /// server to reject writes for the duration of the transaction.
    Start { read_only: bool },

    /// Commit a transaction
    Commit,

    /// Rollback a transaction
    Rollback,
}

impl Transaction {
    pub fn start() -> Self {
        Self::Start { read_only: false }
    }

    pub fn start_read_only() -> Self {
        Self::Start { read_only: true }
    }
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Self {
        Self::Transaction(value)
    }
}
