#[derive(Debug)]
pub struct Capability {
    /// DDL statements participate in transactions and roll back with them.
    pub transactional_ddl: bool,

    /// `INSERT ... RETURNING` is supported. When false, the driver reports
    /// generated ids itself.
    pub returning: bool,

    /// `START TRANSACTION READ ONLY` (or equivalent) is enforced by the
    /// server.
    pub read_only_transactions: bool,
}

impl Capability {
    /// SQLite capabilities.
    ///
    /// SQLite has no read-only transaction mode; external SQLite databases
    /// are opened with a read-only connection instead.
    pub const SQLITE: Self = Self {
        transactional_ddl: true,
        returning: true,
        read_only_transactions: false,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        read_only_transactions: true,
        ..Self::SQLITE
    };

    /// MySQL capabilities
    ///
    /// DDL causes an implicit commit in MySQL.
    pub const MYSQL: Self = Self {
        transactional_ddl: false,
        returning: false,
        read_only_transactions: true,
    };
}
