use crate::{cipher, Error, Result};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Postgresql,
    Mysql,
    Sqlite,
}

impl DbType {
    pub fn as_str(self) -> &'static str {
        match self {
            DbType::Postgresql => "postgresql",
            DbType::Mysql => "mysql",
            DbType::Sqlite => "sqlite",
        }
    }

    /// Port used when a data source does not name one.
    pub fn default_port(self) -> Option<u16> {
        match self {
            DbType::Postgresql => Some(5432),
            DbType::Mysql => Some(3306),
            DbType::Sqlite => None,
        }
    }
}

impl FromStr for DbType {
    type Err = Error;

    fn from_str(s: &str) -> Result<DbType> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(DbType::Postgresql),
            "mysql" => Ok(DbType::Mysql),
            "sqlite" => Ok(DbType::Sqlite),
            _ => Err(Error::validation(format!("unsupported database type `{s}`"))),
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored connection profile to an external database.
///
/// The password is only ever held encrypted; see
/// [`DataSource::decrypt_password`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(default)]
    pub id: i64,

    pub name: String,

    pub db_type: DbType,

    #[serde(default)]
    pub host: String,

    /// `0` means the dialect's default port.
    #[serde(default)]
    pub port: u16,

    /// Database name, or the file path for SQLite.
    pub database_name: String,

    #[serde(default)]
    pub username: String,

    /// Token produced by [`cipher::encrypt`].
    #[serde(default, skip_serializing)]
    pub encrypted_password: String,

    #[serde(default)]
    pub created_by: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl DataSource {
    pub fn new(
        name: impl Into<String>,
        db_type: DbType,
        database_name: impl Into<String>,
    ) -> DataSource {
        DataSource {
            id: 0,
            name: name.into(),
            db_type,
            host: String::new(),
            port: 0,
            database_name: database_name.into(),
            username: String::new(),
            encrypted_password: String::new(),
            created_by: 0,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn host(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Encrypts `password` with the process-wide key and stores the token.
    pub fn password(mut self, password: &str) -> Result<Self> {
        self.encrypted_password = cipher::encrypt(password)?;
        Ok(self)
    }

    /// Recovers the plaintext password with the process-wide key.
    ///
    /// Fails with an unavailable error while no key is installed. An empty
    /// stored token means the data source has no password.
    pub fn decrypt_password(&self) -> Result<String> {
        if !cipher::is_initialized() {
            return Err(Error::unavailable("encryption not initialized"));
        }

        if self.encrypted_password.is_empty() {
            return Ok(String::new());
        }

        cipher::decrypt(&self.encrypted_password)
            .map_err(|err| err.context(format!("password of data source `{}`", self.name)))
    }

    /// The port to connect to.
    pub fn effective_port(&self) -> Option<u16> {
        match self.port {
            0 => self.db_type.default_port(),
            port => Some(port),
        }
    }
}
