use crate::Result;

use dyntable_core::{
    async_trait,
    driver::{Capability, Connection, Driver},
};
use url::Url;

/// A driver selected by the scheme of a connection URL.
///
/// Recognized schemes are `sqlite`, `postgresql` (or `postgres`) and `mysql`,
/// each behind the feature of the same name.
#[derive(Debug)]
pub struct Connect {
    driver: Box<dyn Driver>,
}

impl Connect {
    pub fn new(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|err| {
            dyntable_core::Error::invalid_connection_url(format!("{err}; url={url}"))
        })?;

        let driver = match parsed.scheme() {
            "mysql" => connect_mysql(url)?,
            "postgresql" | "postgres" => connect_postgresql(url)?,
            "sqlite" => connect_sqlite(url)?,
            scheme => {
                return Err(dyntable_core::Error::invalid_connection_url(format!(
                    "unsupported database; scheme={scheme}"
                )))
            }
        };

        Ok(Self { driver })
    }
}

#[async_trait]
impl Driver for Connect {
    fn capability(&self) -> &'static Capability {
        self.driver.capability()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        self.driver.connect().await
    }

    fn max_connections(&self) -> Option<usize> {
        self.driver.max_connections()
    }
}

#[cfg(feature = "mysql")]
fn connect_mysql(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(dyntable_driver_mysql::MySQL::new(url)?))
}

#[cfg(not(feature = "mysql"))]
fn connect_mysql(_url: &str) -> Result<Box<dyn Driver>> {
    Err(dyntable_core::Error::unsupported_feature(
        "`mysql` feature not enabled",
    ))
}

#[cfg(feature = "postgresql")]
fn connect_postgresql(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(dyntable_driver_postgresql::PostgreSQL::new(url)?))
}

#[cfg(not(feature = "postgresql"))]
fn connect_postgresql(_url: &str) -> Result<Box<dyn Driver>> {
    Err(dyntable_core::Error::unsupported_feature(
        "`postgresql` feature not enabled",
    ))
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(dyntable_driver_sqlite::Sqlite::new(url)?))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Box<dyn Driver>> {
    Err(dyntable_core::Error::unsupported_feature(
        "`sqlite` feature not enabled",
    ))
}
