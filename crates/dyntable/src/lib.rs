pub mod aggregate;
pub use aggregate::{Aggregation, ChartDataRequest, ChartDataResponse, Dataset, XAxis, YAxis};

pub mod cipher;
pub use cipher::Cipher;

pub mod clock;
pub use clock::{Clock, FixedClock, SystemClock};

pub mod config;
pub use config::Config;

pub mod db;

mod engine;
pub use engine::{Builder, Engine};

pub mod external;
pub use external::{Connector, DataSource, DbType, Mount};

pub mod query;
pub use query::{FilterItem, Operator, RecordQueryOptions};

pub mod record;
pub use record::{Pagination, Record, RecordListResponse, RecordResponse};

mod source;
pub use source::RecordSource;

mod table;

pub use dyntable_core::{
    schema::{AppField, ColumnInfo, FieldConstraints, FieldType, TableInfo},
    stmt::{Direction, Value},
    ConnectionFailure, Error, Resource, Result,
};
