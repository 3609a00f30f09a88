pub mod auth;
pub mod clock;
pub mod compactor;
pub mod limits;
pub mod model;
pub mod observability;
pub mod schedule;
pub mod sql;
pub mod tls;
pub mod wal;
pub mod wire;
