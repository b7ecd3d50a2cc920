/// Database layer
///
/// - [`pool`]: PostgreSQL connection pool with health checks
/// - [`migrations`]: embedded schema migrations
///
/// Row types and their queries live in [`crate::models`]; the rest of the
/// crate reaches them through [`crate::store::postgres::PgStore`].

pub mod migrations;
pub mod pool;
