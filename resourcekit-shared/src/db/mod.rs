/// Database layer for ResourceKit
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded schema migrations
///
/// The store that issues resource queries lives in `crate::store::postgres`.

pub mod migrations;
pub mod pool;
