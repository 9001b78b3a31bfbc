/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a startup probe
/// - `migrations`: embedded schema migrations
///
/// Table models live in [`crate::models`].

pub mod migrations;
pub mod pool;
