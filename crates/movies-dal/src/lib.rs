pub mod error;
pub mod memory;
pub mod movie;
pub mod store;

use std::str::FromStr as _;

pub use error::Error;
pub use memory::InMemoryMovieRepository;
pub use movie::{Movie, MovieRepository, SqlMovieRepository};
pub use store::MovieStore;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;

/// Opens connection pool for given database URL, database file is created if missing.
///
/// Repositories take one connection from the pool per operation and
/// return it when the operation is finished.
pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(50)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
