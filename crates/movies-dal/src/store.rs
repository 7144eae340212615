use uuid::Uuid;

use crate::{
    InMemoryMovieRepository, Pool, SqlMovieRepository,
    error::Result,
    movie::{Movie, MovieRepository},
};

/// Repository chosen at start up, either database backed or in-memory one.
pub enum MovieStore {
    Sql(SqlMovieRepository),
    Memory(InMemoryMovieRepository),
}

impl MovieStore {
    pub fn sql(pool: Pool) -> Self {
        MovieStore::Sql(SqlMovieRepository::new(pool))
    }

    pub fn memory() -> Self {
        MovieStore::Memory(InMemoryMovieRepository::new())
    }
}

impl MovieRepository for MovieStore {
    async fn list(&self) -> Result<Vec<Movie>> {
        match self {
            MovieStore::Sql(repo) => repo.list().await,
            MovieStore::Memory(repo) => repo.list().await,
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<Movie>> {
        match self {
            MovieStore::Sql(repo) => repo.get(id).await,
            MovieStore::Memory(repo) => repo.get(id).await,
        }
    }

    async fn create(&self, movie: &Movie) -> Result<bool> {
        match self {
            MovieStore::Sql(repo) => repo.create(movie).await,
            MovieStore::Memory(repo) => repo.create(movie).await,
        }
    }

    async fn update(&self, movie: &Movie) -> Result<bool> {
        match self {
            MovieStore::Sql(repo) => repo.update(movie).await,
            MovieStore::Memory(repo) => repo.update(movie).await,
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        match self {
            MovieStore::Sql(repo) => repo.delete(id).await,
            MovieStore::Memory(repo) => repo.delete(id).await,
        }
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        match self {
            MovieStore::Sql(repo) => repo.exists(id).await,
            MovieStore::Memory(repo) => repo.exists(id).await,
        }
    }
}
