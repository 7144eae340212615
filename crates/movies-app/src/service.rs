use std::{future::Future, sync::Arc};

use axum::extract::FromRequestParts;
use garde::Validate as _;
use movies_dal::{Movie, MovieRepository, MovieStore};
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid movie: {0}")]
    Validation(#[from] garde::Report),

    #[error("Repository error: {0}")]
    Repository(#[from] movies_dal::Error),
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

/// Business rules on top of movie repository: records are validated before
/// they are stored and updates are applied only to existing movies.
pub struct MovieService<R = MovieStore> {
    repository: Arc<R>,
}

impl<R> Clone for MovieService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<R: MovieRepository> MovieService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Movie>> {
        Ok(self.repository.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Movie>> {
        Ok(self.repository.get(id).await?)
    }

    /// Returns `false` when repository refused the movie (its id is already taken).
    pub async fn create(&self, movie: &Movie) -> Result<bool> {
        movie.validate()?;
        Ok(self.repository.create(movie).await?)
    }

    pub async fn update(&self, movie: Movie) -> Result<Option<Movie>> {
        movie.validate()?;
        if !self.repository.exists(movie.id).await? {
            debug!("Cannot update movie {}, it does not exist", movie.id);
            return Ok(None);
        }

        if self.repository.update(&movie).await? {
            Ok(Some(movie))
        } else {
            Ok(None)
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.repository.delete(id).await?)
    }
}

impl FromRequestParts<AppState> for MovieService {
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        _parts: &mut http::request::Parts,
        state: &AppState,
    ) -> impl Future<Output = std::result::Result<Self, Self::Rejection>> + Send {
        futures::future::ready(Ok(state.movies().clone()))
    }
}
