use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use crate::{
    error::Result,
    movie::{Movie, MovieRepository},
};

/// Non-persistent repository keeping movies in process memory.
///
/// Each operation takes the lock only for its own duration, so a sequence of
/// calls (like existence check followed by update) can interleave with other writers.
#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    movies: RwLock<Vec<Movie>>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MovieRepository for InMemoryMovieRepository {
    async fn list(&self) -> Result<Vec<Movie>> {
        let movies = self.movies.read().unwrap_or_else(PoisonError::into_inner);
        Ok(movies.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Movie>> {
        let movies = self.movies.read().unwrap_or_else(PoisonError::into_inner);
        Ok(movies.iter().find(|m| m.id == id).cloned())
    }

    async fn create(&self, movie: &Movie) -> Result<bool> {
        let mut movies = self.movies.write().unwrap_or_else(PoisonError::into_inner);
        if movies.iter().any(|m| m.id == movie.id) {
            return Ok(false);
        }
        movies.push(movie.clone());
        Ok(true)
    }

    async fn update(&self, movie: &Movie) -> Result<bool> {
        let mut movies = self.movies.write().unwrap_or_else(PoisonError::into_inner);
        match movies.iter_mut().find(|m| m.id == movie.id) {
            Some(existing) => {
                *existing = movie.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut movies = self.movies.write().unwrap_or_else(PoisonError::into_inner);
        let before = movies.len();
        movies.retain(|m| m.id != id);
        Ok(movies.len() < before)
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let movies = self.movies.read().unwrap_or_else(PoisonError::into_inner);
        Ok(movies.iter().any(|m| m.id == id))
    }
}
