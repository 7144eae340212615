//! Wire representation of movies and its mapping to [`Movie`] records.

use movies_dal::Movie;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: String,
    pub year_of_release: i32,
    pub genres: Vec<String>,
}

impl CreateMovieRequest {
    /// New movie gets fresh random id
    pub fn into_movie(self) -> Movie {
        Movie {
            id: Uuid::new_v4(),
            title: self.title,
            year_of_release: self.year_of_release,
            genres: self.genres,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    pub title: String,
    pub year_of_release: i32,
    pub genres: Vec<String>,
}

impl UpdateMovieRequest {
    pub fn into_movie(self, id: Uuid) -> Movie {
        Movie {
            id,
            title: self.title,
            year_of_release: self.year_of_release,
            genres: self.genres,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub year_of_release: i32,
    pub genres: Vec<String>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        MovieResponse {
            slug: movie.slug(),
            id: movie.id,
            title: movie.title,
            year_of_release: movie.year_of_release,
            genres: movie.genres,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MoviesResponse {
    pub items: Vec<MovieResponse>,
}

impl FromIterator<Movie> for MoviesResponse {
    fn from_iter<T: IntoIterator<Item = Movie>>(iter: T) -> Self {
        MoviesResponse {
            items: iter.into_iter().map(MovieResponse::from).collect(),
        }
    }
}
