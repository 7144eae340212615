use std::future::Future;

use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Transaction;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::{ChosenDB, Error, Pool, error::Result};

/// Year of the oldest surviving motion picture
pub const FIRST_MOVIE_YEAR: i32 = 1888;

// Genres are aggregated with ASCII unit separator, so genre names can contain commas.
// Control characters are rejected in genre names, so the separator cannot appear in them.
const GENRE_SEPARATOR: char = '\u{1f}';

fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new("must not be blank"))
    } else {
        Ok(())
    }
}

fn no_control_chars(value: &str, _ctx: &()) -> garde::Result {
    if value.chars().any(char::is_control) {
        Err(garde::Error::new("must not contain control characters"))
    } else {
        Ok(())
    }
}

fn plausible_year(value: &i32, _ctx: &()) -> garde::Result {
    let current_year = OffsetDateTime::now_utc().year();
    if (FIRST_MOVIE_YEAR..=current_year).contains(value) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "must be between {FIRST_MOVIE_YEAR} and {current_year}"
        )))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Validate)]
pub struct Movie {
    #[garde(skip)]
    pub id: Uuid,
    #[garde(length(chars, min = 1, max = 255), custom(not_blank))]
    pub title: String,
    #[garde(custom(plausible_year))]
    pub year_of_release: i32,
    #[garde(inner(length(chars, min = 1, max = 100), custom(not_blank), custom(no_control_chars)))]
    pub genres: Vec<String>,
}

impl Movie {
    pub fn slug(&self) -> String {
        movies_types::slugify(&self.title, self.year_of_release)
    }
}

/// Storage of movies and their genres.
///
/// Returned futures are `Send`, so repositories can be used from axum handlers.
/// Write operations are atomic: movie row and its genres change together or not at all.
pub trait MovieRepository: Send + Sync {
    /// All movies in no particular order.
    fn list(&self) -> impl Future<Output = Result<Vec<Movie>>> + Send;

    fn get(&self, id: Uuid) -> impl Future<Output = Result<Option<Movie>>> + Send;

    /// Returns `false` if movie with same id already exists, nothing is stored then.
    fn create(&self, movie: &Movie) -> impl Future<Output = Result<bool>> + Send;

    /// Replaces title, year and whole genre list of existing movie.
    /// Returns `false` if there is no such movie.
    fn update(&self, movie: &Movie) -> impl Future<Output = Result<bool>> + Send;

    /// Returns `false` if there is no such movie.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool>> + Send;

    fn exists(&self, id: Uuid) -> impl Future<Output = Result<bool>> + Send;
}

#[derive(Debug, sqlx::FromRow)]
struct MovieRow {
    id: String,
    title: String,
    year_of_release: i64,
    #[sqlx(default)]
    genres: Option<String>,
}

impl TryFrom<MovieRow> for Movie {
    type Error = Error;

    fn try_from(row: MovieRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::InvalidRecord(format!("Invalid movie id {}: {e}", row.id)))?;
        let year_of_release = i32::try_from(row.year_of_release).map_err(|_| {
            Error::InvalidRecord(format!("Invalid year {} of movie {id}", row.year_of_release))
        })?;
        Ok(Movie {
            id,
            title: row.title,
            year_of_release,
            genres: row
                .genres
                .map(|s| {
                    s.split(GENRE_SEPARATOR)
                        .filter(|s| !s.is_empty())
                        .map(|s| s.to_string())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

pub struct SqlMovieRepository {
    pool: Pool,
}

impl SqlMovieRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn insert_genres(
        tx: &mut Transaction<'_, ChosenDB>,
        movie_id: &str,
        genres: &[String],
    ) -> Result<()> {
        for (position, name) in genres.iter().enumerate() {
            sqlx::query("INSERT INTO genres (movie_id, position, name) VALUES (?, ?, ?)")
                .bind(movie_id)
                .bind(position as i64)
                .bind(name)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

// An error returned with `?` drops the open transaction, which rolls it back.
impl MovieRepository for SqlMovieRepository {
    async fn list(&self) -> Result<Vec<Movie>> {
        const SQL: &str = r#"
        SELECT m.id, m.title, m.year_of_release,
        group_concat(g.name, char(31) ORDER BY g.position) AS genres
        FROM movies m
        LEFT JOIN genres g ON m.id = g.movie_id
        GROUP BY m.id, m.title, m.year_of_release;
        "#;
        let rows = sqlx::query_as::<_, MovieRow>(SQL)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Movie::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<Movie>> {
        let id = id.to_string();
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query_as::<_, MovieRow>(
            "SELECT id, title, year_of_release FROM movies WHERE id = ?",
        )
        .bind(&id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(row) = row else {
            debug!("Movie {id} not found");
            return Ok(None);
        };
        let mut movie = Movie::try_from(row)?;

        let genres: Vec<String> =
            sqlx::query_scalar("SELECT name FROM genres WHERE movie_id = ? ORDER BY position")
                .bind(&id)
                .fetch_all(&mut *conn)
                .await?;
        movie.genres.extend(genres);

        Ok(Some(movie))
    }

    async fn create(&self, movie: &Movie) -> Result<bool> {
        let id = movie.id.to_string();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO movies (id, title, year_of_release) VALUES (?, ?, ?) ON CONFLICT (id) DO NOTHING",
        )
        .bind(&id)
        .bind(&movie.title)
        .bind(movie.year_of_release)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            debug!("Movie {id} already exists");
            tx.rollback().await?;
            return Ok(false);
        }

        if !movie.genres.is_empty() {
            Self::insert_genres(&mut tx, &id, &movie.genres).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn update(&self, movie: &Movie) -> Result<bool> {
        let id = movie.id.to_string();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE movies SET title = ?, year_of_release = ? WHERE id = ?")
            .bind(&movie.title)
            .bind(movie.year_of_release)
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            debug!("Movie {id} not found for update");
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM genres WHERE movie_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;
        Self::insert_genres(&mut tx, &id, &movie.genres).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let id = id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM genres WHERE movie_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            debug!("Movie {id} not found for delete");
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}
