use movies_dal::{Movie, MovieRepository as _, SqlMovieRepository};
use sqlx::Executor;
use tracing_test::traced_test;
use uuid::Uuid;

const TEST_DATA: &str = r#"
INSERT INTO movies (id, title, year_of_release)
VALUES ('6f1c4f0e-0a63-4d58-9a8e-2f0c1e8f7a10', 'Alien', 1979);
INSERT INTO movies (id, title, year_of_release)
VALUES ('0b3e5d6a-1c2f-4e7d-8a9b-3c4d5e6f7a81', 'Metropolis', 1927);

INSERT INTO genres (movie_id, position, name)
VALUES ('6f1c4f0e-0a63-4d58-9a8e-2f0c1e8f7a10', 0, 'Horror');
INSERT INTO genres (movie_id, position, name)
VALUES ('6f1c4f0e-0a63-4d58-9a8e-2f0c1e8f7a10', 1, 'Sci-Fi');
"#;

const ALIEN_ID: &str = "6f1c4f0e-0a63-4d58-9a8e-2f0c1e8f7a10";
const METROPOLIS_ID: &str = "0b3e5d6a-1c2f-4e7d-8a9b-3c4d5e6f7a81";

async fn init_db() -> sqlx::Pool<sqlx::Sqlite> {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    movies_dal::migrate(&conn).await.unwrap();

    conn.execute(TEST_DATA).await.unwrap();

    conn
}

fn new_movie(title: &str, year: i32, genres: &[&str]) -> Movie {
    Movie {
        id: Uuid::new_v4(),
        title: title.to_string(),
        year_of_release: year,
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

async fn count_rows(conn: &sqlx::Pool<sqlx::Sqlite>, sql: &str, id: Uuid) -> i64 {
    sqlx::query_scalar(sql)
        .bind(id.to_string())
        .fetch_one(conn)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_list() {
    let conn = init_db().await;
    let repo = SqlMovieRepository::new(conn);

    let mut all = repo.list().await.unwrap();
    assert_eq!(all.len(), 2);
    all.sort_by(|a, b| a.title.cmp(&b.title));

    assert_eq!(all[0].title, "Alien");
    assert_eq!(all[0].year_of_release, 1979);
    assert_eq!(all[0].genres, vec!["Horror", "Sci-Fi"]);

    assert_eq!(all[1].id, Uuid::parse_str(METROPOLIS_ID).unwrap());
    assert!(all[1].genres.is_empty());
}

#[tokio::test]
async fn test_get() {
    let conn = init_db().await;
    let repo = SqlMovieRepository::new(conn);

    let alien = repo
        .get(Uuid::parse_str(ALIEN_ID).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alien.title, "Alien");
    assert_eq!(alien.genres, vec!["Horror", "Sci-Fi"]);

    let missing = repo.get(Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
#[traced_test]
async fn test_create() {
    let conn = init_db().await;
    let repo = SqlMovieRepository::new(conn.clone());

    let dune = new_movie("Dune", 2021, &["Sci-Fi", "Adventure"]);
    assert!(repo.create(&dune).await.unwrap());

    let stored = repo.get(dune.id).await.unwrap().unwrap();
    assert_eq!(stored, dune);
    assert!(repo.exists(dune.id).await.unwrap());

    let mut duplicate = new_movie("Dune: Part Two", 2024, &["Drama"]);
    duplicate.id = dune.id;
    assert!(!repo.create(&duplicate).await.unwrap());

    let movies = count_rows(&conn, "SELECT COUNT(*) FROM movies WHERE id = ?", dune.id).await;
    assert_eq!(movies, 1);
    let stored = repo.get(dune.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Dune");
    assert_eq!(stored.genres, vec!["Sci-Fi", "Adventure"]);
    assert!(logs_contain("already exists"));
}

#[tokio::test]
async fn test_create_without_genres() {
    let conn = init_db().await;
    let repo = SqlMovieRepository::new(conn);

    let movie = new_movie("Sunrise", 1927, &[]);
    assert!(repo.create(&movie).await.unwrap());
    let stored = repo.get(movie.id).await.unwrap().unwrap();
    assert!(stored.genres.is_empty());
    assert_eq!(repo.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_replaces_genres() {
    let conn = init_db().await;
    let repo = SqlMovieRepository::new(conn.clone());

    let mut movie = new_movie("Blade Runner", 1982, &["A", "B"]);
    repo.create(&movie).await.unwrap();

    movie.title = "Blade Runner (Final Cut)".to_string();
    movie.genres = vec!["C".to_string()];
    assert!(repo.update(&movie).await.unwrap());

    let stored = repo.get(movie.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Blade Runner (Final Cut)");
    assert_eq!(stored.genres, vec!["C"]);
    let genres = count_rows(&conn, "SELECT COUNT(*) FROM genres WHERE movie_id = ?", movie.id).await;
    assert_eq!(genres, 1);
}

#[tokio::test]
async fn test_update_missing() {
    let conn = init_db().await;
    let repo = SqlMovieRepository::new(conn.clone());

    let ghost = new_movie("Ghost", 1990, &["Romance"]);
    assert!(!repo.update(&ghost).await.unwrap());

    assert!(!repo.exists(ghost.id).await.unwrap());
    let genres = count_rows(&conn, "SELECT COUNT(*) FROM genres WHERE movie_id = ?", ghost.id).await;
    assert_eq!(genres, 0);
    assert_eq!(repo.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete() {
    let conn = init_db().await;
    let repo = SqlMovieRepository::new(conn.clone());
    let alien = Uuid::parse_str(ALIEN_ID).unwrap();

    assert!(repo.delete(alien).await.unwrap());
    assert!(repo.get(alien).await.unwrap().is_none());
    assert!(!repo.exists(alien).await.unwrap());
    let genres = count_rows(&conn, "SELECT COUNT(*) FROM genres WHERE movie_id = ?", alien).await;
    assert_eq!(genres, 0);

    assert!(!repo.delete(alien).await.unwrap());
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_keeps_genre_order() {
    let conn = init_db().await;
    let repo = SqlMovieRepository::new(conn.clone());

    let movie = new_movie("Stalker", 1979, &[]);
    repo.create(&movie).await.unwrap();
    for (position, name) in [(2, "Drama"), (0, "Sci-Fi"), (1, "Mystery")] {
        sqlx::query("INSERT INTO genres (movie_id, position, name) VALUES (?, ?, ?)")
            .bind(movie.id.to_string())
            .bind(position)
            .bind(name)
            .execute(&conn)
            .await
            .unwrap();
    }

    let all = repo.list().await.unwrap();
    let listed = all.iter().find(|m| m.id == movie.id).unwrap();
    assert_eq!(listed.genres, vec!["Sci-Fi", "Mystery", "Drama"]);
    let stored = repo.get(movie.id).await.unwrap().unwrap();
    assert_eq!(stored.genres, listed.genres);
}

#[tokio::test]
async fn test_failed_create_rolls_back() {
    let conn = init_db().await;
    let repo = SqlMovieRepository::new(conn.clone());
    conn.execute("DROP TABLE genres").await.unwrap();

    let movie = new_movie("Dune", 2021, &["Sci-Fi"]);
    assert!(repo.create(&movie).await.is_err());

    let movies = count_rows(&conn, "SELECT COUNT(*) FROM movies WHERE id = ?", movie.id).await;
    assert_eq!(movies, 0);
}

#[tokio::test]
async fn test_failed_update_rolls_back() {
    let conn = init_db().await;
    let repo = SqlMovieRepository::new(conn.clone());
    let alien = Uuid::parse_str(ALIEN_ID).unwrap();
    conn.execute("DROP TABLE genres").await.unwrap();

    let changed = Movie {
        id: alien,
        title: "Aliens".to_string(),
        year_of_release: 1986,
        genres: vec!["Action".to_string()],
    };
    assert!(repo.update(&changed).await.is_err());

    let (title, year): (String, i64) =
        sqlx::query_as("SELECT title, year_of_release FROM movies WHERE id = ?")
            .bind(ALIEN_ID)
            .fetch_one(&conn)
            .await
            .unwrap();
    assert_eq!(title, "Alien");
    assert_eq!(year, 1979);
}
