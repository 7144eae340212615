use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json,
};
use http::{header, StatusCode};
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    rest_api::{
        contract::{CreateMovieRequest, MovieResponse, MoviesResponse, UpdateMovieRequest},
        MOVIES_PATH,
    },
    service::MovieService,
    state::AppState,
};

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(list_movies, get_movie, create_movie, update_movie, delete_movie))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::ResourceNotFound(format!("Movie {id}"))
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Movie", operation_id = "listMovies",
    responses((status = StatusCode::OK, description = "All movies", body = MoviesResponse))))]
pub async fn list_movies(service: MovieService) -> ApiResult<impl IntoResponse> {
    let movies = service.get_all().await?;
    Ok((StatusCode::OK, Json(movies.into_iter().collect::<MoviesResponse>())))
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}", tag = "Movie", operation_id = "getMovie",
    params(("id" = Uuid, Path, description = "Movie id")),
    responses((status = StatusCode::OK, description = "Get one movie", body = MovieResponse),
        (status = StatusCode::NOT_FOUND, description = "Movie does not exist"))))]
pub async fn get_movie(
    Path(id): Path<Uuid>,
    service: MovieService,
) -> ApiResult<impl IntoResponse> {
    let movie = service.get(id).await?.ok_or_else(|| not_found(id))?;

    Ok((StatusCode::OK, Json(MovieResponse::from(movie))))
}

#[cfg_attr(feature = "openapi",  utoipa::path(post, path = "", tag = "Movie", operation_id = "createMovie",
    request_body = CreateMovieRequest,
    responses((status = StatusCode::CREATED, description = "Created movie", body = MovieResponse),
        (status = StatusCode::BAD_REQUEST, description = "Movie was not created"),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid movie"))))]
pub async fn create_movie(
    service: MovieService,
    State(state): State<AppState>,
    Json(payload): Json<CreateMovieRequest>,
) -> ApiResult<impl IntoResponse> {
    let movie = payload.into_movie();
    if !service.create(&movie).await? {
        return Err(ApiError::InvalidRequest(format!(
            "Movie {} was not created",
            movie.id
        )));
    }
    debug!("Created movie {}", movie.id);

    let location = state.build_url(&format!(
        "{}/{}",
        MOVIES_PATH.trim_start_matches('/'),
        movie.id
    ))?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location.to_string())],
        Json(MovieResponse::from(movie)),
    ))
}

#[cfg_attr(feature = "openapi",  utoipa::path(put, path = "/{id}", tag = "Movie", operation_id = "updateMovie",
    params(("id" = Uuid, Path, description = "Movie id")),
    request_body = UpdateMovieRequest,
    responses((status = StatusCode::OK, description = "Updated movie", body = MovieResponse),
        (status = StatusCode::NOT_FOUND, description = "Movie does not exist"),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid movie"))))]
pub async fn update_movie(
    Path(id): Path<Uuid>,
    service: MovieService,
    Json(payload): Json<UpdateMovieRequest>,
) -> ApiResult<impl IntoResponse> {
    let movie = service
        .update(payload.into_movie(id))
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok((StatusCode::OK, Json(MovieResponse::from(movie))))
}

#[cfg_attr(feature = "openapi",  utoipa::path(delete, path = "/{id}", tag = "Movie", operation_id = "deleteMovie",
    params(("id" = Uuid, Path, description = "Movie id")),
    responses((status = StatusCode::NO_CONTENT, description = "Deleted successfully"),
        (status = StatusCode::NOT_FOUND, description = "Movie does not exist"))))]
pub async fn delete_movie(
    Path(id): Path<Uuid>,
    service: MovieService,
) -> ApiResult<impl IntoResponse> {
    if service.delete(id).await? {
        Ok((StatusCode::NO_CONTENT, ()))
    } else {
        Err(not_found(id))
    }
}

/// Movie routes, to be nested on [`MOVIES_PATH`]
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list_movies).post(create_movie))
        .route(
            "/{id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
}
