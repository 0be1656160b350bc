//! Movie endpoint handlers.
//!
//! Each handler is a straight pipeline: validate (writes only), then one
//! critical section on the store, then the response. The store lock is never
//! held across an `.await`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::http::response::{ApiError, MOVIE_DELETED};
use crate::http::server::AppState;
use crate::movies::schema::BODY_PATH;
use crate::movies::{Movie, MovieId, ShapeError};
use crate::observability::metrics;

/// Query key for the genre filter on `GET /movies`.
pub const GENRE_PARAM: &str = "genre";

/// `GET /movies[?genre=...]`
///
/// Only the first `genre` value counts; repeats are ignored.
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Movie>> {
    let genre = params
        .iter()
        .find(|(key, _)| key == GENRE_PARAM)
        .map(|(_, value)| value.as_str())
        .filter(|g| !g.is_empty());

    let store = state.read_store();
    let movies = match genre {
        Some(genre) => store.list_by_genre(genre).into_iter().cloned().collect(),
        None => store.list_all().to_vec(),
    };
    Json(movies)
}

/// `GET /movies/{id}`
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    let movie = state.read_store().find_by_id(&id).cloned();
    movie.map(Json).ok_or(ApiError::NotFound)
}

/// `POST /movies`
pub async fn create_movie(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(candidate) = payload.map_err(|r| ApiError::InvalidMovie(malformed(r)))?;
    let draft = state
        .schema
        .validate_full(&candidate)
        .map_err(ApiError::InvalidMovie)?;

    let movie = draft.into_movie(MovieId::generate());
    let created = {
        let mut store = state.write_store();
        let created = store.append(movie)?.clone();
        metrics::record_store_size(store.len());
        created
    };

    tracing::info!(movie_id = %created.id, title = %created.title, "Movie created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `DELETE /movies/{id}`
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    {
        let mut store = state.write_store();
        if !store.remove_by_id(&id) {
            return Err(ApiError::NotFoundMessage(StatusCode::NOT_FOUND));
        }
        metrics::record_store_size(store.len());
    }

    tracing::info!(movie_id = %id, "Movie deleted");
    Ok(Json(json!({ "message": MOVIE_DELETED })))
}

/// `PATCH /movies/{id}`
///
/// A missing id is answered with 400, like a rejected payload.
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Movie>, ApiError> {
    let Json(candidate) = payload.map_err(|r| ApiError::InvalidPatch(malformed(r)))?;
    let patch = state
        .schema
        .validate_partial(&candidate)
        .map_err(ApiError::InvalidPatch)?;

    let updated = {
        let mut store = state.write_store();
        store
            .update_by_id(&id, patch)
            .cloned()
            .ok_or(ApiError::NotFoundMessage(StatusCode::BAD_REQUEST))?
    };

    tracing::info!(movie_id = %updated.id, "Movie updated");
    Ok(Json(updated))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

fn malformed(rejection: JsonRejection) -> ShapeError {
    ShapeError::single(BODY_PATH, rejection.body_text())
}
