//! Integration tests for the movie endpoints.
//!
//! Requests are driven through the full router (middleware included) without
//! a network listener.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{
    delete, get, json_request, new_movie, send, test_app, DARK_KNIGHT_ID, MATRIX_ID, SHAWSHANK_ID,
};

fn ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_list_returns_seed_in_order() {
    let (app, _) = test_app();

    let res = send(&app, get("/movies")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.json()), [SHAWSHANK_ID, DARK_KNIGHT_ID, MATRIX_ID]);
}

#[tokio::test]
async fn test_list_filters_by_genre_ignoring_case() {
    let (app, _) = test_app();

    let upper = send(&app, get("/movies?genre=Action")).await.json();
    let lower = send(&app, get("/movies?genre=action")).await.json();
    assert_eq!(upper, lower);
    assert_eq!(ids(&upper), [DARK_KNIGHT_ID, MATRIX_ID]);

    let scifi = send(&app, get("/movies?genre=SCI-FI")).await.json();
    assert_eq!(ids(&scifi), [MATRIX_ID]);
}

#[tokio::test]
async fn test_list_unknown_genre_is_empty_array() {
    let (app, _) = test_app();

    let res = send(&app, get("/movies?genre=Western")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!([]));

    let all = send(&app, get("/movies?genre=")).await.json();
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_repeated_genre_uses_first_value() {
    let (app, _) = test_app();

    let res = send(&app, get("/movies?genre=drama&genre=action")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.json()), [SHAWSHANK_ID, DARK_KNIGHT_ID]);

    let res = send(&app, get("/movies?genre=sci-fi&genre=drama")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.json()), [MATRIX_ID]);
}

#[tokio::test]
async fn test_get_one() {
    let (app, _) = test_app();

    let res = send(&app, get(&format!("/movies/{}", DARK_KNIGHT_ID))).await;
    assert_eq!(res.status, StatusCode::OK);
    let movie = res.json();
    assert_eq!(movie["title"], "The Dark Knight");
    assert_eq!(movie["genre"], json!(["Action", "Crime", "Drama"]));
}

#[tokio::test]
async fn test_get_unknown_is_plain_text_404() {
    let (app, _) = test_app();

    let res = send(&app, get("/movies/unknown-id")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.text(), "Movie not found");
    assert!(res.header("content-type").unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn test_create_assigns_id_and_default_rate() {
    let (app, state) = test_app();

    let res = send(&app, json_request("POST", "/movies", &new_movie())).await;
    assert_eq!(res.status, StatusCode::CREATED);

    let created = res.json();
    let id = created["id"].as_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
    assert_eq!(created["rate"].as_f64(), Some(0.0));
    for field in ["title", "year", "director", "duration", "poster", "genre"] {
        assert_eq!(created[field], new_movie()[field], "{}", field);
    }

    let store = state.read_store();
    assert_eq!(store.len(), 4);
    assert_eq!(store.list_all().last().unwrap().id.as_str(), id);
}

#[tokio::test]
async fn test_create_ignores_client_id_and_extra_fields() {
    let (app, _) = test_app();
    let mut payload = new_movie();
    payload["id"] = json!(SHAWSHANK_ID);
    payload["studio"] = json!("Warner");

    let res = send(&app, json_request("POST", "/movies", &payload)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let created = res.json();
    assert_ne!(created["id"], SHAWSHANK_ID);
    assert!(created.get("studio").is_none());
}

#[tokio::test]
async fn test_create_rejects_out_of_range_year() {
    let (app, state) = test_app();
    let mut payload = new_movie();
    payload["year"] = json!(1800);

    let res = send(&app, json_request("POST", "/movies", &payload)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let body = res.json();
    let messages = body["error"]["year"].as_array().unwrap();
    assert!(messages[0].as_str().unwrap().contains("1800"));
    assert_eq!(body["error"].as_object().unwrap().len(), 1);
    assert_eq!(state.read_store().len(), 3);
}

#[tokio::test]
async fn test_create_reports_each_missing_field() {
    let (app, _) = test_app();

    let res = send(&app, json_request("POST", "/movies", &json!({ "title": "Only" }))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let errors = res.json()["error"].clone();
    for field in ["year", "director", "duration", "poster", "genre"] {
        assert_eq!(errors[field], json!(["Required"]), "{}", field);
    }
    assert!(errors.get("title").is_none());
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let (app, _) = test_app();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/movies")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"title\": "))
        .unwrap();

    let res = send(&app, request).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["error"]["body"].is_array());
}

#[tokio::test]
async fn test_create_accepts_whole_float_numbers() {
    let (app, _) = test_app();
    let mut payload = new_movie();
    payload["year"] = json!(2020.0);
    payload["duration"] = json!(90.0);

    let res = send(&app, json_request("POST", "/movies", &payload)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let created = res.json();
    assert_eq!(created["year"], json!(2020));
    assert_eq!(created["duration"], json!(90));
}

#[tokio::test]
async fn test_created_movie_is_found_by_genre() {
    let (app, _) = test_app();
    let created = send(&app, json_request("POST", "/movies", &new_movie())).await.json();

    let res = send(&app, get("/movies?genre=drama")).await;
    assert_eq!(res.status, StatusCode::OK);
    let list = res.json();
    assert!(list.as_array().unwrap().contains(&created));

    let fetched = send(&app, get(&format!("/movies/{}", created["id"].as_str().unwrap()))).await;
    assert_eq!(fetched.json(), created);
}

#[tokio::test]
async fn test_patch_changes_only_supplied_fields() {
    let (app, _) = test_app();
    let created = send(&app, json_request("POST", "/movies", &new_movie())).await.json();
    let id = created["id"].as_str().unwrap();

    let res = send(
        &app,
        json_request("PATCH", &format!("/movies/{}", id), &json!({ "title": "Bar" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    let mut expected = created.clone();
    expected["title"] = json!("Bar");
    assert_eq!(res.json(), expected);

    let fetched = send(&app, get(&format!("/movies/{}", id))).await;
    assert_eq!(fetched.json(), expected);
}

#[tokio::test]
async fn test_patch_cannot_change_id() {
    let (app, state) = test_app();
    let uri = format!("/movies/{}", MATRIX_ID);

    let res = send(&app, json_request("PATCH", &uri, &json!({ "id": "hijacked", "rate": 9.5 }))).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["id"], MATRIX_ID);
    assert_eq!(body["rate"].as_f64(), Some(9.5));
    assert!(state.read_store().find_by_id("hijacked").is_none());
}

#[tokio::test]
async fn test_patch_with_empty_body_is_noop() {
    let (app, _) = test_app();
    let uri = format!("/movies/{}", SHAWSHANK_ID);
    let before = send(&app, get(&uri)).await.json();

    let res = send(&app, json_request("PATCH", &uri, &json!({}))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), before);
}

#[tokio::test]
async fn test_patch_rejects_invalid_fields() {
    let (app, state) = test_app();
    let uri = format!("/movies/{}", SHAWSHANK_ID);

    let res = send(&app, json_request("PATCH", &uri, &json!({ "genre": [], "rate": 11 }))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json();
    assert!(body["message"]["genre"].is_array());
    assert!(body["message"]["rate"].is_array());

    let stored = state.read_store().find_by_id(SHAWSHANK_ID).cloned().unwrap();
    assert_eq!(stored.rate, 9.3);
}

#[tokio::test]
async fn test_patch_rejects_malformed_json() {
    let (app, state) = test_app();
    let uri = format!("/movies/{}", SHAWSHANK_ID);
    let request = axum::http::Request::builder()
        .method("PATCH")
        .uri(&uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"title\": "))
        .unwrap();

    let res = send(&app, request).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json();
    assert!(body["message"]["body"].is_array());
    assert!(body.get("error").is_none());

    let request = axum::http::Request::builder()
        .method("PATCH")
        .uri(&uri)
        .header("content-type", "text/plain")
        .body(axum::body::Body::from("{\"title\": \"Bar\"}"))
        .unwrap();
    let res = send(&app, request).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["message"]["body"].is_array());

    let stored = state.read_store().find_by_id(SHAWSHANK_ID).cloned().unwrap();
    assert_eq!(stored.title, "The Shawshank Redemption");
}

#[tokio::test]
async fn test_patch_unknown_id_is_400() {
    let (app, _) = test_app();

    let res = send(&app, json_request("PATCH", "/movies/unknown-id", &json!({ "title": "Bar" }))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json(), json!({ "message": "Movie not found" }));
}

#[tokio::test]
async fn test_delete_removes_exactly_one() {
    let (app, state) = test_app();
    let uri = format!("/movies/{}", DARK_KNIGHT_ID);

    let res = send(&app, delete(&uri)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json(), json!({ "message": "Movie deleted" }));
    assert_eq!(state.read_store().len(), 2);

    assert_eq!(send(&app, get(&uri)).await.status, StatusCode::NOT_FOUND);
    let remaining = send(&app, get("/movies")).await.json();
    assert_eq!(ids(&remaining), [SHAWSHANK_ID, MATRIX_ID]);
}

#[tokio::test]
async fn test_delete_unknown_is_404() {
    let (app, state) = test_app();

    let res = send(&app, delete("/movies/unknown-id")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json(), json!({ "message": "Movie not found" }));
    assert_eq!(state.read_store().len(), 3);
}

#[tokio::test]
async fn test_unmatched_route_is_html_404() {
    let (app, _) = test_app();

    let res = send(&app, get("/series")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.text(), "<h1>Not found</h1>");
    assert!(res.header("content-type").unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (app, _) = test_app();

    let res = send(&app, get("/movies")).await;
    let generated = res.header("x-request-id").unwrap();
    assert!(Uuid::parse_str(generated).is_ok());

    let request = axum::http::Request::builder()
        .uri("/movies")
        .header("x-request-id", "client-supplied")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = send(&app, request).await;
    assert_eq!(res.header("x-request-id"), Some("client-supplied"));
}
