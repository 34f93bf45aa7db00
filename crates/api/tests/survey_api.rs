//! HTTP-level integration tests for the `/surveys` resource.

mod common;

use aquasurveyor_db::repositories::SurveyRepo;
use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

fn survey_body(lng: f64, lat: f64, ph: f64) -> serde_json::Value {
    serde_json::json!({
        "location": { "type": "Point", "coordinates": [lng, lat] },
        "water_level": 3.0,
        "ph": ph,
        "temperature": 16.5,
        "dissolved_oxygen": 8.2,
        "conductivity": 420.0,
        "turbidity": 1.5,
        "notes": "  upstream of the weir  ",
    })
}

/// Create a survey through the API and return its id.
async fn create_survey(pool: &PgPool, token: &str, lng: f64, lat: f64) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/surveys", survey_body(lng, lat, 7.0), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_survey_sets_owner(pool: PgPool) {
    let (user, token) = common::create_user(&pool, "owner@example.com", None).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/surveys", survey_body(-1.5, 53.4, 7.0), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["created_by"], user.id);
    assert_eq!(json["data"]["location"]["type"], "Point");
    assert_eq!(json["data"]["location"]["coordinates"][0], -1.5);
    assert_eq!(json["data"]["notes"], "upstream of the weir");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_survey_rejects_out_of_range_values(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "bad@example.com", None).await;
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app, "/api/v1/surveys", survey_body(200.0, 10.0, 15.0), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("location:"));
    assert!(message.contains("ph: pH must be between 0 and 14"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_survey_includes_creator(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "reader@example.com", None).await;
    let id = create_survey(&pool, &token, 0.0, 0.0).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, &format!("/api/v1/surveys/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["creator"]["email"], "reader@example.com");
    assert_eq!(json["data"]["creator"]["name"], "Test Surveyor");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_missing_survey_returns_404(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "missing@example.com", None).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/surveys/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_surveys_newest_first(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "lister@example.com", None).await;
    let first = create_survey(&pool, &token, 1.0, 1.0).await;
    let second = create_survey(&pool, &token, 2.0, 2.0).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/surveys", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_owner_can_update_survey(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "editor@example.com", None).await;
    let id = create_survey(&pool, &token, 0.0, 0.0).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/api/v1/surveys/{id}"),
        serde_json::json!({ "ph": 6.1 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["ph"], 6.1);
    assert_eq!(json["data"]["water_level"], 3.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_owner_update_is_forbidden_and_row_unchanged(pool: PgPool) {
    let (_, owner_token) = common::create_user(&pool, "first@example.com", None).await;
    let (_, other_token) = common::create_user(&pool, "second@example.com", None).await;
    let id = create_survey(&pool, &owner_token, 0.0, 0.0).await;
    let app = common::build_test_app(pool.clone());

    let response = put_json_auth(
        app,
        &format!("/api/v1/surveys/{id}"),
        serde_json::json!({ "ph": 3.0 }),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let survey = SurveyRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(survey.ph, 7.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_owner_delete_is_forbidden(pool: PgPool) {
    let (_, owner_token) = common::create_user(&pool, "keeper@example.com", None).await;
    let (_, other_token) = common::create_user(&pool, "intruder@example.com", None).await;
    let id = create_survey(&pool, &owner_token, 0.0, 0.0).await;
    let app = common::build_test_app(pool.clone());

    let response = delete_auth(app, &format!("/api/v1/surveys/{id}"), &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(SurveyRepo::find_by_id(&pool, id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_owner_can_delete_survey(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "deleter@example.com", None).await;
    let id = create_survey(&pool, &token, 0.0, 0.0).await;
    let app = common::build_test_app(pool.clone());

    let response = delete_auth(app, &format!("/api/v1/surveys/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Survey deleted");

    assert!(SurveyRepo::find_by_id(&pool, id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Proximity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_location_search_uses_kilometres_and_orders_nearest_first(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "geo@example.com", None).await;
    let farther = create_survey(&pool, &token, 0.0, 0.05).await; // ~5.6 km
    let nearer = create_survey(&pool, &token, 0.0, 0.01).await; // ~1.1 km
    create_survey(&pool, &token, 20.0, 20.0).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/surveys/location/0/0/10", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![nearer, farther]);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/surveys/location/0/0/2", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_location_search_rejects_bad_coordinates(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "badgeo@example.com", None).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/surveys/location/95/0/10", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_numeric_path_segments_return_json_400(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "badpath@example.com", None).await;

    for uri in [
        "/api/v1/surveys/abc",
        "/api/v1/surveys/location/north/0/10",
    ] {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, uri, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST", "{uri}");
    }
}
