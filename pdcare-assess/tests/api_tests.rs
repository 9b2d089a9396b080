//! HTTP API integration tests: health, education, accounts, assessments
//! and reports

mod helpers;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use helpers::*;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _temp_dir) = test_app().await;

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "pdcare-assess");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_health_endpoint_ignores_bad_token() {
    let (app, _temp_dir) = test_app().await;

    let response = send(&app, get("/health", Some("garbage"))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_buildinfo() {
    let (app, _temp_dir) = test_app().await;

    let body = extract_json(send(&app, get("/api/buildinfo", None)).await).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

#[tokio::test]
async fn test_education_topics() {
    let (app, _temp_dir) = test_app().await;

    let body = extract_json(send(&app, get("/api/education", None)).await).await;
    let keys: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["overview", "symptoms", "stages", "treatment"]);

    let response = send(&app, get("/api/education/stages", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/api/education/cures", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anonymous_health_assessment() {
    let (app, _temp_dir) = test_app().await;

    let response = send(&app, post_json("/api/assessments/health", reference_form(), None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert!((body["score"].as_f64().unwrap() - 4.0).abs() < 1e-9);
    assert_eq!(body["severity"], "low");
    assert_eq!(body["severity_label"], "Low Risk");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 6);
    assert!(body["disclaimer"].as_str().unwrap().starts_with("Note:"));
    assert!(body.get("assessment_id").is_none());
    assert!(body.get("analysis").is_none());
}

#[tokio::test]
async fn test_health_assessment_accepts_json_numbers() {
    let (app, _temp_dir) = test_app().await;

    let form = json!({
        "age": 60,
        "heartRate": 80,
        "spO2": 95,
        "muscleStiffness": 0,
        "caloriesBurnt": 2000,
        "sleep": 6,
        "stepCount": 5000
    });

    let response = send(&app, post_json("/api/assessments/health", form, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert!((body["score"].as_f64().unwrap() - 4.0).abs() < 1e-9);
    assert_eq!(body["severity"], "low");
}

#[tokio::test]
async fn test_numeric_decimal_in_whole_field_is_rejected() {
    let (app, _temp_dir) = test_app().await;

    let mut form = reference_form();
    form["stepCount"] = json!(5000.5);

    let response = send(&app, post_json("/api/assessments/health", form, None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert!(body["error"]["message"].as_str().unwrap().contains("stepCount"));
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let (app, _temp_dir) = test_app().await;

    for uri in ["/api/assessments/health", "/api/auth/login", "/api/auth/register"] {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();

        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body = extract_json(response).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST", "{}", uri);
        assert!(body["error"]["message"].is_string());
    }
}

#[tokio::test]
async fn test_mistyped_json_field_uses_error_envelope() {
    let (app, _temp_dir) = test_app().await;

    let mut form = reference_form();
    form["age"] = json!(["60"]);

    let response = send(&app, post_json("/api/assessments/health", form, None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_health_assessment_rejects_bad_field() {
    let (app, _temp_dir) = test_app().await;

    let mut form = reference_form();
    form["heartRate"] = json!("fast");

    let response = send(&app, post_json("/api/assessments/health", form, None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert!(body["error"]["message"].as_str().unwrap().contains("heartRate"));
}

#[tokio::test]
async fn test_health_assessment_requires_every_field() {
    let (app, _temp_dir) = test_app().await;

    let response = send(
        &app,
        post_json("/api/assessments/health", json!({ "age": "60" }), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_returns_session() {
    let (app, _temp_dir) = test_app().await;

    let response = send(
        &app,
        post_json(
            "/api/auth/register",
            json!({ "username": "ada", "email": "ada@example.com", "password": "secret1" }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response).await;
    assert!(Uuid::parse_str(body["token"].as_str().unwrap()).is_ok());
    assert_eq!(body["user"]["username"], "ada");
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    let body = extract_json(send(&app, get("/api/auth/session", Some(token))).await).await;
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let (app, _temp_dir) = test_app().await;

    let cases = [
        (json!({ "username": "ada", "email": "ada@example.com" }), "All fields are required"),
        (
            json!({ "username": "ada", "email": "nope", "password": "secret1" }),
            "Invalid email format",
        ),
        (
            json!({ "username": "ada", "email": "ada@example.com", "password": "123" }),
            "Password must be at least 6 characters long",
        ),
    ];

    for (request, message) in cases {
        let response = send(&app, post_json("/api/auth/register", request, None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = extract_json(response).await;
        assert_eq!(body["error"]["message"], message);
    }
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let (app, _temp_dir) = test_app().await;
    register(&app, "ada", "ada@example.com").await;

    let response = send(
        &app,
        post_json(
            "/api/auth/register",
            json!({ "username": "ada2", "email": "ada@example.com", "password": "secret2" }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_errors() {
    let (app, _temp_dir) = test_app().await;
    register(&app, "ada", "ada@example.com").await;

    let response = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({ "email": "ada@example.com", "password": "wrong-one" }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = extract_json(response).await;
    assert_eq!(body["error"]["message"], "Invalid password");

    let response = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({ "email": "bob@example.com", "password": "secret1" }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, post_json("/api/auth/login", json!({}), None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_then_logout() {
    let (app, _temp_dir) = test_app().await;
    register(&app, "ada", "ada@example.com").await;

    let response = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({ "email": "ada@example.com", "password": "secret1" }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();

    let response = send(&app, post_json("/api/auth/logout", json!({}), Some(&token))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, get("/api/auth/session", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let (app, _temp_dir) = test_app().await;

    for uri in ["/api/auth/session", "/api/assessments"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let response = send(&app, post_json("/api/auth/logout", json!({}), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bad_tokens_rejected_everywhere_under_api() {
    let (app, _temp_dir) = test_app().await;
    let unknown = Uuid::new_v4().to_string();

    for token in ["not-a-uuid", unknown.as_str()] {
        let response = send(&app, get("/api/education", Some(token))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(
            &app,
            post_json("/api/assessments/health", reference_form(), Some(token)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_logged_in_assessment_history_and_report() {
    let (app, _temp_dir) = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let first = extract_json(
        send(&app, post_json("/api/assessments/health", reference_form(), Some(&token))).await,
    )
    .await;
    let first_id = first["assessment_id"].as_str().unwrap().to_string();

    let mut form = reference_form();
    form["spO2"] = json!("60");
    let second = extract_json(
        send(&app, post_json("/api/assessments/health", form, Some(&token))).await,
    )
    .await;
    assert_eq!(second["severity"], "moderate");
    let second_id = second["assessment_id"].as_str().unwrap().to_string();

    let history = extract_json(send(&app, get("/api/assessments", Some(&token))).await).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["id"], second_id.as_str());
    assert_eq!(history[1]["id"], first_id.as_str());
    assert_eq!(history[1]["kind"], "health");

    let response = send(
        &app,
        get(&format!("/api/assessments/{}/report", first_id), Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("PD-Assessment-PD"));

    let text = extract_text(response).await;
    assert!(text.contains("Assessment Type: Health Metrics"));
    assert!(text.contains("Risk Classification: Low Risk"));
    assert!(text.contains("Assessment Score:    4.00%"));
}

#[tokio::test]
async fn test_report_of_other_user_is_not_found() {
    let (app, _temp_dir) = test_app().await;
    let ada = register(&app, "ada", "ada@example.com").await;
    let bob = register(&app, "bob", "bob@example.com").await;

    let body = extract_json(
        send(&app, post_json("/api/assessments/health", reference_form(), Some(&ada))).await,
    )
    .await;
    let id = body["assessment_id"].as_str().unwrap();

    let response = send(&app, get(&format!("/api/assessments/{}/report", id), Some(&bob))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get("/api/assessments", Some(&bob))).await;
    assert_eq!(extract_json(response).await, json!([]));
}
