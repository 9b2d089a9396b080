//! Shared helpers for pdcare-assess integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pdcare_assess::{build_router, AppState};
use serde_json::{json, Value};
use std::io::Cursor;
use tempfile::TempDir;
use tower::ServiceExt;

/// Router over a fresh database in a temp dir
///
/// Keep the `TempDir` alive for the duration of the test.
pub async fn test_app() -> (Router, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pool = pdcare_common::db::init_database(&temp_dir.path().join("pdcare.db"))
        .await
        .expect("Failed to create test database");

    (build_router(AppState::new(pool, 24)), temp_dir)
}

/// Send one request through a clone of the router
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Extract JSON from response body
pub async fn extract_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub async fn extract_text(response: Response<Body>) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_audio(
    uri: &str,
    content_type: &str,
    bytes: Vec<u8>,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(bytes)).unwrap()
}

/// Register an account and return its session token
pub async fn register(app: &Router, username: &str, email: &str) -> String {
    let response = send(
        app,
        post_json(
            "/api/auth/register",
            json!({ "username": username, "email": email, "password": "secret1" }),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

/// The reference health form (scores exactly 4)
pub fn reference_form() -> Value {
    json!({
        "age": "60",
        "heartRate": "80",
        "spO2": "95",
        "muscleStiffness": "0",
        "caloriesBurnt": "2000",
        "sleep": "6",
        "stepCount": "5000"
    })
}

/// Mono 16-bit WAV of a sine tone, built in memory
pub fn sine_wav(frequency: f32, amplitude: f32, sample_rate: u32, seconds: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
        let total = (seconds * sample_rate as f32) as usize;
        for i in 0..total {
            let t = i as f32 / sample_rate as f32;
            let value = (t * frequency * 2.0 * std::f32::consts::PI).sin() * amplitude;
            writer.write_sample((value * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    buffer.into_inner()
}
