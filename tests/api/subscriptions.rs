use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::{
    matchers::{any, body_json, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{TestApp, TEST_API_KEY, TEST_LIST_ID};

fn list_subscribe_path() -> String {
    format!("/api/v2/list/{TEST_LIST_ID}/subscribe")
}

#[tokio::test]
async fn subscribe_returns_200_when_list_api_accepts() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(list_subscribe_path()))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "subscribed": true })))
        .expect(1)
        .mount(&app.list_server)
        .await;

    let res = app.post_subscriptions_raw(r#"{"email":"a@b.com"}"#).await?;

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!(
        json!({ "success": true, "message": "Successfully subscribed to newsletter" }),
        res.json::<Value>().await?
    );

    Ok(())
}

#[tokio::test]
async fn subscribe_forwards_key_list_and_email() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(list_subscribe_path()))
        .and(method("POST"))
        .and(body_json(json!({
            "api_key": TEST_API_KEY,
            "profiles": [{ "email": "ursula@example.com" }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.list_server)
        .await;

    let res = app
        .post_subscriptions(&json!({ "email": "ursula@example.com", "name": "Ursula" }))
        .await?;

    assert_eq!(StatusCode::OK, res.status());

    Ok(())
}

#[tokio::test]
async fn truthy_non_string_emails_are_left_to_the_list_api() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(list_subscribe_path()))
        .and(body_json(json!({
            "api_key": TEST_API_KEY,
            "profiles": [{ "email": 5 }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.list_server)
        .await;
    Mock::given(path(list_subscribe_path()))
        .and(body_json(json!({
            "api_key": TEST_API_KEY,
            "profiles": [{ "email": true }]
        })))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid email"))
        .expect(1)
        .mount(&app.list_server)
        .await;

    let accepted = app.post_subscriptions_raw(r#"{"email":5}"#).await?;
    assert_eq!(StatusCode::OK, accepted.status());

    let rejected = app.post_subscriptions_raw(r#"{"email":true}"#).await?;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, rejected.status());
    assert_eq!(
        json!({ "success": false, "error": "Failed to subscribe to newsletter" }),
        rejected.json::<Value>().await?
    );

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_missing() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.list_server)
        .await;

    let cases = [
        ("{}", "Empty json"),
        ("", "Empty body"),
        (r#"{"email":null}"#, "Null email"),
        (r#"{"email":""}"#, "Empty email"),
        (r#"{"email":false}"#, "False email"),
        (r#"{"name":"John Doe"}"#, "Only a name"),
        ("[]", "Not an object"),
    ];

    for (body, description) in cases {
        let res = app.post_subscriptions_raw(body).await?;
        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "The API did not return a 400 BAD REQUEST, the payload was: {description}"
        );
        assert_eq!(
            json!({ "error": "Email is required" }),
            res.json::<Value>().await?,
            "Wrong body for: {description}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_400_when_body_is_not_json() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.list_server)
        .await;

    for body in ["not json", "{", r#"{"email":"a@b.com""#, "email=a@b.com"] {
        let res = app.post_subscriptions_raw(body).await?;
        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "payload: {body}");
        assert_eq!(
            json!({ "error": "Invalid JSON in request body" }),
            res.json::<Value>().await?
        );
    }

    // The content type is not what decides.
    let res = app
        .http_client
        .post(app.subscribe_url())
        .header("Content-Type", "text/plain")
        .body("not json")
        .send()
        .await?;
    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    Ok(())
}

#[tokio::test]
async fn subscribe_hides_upstream_error_detail() -> Result<()> {
    let app = TestApp::spawn().await?;
    let upstream_detail = "The API key specified is invalid";

    Mock::given(path(list_subscribe_path()))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "detail": upstream_detail })),
        )
        .expect(1)
        .mount(&app.list_server)
        .await;

    let res = app
        .post_subscriptions(&json!({ "email": "a@b.com" }))
        .await?;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    let body = res.text().await?;
    assert!(!body.contains(upstream_detail), "Upstream detail leaked: {body}");
    assert_eq!(
        json!({ "success": false, "error": "Failed to subscribe to newsletter" }),
        serde_json::from_str::<Value>(&body)?
    );

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_500_when_list_api_times_out() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .expect(1)
        .mount(&app.list_server)
        .await;

    let res = app
        .post_subscriptions(&json!({ "email": "a@b.com" }))
        .await?;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    let body = res.json::<Value>().await?;
    assert_eq!(Some(false), body["success"].as_bool());
    let error = body["error"].as_str().unwrap_or_default();
    assert!(!error.is_empty());
    assert!(!error.contains(TEST_LIST_ID), "Upstream url leaked: {error}");

    Ok(())
}

#[tokio::test]
async fn every_submission_reaches_the_list_api() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(list_subscribe_path()))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.list_server)
        .await;

    for _ in 0..2 {
        let res = app
            .post_subscriptions(&json!({ "email": "same@example.com" }))
            .await?;
        assert_eq!(StatusCode::OK, res.status());
    }

    Ok(())
}

#[tokio::test]
async fn other_methods_are_not_allowed() -> Result<()> {
    let app = TestApp::spawn().await?;

    for method in [
        reqwest::Method::GET,
        reqwest::Method::PUT,
        reqwest::Method::PATCH,
        reqwest::Method::DELETE,
    ] {
        let res = app
            .http_client
            .request(method.clone(), app.subscribe_url())
            .send()
            .await?;

        assert_eq!(StatusCode::METHOD_NOT_ALLOWED, res.status(), "method: {method}");
        assert!(
            res.headers().contains_key("x-request-id"),
            "Error responses keep the request id"
        );
        assert_eq!(
            json!({ "error": "Method not allowed" }),
            res.json::<Value>().await?
        );
    }

    Ok(())
}
