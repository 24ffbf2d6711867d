//! Integration tests for per-IP rate limiting.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p grow-smart-api)
//!
//! Run with: cargo test -p grow-smart-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;

use grow_smart_integration_tests::TestContext;

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_general_api_is_rate_limited() {
    let ctx = TestContext::new().await;

    // The relaxed limiter allows a burst of 50; a quick run past that
    // must start answering 429 for this client IP
    let mut saw_limit = false;
    for _ in 0..60 {
        let resp = ctx
            .client
            .get(format!("{}/api/schemes", ctx.api_url))
            .send()
            .await
            .expect("Failed to request schemes");
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            saw_limit = true;
            break;
        }
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert!(saw_limit, "no request was rate limited within the burst");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_auth_limiter_is_stricter() {
    let ctx = TestContext::new().await;

    // The auth limiter bursts at 5; the send endpoint must cut off well
    // before the general API would
    let mut saw_limit = false;
    for _ in 0..10 {
        let resp = ctx
            .client
            .post(format!("{}/api/auth/otp/send", ctx.api_url))
            .json(&json!({ "email": "not-an-email" }))
            .send()
            .await
            .expect("Failed to send OTP request");
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            saw_limit = true;
            break;
        }
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    assert!(saw_limit, "no auth request was rate limited within the burst");
}
