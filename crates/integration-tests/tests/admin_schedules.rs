//! Admin mock schedule calendar and session notifications.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use clinica_integration_tests::{Browser, StubBackend, admin};

// =============================================================================
// Generation and filtering
// =============================================================================

#[tokio::test]
async fn test_generate_with_overrides_then_filter() {
    let stub = StubBackend::start().await;
    let mut browser = Browser::new(admin(&stub, false));

    let response = browser
        .post(
            "/schedules/generate",
            json!({"count": 3, "overrides": {"status": "completed", "priority": "high"}}),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.message(), "Generated 3 schedules");
    let generated = response.data().as_array().unwrap();
    assert_eq!(generated.len(), 3);
    assert!(generated.iter().all(|s| s["status"] == "completed"));
    assert!(generated.iter().all(|s| s["priority"] == "high"));

    browser
        .post(
            "/schedules/generate",
            json!({"count": 2, "overrides": {"status": "pending"}}),
        )
        .await;

    let completed = browser.get("/schedules?status=completed").await;
    assert_eq!(completed.data().as_array().unwrap().len(), 3);

    let all = browser.get("/schedules").await;
    let dates: Vec<&str> = all
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates.len(), 5);

    let stats = browser.get("/schedules/stats").await;
    assert_eq!(stats.data()["total"], 5);

    // Nothing here goes through the backend.
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_generate_count_bounds() {
    let stub = StubBackend::start().await;
    let mut browser = Browser::new(admin(&stub, false));

    let response = browser
        .post("/schedules/generate", json!({"count": 0}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = browser
        .post("/schedules/generate", json!({"count": 201}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = browser.post("/schedules/generate", json!({})).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data().as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_generate_rejects_invalid_overrides() {
    let stub = StubBackend::start().await;
    let mut browser = Browser::new(admin(&stub, false));

    let cases = [
        (json!({"duration_minutes": 0}), "duration must be between 5 and 720 minutes"),
        (json!({"title": "   "}), "title cannot be empty"),
        (
            json!({"recurrence": {"frequency": "daily", "interval": 0}}),
            "recurrence interval must be at least 1",
        ),
    ];
    for (overrides, message) in cases {
        let response = browser
            .post("/schedules/generate", json!({"overrides": overrides}))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.message(), message);
    }

    let stats = browser.get("/schedules/stats").await;
    assert_eq!(stats.data()["total"], 0);
}

#[tokio::test]
async fn test_schedule_book_has_a_capacity() {
    let stub = StubBackend::start().await;
    let mut browser = Browser::new(admin(&stub, false));

    for _ in 0..2 {
        let response = browser
            .post("/schedules/generate", json!({"count": 200}))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    // A batch that does not fit is rejected whole.
    let response = browser
        .post("/schedules/generate", json!({"count": 200}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "schedule book is full (500 schedules max)");

    let response = browser
        .post("/schedules/generate", json!({"count": 100}))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = browser
        .post(
            "/schedules",
            json!({"title": "Overflow", "date": Utc::now() + Duration::days(1)}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let stats = browser.get("/schedules/stats").await;
    assert_eq!(stats.data()["total"], 500);
}

#[tokio::test]
async fn test_inverted_date_range_is_rejected() {
    let stub = StubBackend::start().await;
    let mut browser = Browser::new(admin(&stub, false));

    let response = browser
        .get("/schedules?from=2026-06-10T00:00:00Z&to=2026-06-01T00:00:00Z")
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Editing
// =============================================================================

#[tokio::test]
async fn test_schedule_lifecycle_with_notifications() {
    let stub = StubBackend::start().await;
    let mut browser = Browser::new(admin(&stub, false));

    let response = browser
        .post(
            "/schedules",
            json!({
                "title": "Team standup",
                "date": Utc::now() + Duration::days(1),
                "duration_minutes": 15,
                "category": "consultation"
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["status"], "pending");
    let id = response.data()["id"].as_str().unwrap().to_string();

    let response = browser
        .patch(&format!("/schedules/{id}"), json!({"title": "Daily standup"}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["title"], "Daily standup");

    let response = browser
        .put(
            &format!("/schedules/{id}/status"),
            json!({"status": "cancelled"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Daily standup is now Cancelled");

    let notifications = browser.get("/notifications").await;
    assert_eq!(notifications.data()["unreadCount"], 1);
    let first = &notifications.data()["items"][0];
    assert_eq!(first["title"], "Schedule updated");
    assert_eq!(first["level"], "warning");
    let notification_id = first["id"].as_str().unwrap().to_string();

    let response = browser
        .post(&format!("/notifications/{notification_id}/read"), json!({}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let notifications = browser.get("/notifications").await;
    assert_eq!(notifications.data()["unreadCount"], 0);

    let response = browser.delete(&format!("/schedules/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    let response = browser.delete(&format!("/schedules/{id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_schedule_input() {
    let stub = StubBackend::start().await;
    let mut browser = Browser::new(admin(&stub, false));

    let response = browser
        .post(
            "/schedules",
            json!({"title": "   ", "date": Utc::now() + Duration::days(1)}),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "title cannot be empty");

    let response = browser
        .patch("/schedules/not-a-uuid", json!({"title": "x"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = browser
        .put(
            "/schedules/00000000-0000-0000-0000-000000000000/status",
            json!({"status": "completed"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_schedules_are_shared_but_notifications_are_per_session() {
    let stub = StubBackend::start().await;
    let app = admin(&stub, false);
    let mut first = Browser::new(app.clone());
    let mut second = Browser::new(app);

    let response = first
        .post("/schedules/generate", json!({"count": 1}))
        .await;
    let id = response.data()[0]["id"].as_str().unwrap().to_string();
    first
        .put(
            &format!("/schedules/{id}/status"),
            json!({"status": "in_progress"}),
        )
        .await;

    let seen = second.get("/schedules").await;
    assert_eq!(seen.data().as_array().unwrap().len(), 1);
    assert_eq!(seen.data()[0]["status"], "in_progress");

    let notifications = second.get("/notifications").await;
    assert_eq!(notifications.data()["unreadCount"], 0);

    let response = second.delete("/schedules").await;
    assert_eq!(response.data(), 1);
    let seen = first.get("/schedules").await;
    assert_eq!(seen.data(), &json!([]));
}

// =============================================================================
// Preferences
// =============================================================================

#[tokio::test]
async fn test_theme_preference() {
    let stub = StubBackend::start().await;
    let mut browser = Browser::new(admin(&stub, false));

    let response = browser.get("/preferences/theme").await;
    assert_eq!(response.data()["theme"], "system");

    let response = browser.post("/preferences/theme/toggle", json!({})).await;
    assert_eq!(response.data()["theme"], "dark");
    assert_eq!(response.message(), "Switched to dark theme");

    let response = browser
        .put("/preferences/theme", json!({"theme": "light"}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let response = browser.get("/preferences/theme").await;
    assert_eq!(response.data()["theme"], "light");

    let response = browser
        .put("/preferences/theme", json!({"theme": "sepia"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
