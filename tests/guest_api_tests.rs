
use invitation_backend::settings::AppConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn guestbook_entries_are_sanitized_and_listed() {
    let app = TestApp::spawn().await;
    let slug = app.create_client("sari-budi", None).await;

    let response = app
        .post(
            "/api/guestbook",
            &json!({ "clientSlug": slug, "name": "<b>Rina</b>", "message": "Selamat menempuh hidup baru!" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = app.get(&format!("/api/guestbook?clientSlug={slug}")).await.json().await.unwrap();
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "Rina");
}

#[actix_rt::test]
async fn guestbook_for_unknown_client_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/guestbook", &json!({ "clientSlug": "nobody", "name": "Rina", "message": "Halo" }))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn rsvp_listing_carries_a_summary() {
    let app = TestApp::spawn().await;
    let slug = app.create_client("sari-budi", None).await;

    for (name, attendance, guests) in [("Rina", "attending", 2), ("Eko", "not_attending", 1), ("Dewi", "attending", 3)] {
        let response = app
            .post(
                "/api/rsvp",
                &json!({ "clientSlug": slug, "name": name, "attendance": attendance, "guestCount": guests }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body: Value = app.get(&format!("/api/rsvp?clientSlug={slug}")).await.json().await.unwrap();

    assert_eq!(body["rsvps"].as_array().unwrap().len(), 3);
    assert_eq!(body["summary"]["totalResponses"], 3);
    assert_eq!(body["summary"]["attending"], 2);
    assert_eq!(body["summary"]["notAttending"], 1);
    assert_eq!(body["summary"]["expectedGuests"], 5);
}

#[actix_rt::test]
async fn submissions_over_the_limit_are_throttled() {
    let mut config = AppConfig::for_tests();
    config.submission_limit = 2;
    let app = TestApp::spawn_with(config).await;
    let slug = app.create_client("sari-budi", None).await;

    let entry = json!({ "clientSlug": slug, "name": "Rina", "message": "Selamat!" });
    assert_eq!(app.post("/api/guestbook", &entry).await.status(), StatusCode::CREATED);
    assert_eq!(app.post("/api/guestbook", &entry).await.status(), StatusCode::CREATED);

    let throttled = app.post("/api/guestbook", &entry).await;
    assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = throttled.json().await.unwrap();
    assert_eq!(body["error"], "rate_limited");
}

#[actix_rt::test]
async fn invitation_page_renders_content_and_hides_disabled_sections() {
    let app = TestApp::spawn().await;
    let slug = app.create_client("sari-budi", Some("sage_garden")).await;

    app.post(
        "/api/client-content",
        &json!({
            "clientSlug": slug,
            "contentType": "couple_info",
            "contentData": { "brideName": "Sari", "groomName": "Budi" }
        }),
    )
    .await;
    app.post(
        "/api/client-content",
        &json!({
            "clientSlug": slug,
            "contentType": "component_settings",
            "contentData": { "gift": false }
        }),
    )
    .await;

    let response = app.get(&format!("/api/invitation/{slug}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let page = &body["invitation"];

    assert_eq!(page["theme"]["colorThemeId"], "sage_garden");
    assert_eq!(page["theme"]["backgroundThemeId"], "floral");

    let sections: Vec<&str> = page["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["section"].as_str().unwrap())
        .collect();
    assert!(sections.contains(&"couple"));
    assert!(!sections.contains(&"gift"));

    let hero = page["sections"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["section"] == "hero")
        .unwrap();
    assert_eq!(hero["content"]["brideName"], "Sari");
    assert_eq!(hero["content"]["groomName"], "Budi");
}

#[actix_rt::test]
async fn invitation_for_unknown_slug_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/invitation/nobody").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invitation not found");
}

#[actix_rt::test]
async fn health_reports_memory_storage() {
    let app = TestApp::spawn().await;

    let body: Value = app.get("/health").await.json().await.unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}
