
use invitation_backend::{autosave::SaveStatus, entities::content::ContentType};
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn taken_slug_gets_a_unique_variant() {
    let app = TestApp::spawn().await;

    let first: Value = app
        .post("/api/create-client", &json!({ "slug": "Sari & Budi" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(first["slug"], "sari-budi");
    assert_eq!(first["wasModified"], false);
    assert!(first["generatedPassword"].is_string());

    let second: Value = app
        .post("/api/create-client", &json!({ "slug": "sari-budi", "password": "rahasia" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(second["success"], true);
    assert_eq!(second["originalSlug"], "sari-budi");
    assert_eq!(second["slug"], "sari-budi-2");
    assert_eq!(second["wasModified"], true);
    assert!(second.get("generatedPassword").is_none());
}

#[actix_rt::test]
async fn client_listing_is_paginated() {
    let app = TestApp::spawn().await;
    for slug in ["ani-eko", "dewi-fajar", "rina-tono"] {
        app.create_client(slug, None).await;
    }

    let page: Value = app.get("/api/clients?page=1&perPage=2").await.json().await.unwrap();

    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["total"], 3);
    assert_eq!(page["totalPages"], 2);
}

#[actix_rt::test]
async fn client_theme_can_be_reassigned() {
    let app = TestApp::spawn().await;
    let slug = app.create_client("sari-budi", Some("original")).await;

    let response = app
        .put("/api/clients", &json!({ "slug": slug, "theme": "navy_gold" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = app.get(&format!("/api/clients?slug={slug}")).await.json().await.unwrap();
    assert_eq!(body["client"]["theme"], "navy_gold");
    assert!(body["client"].get("passwordHash").is_none());
}

#[actix_rt::test]
async fn patch_keeps_sibling_fields() {
    let app = TestApp::spawn().await;
    let slug = app.create_client("sari-budi", None).await;

    let created = app
        .post(
            "/api/client-content",
            &json!({
                "clientSlug": slug,
                "contentType": "couple_info",
                "contentData": { "brideName": "Sari", "groomName": "Budi" }
            }),
        )
        .await;
    assert_eq!(created.status(), StatusCode::OK);

    let patched = app
        .patch(
            "/api/client-content",
            &json!({
                "clientSlug": slug,
                "contentType": "couple_info",
                "contentData": { "groomName": "Budi Santoso" }
            }),
        )
        .await;
    assert_eq!(patched.status(), StatusCode::OK);

    let body: Value = app
        .get(&format!("/api/client-content?clientSlug={slug}&contentType=couple_info"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(
        body["content"]["contentData"],
        json!({ "brideName": "Sari", "groomName": "Budi Santoso" })
    );
}

#[actix_rt::test]
async fn content_with_unknown_keys_is_rejected() {
    let app = TestApp::spawn().await;
    let slug = app.create_client("sari-budi", None).await;

    let response = app
        .post(
            "/api/client-content",
            &json!({
                "clientSlug": slug,
                "contentType": "quote",
                "contentData": { "text": "Dan di antara tanda-tanda kebesaran-Nya", "color": "red" }
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn content_for_unknown_client_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/client-content",
            &json!({ "clientSlug": "nobody", "contentType": "quote", "contentData": { "text": "Hi" } }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn deleting_a_client_removes_its_content() {
    let app = TestApp::spawn().await;
    let slug = app.create_client("sari-budi", None).await;
    app.post(
        "/api/client-content",
        &json!({ "clientSlug": slug, "contentType": "quote", "contentData": { "text": "Hi" } }),
    )
    .await;

    let refused = app.delete(&format!("/api/clients?slug={slug}")).await;
    assert_eq!(refused.status(), StatusCode::BAD_REQUEST);

    let deleted = app.delete(&format!("/api/clients?slug={slug}&confirm=true")).await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let content = app.get(&format!("/api/client-content?clientSlug={slug}")).await;
    let body: Value = content.json().await.unwrap();
    assert_eq!(body["content"], json!([]));
}

#[actix_rt::test]
async fn two_editors_on_one_blob_keep_each_others_fields() {
    let app = TestApp::spawn().await;
    let slug = app.create_client("sari-budi", None).await;

    let bride = app
        .state
        .open_editor(&slug, ContentType::CoupleInfo, &["brideName"])
        .await
        .unwrap();
    let groom = app
        .state
        .open_editor(&slug, ContentType::CoupleInfo, &["groomName"])
        .await
        .unwrap();

    let mut bride_status = bride.subscribe();
    bride.edit("brideName", json!("Sari")).unwrap();
    bride.save_now();
    bride_status.wait_for(|s| *s == SaveStatus::Saved).await.unwrap();

    let mut groom_status = groom.subscribe();
    groom.edit("groomName", json!("Budi")).unwrap();
    groom.save_now();
    groom_status.wait_for(|s| *s == SaveStatus::Saved).await.unwrap();

    let body: Value = app
        .get(&format!("/api/client-content?clientSlug={slug}&contentType=couple_info"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["content"]["contentData"], json!({ "brideName": "Sari", "groomName": "Budi" }));
}
