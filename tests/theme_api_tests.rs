
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

fn leaf_ornament() -> Value {
    json!({
        "id": "leaf-left",
        "name": "Leaf",
        "image": "/ornaments/leaf.png",
        "section": "hero",
        "position": { "top": 5.0, "left": -10.0 },
        "style": { "width": 180, "opacity": 0.8, "zIndex": 6 }
    })
}

#[actix_rt::test]
async fn duplicate_theme_id_is_rejected_with_message() {
    let app = TestApp::spawn().await;

    let first = app.post("/api/custom-themes", &custom_theme_body("lavender")).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let body: Value = first.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["theme"]["themeId"], "lavender");

    let second = app.post("/api/custom-themes", &custom_theme_body("lavender")).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Theme ID already exists");
}

#[actix_rt::test]
async fn builtin_id_cannot_be_reused_for_custom_theme() {
    let app = TestApp::spawn().await;

    let response = app.post("/api/custom-themes", &custom_theme_body("original")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Theme ID already exists");
}

#[actix_rt::test]
async fn new_theme_shows_up_in_list_after_create() {
    let app = TestApp::spawn().await;

    let empty: Value = app.get("/api/custom-themes").await.json().await.unwrap();
    assert_eq!(empty["themes"], json!([]));

    app.post("/api/custom-themes", &custom_theme_body("lavender")).await;

    let listed: Value = app.get("/api/custom-themes").await.json().await.unwrap();
    assert_eq!(listed["themes"].as_array().unwrap().len(), 1);
    assert_eq!(listed["themes"][0]["themeId"], "lavender");
}

#[actix_rt::test]
async fn compose_of_builtins_takes_each_half_from_its_registry() {
    let app = TestApp::spawn().await;

    let builtin: Value = app.get("/api/themes/builtin").await.json().await.unwrap();
    let sage = builtin["colorThemes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == "sage_garden")
        .cloned()
        .unwrap();
    let floral = builtin["backgroundThemes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == "floral")
        .cloned()
        .unwrap();

    let composed: Value = app
        .get("/api/themes/compose?colorTheme=sage_garden&backgroundTheme=floral")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(composed["theme"]["colors"], sage["colors"]);
    assert_eq!(composed["theme"]["images"], floral["images"]);
    assert_eq!(composed["theme"]["fallback"], json!({ "color": false, "background": false }));
}

#[actix_rt::test]
async fn unknown_color_theme_falls_back_to_original() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/themes/compose?colorTheme=does_not_exist&backgroundTheme=floral").await;
    assert_eq!(response.status(), StatusCode::OK);

    let composed: Value = response.json().await.unwrap();
    assert_eq!(composed["theme"]["colorThemeId"], "original");
    assert_eq!(composed["theme"]["backgroundThemeId"], "floral");
    assert_eq!(composed["theme"]["fallback"]["color"], true);
    assert_eq!(composed["theme"]["fallback"]["background"], false);
}

#[actix_rt::test]
async fn compose_uses_custom_color_theme() {
    let app = TestApp::spawn().await;
    app.post("/api/custom-themes", &custom_theme_body("lavender")).await;

    let composed: Value = app
        .get("/api/themes/compose?colorTheme=lavender&backgroundTheme=original")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(composed["theme"]["colorThemeId"], "lavender");
    assert_eq!(composed["theme"]["colors"]["primary"], "#b497d6");
}

#[actix_rt::test]
async fn delete_without_confirmation_is_rejected() {
    let app = TestApp::spawn().await;
    app.post("/api/custom-themes", &custom_theme_body("lavender")).await;

    let response = app.delete("/api/custom-themes?themeId=lavender").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Deletion requires confirmation");

    let still_there = app.get("/api/custom-themes?themeId=lavender").await;
    assert_eq!(still_there.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn unreferenced_theme_can_be_deleted() {
    let app = TestApp::spawn().await;
    app.post("/api/custom-themes", &custom_theme_body("lavender")).await;

    let response = app.delete("/api/custom-themes?themeId=lavender&confirm=true").await;
    assert_eq!(response.status(), StatusCode::OK);

    let gone = app.get("/api/custom-themes?themeId=lavender").await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn theme_in_use_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    app.post("/api/custom-themes", &custom_theme_body("lavender")).await;
    app.post(
        "/api/create-client",
        &json!({ "slug": "sari-budi", "colorTheme": "lavender", "password": "rahasia" }),
    )
    .await;

    let response = app.delete("/api/custom-themes?themeId=lavender&confirm=true").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Theme is in use by 1 client(s)");
}

#[actix_rt::test]
async fn ornaments_can_be_added_and_removed_on_a_unified_theme() {
    let app = TestApp::spawn().await;

    let created = app
        .post(
            "/api/unified-themes",
            &json!({
                "id": "garden_party",
                "name": "Garden Party",
                "colors": custom_theme_body("x")["colors"],
            }),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let added = app.post("/api/unified-themes/garden_party/ornaments", &leaf_ornament()).await;
    assert_eq!(added.status(), StatusCode::CREATED);

    let duplicate = app.post("/api/unified-themes/garden_party/ornaments", &leaf_ornament()).await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let removed = app.delete("/api/unified-themes/garden_party/ornaments/leaf-left?confirm=true").await;
    assert_eq!(removed.status(), StatusCode::OK);

    let theme: Value = app
        .get("/api/unified-themes?id=garden_party&includeOrnaments=true")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(theme["theme"]["ornaments"], json!([]));
}

#[actix_rt::test]
async fn malformed_json_uses_the_error_envelope() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/custom-themes"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[actix_rt::test]
async fn in_use_check_only_looks_at_the_matching_client_column() {
    let app = TestApp::spawn().await;
    app.post("/api/custom-themes", &custom_theme_body("lavender")).await;
    let background = app
        .post("/api/custom-background-themes", &json!({ "id": "lavender", "name": "Lavender Fields" }))
        .await;
    assert_eq!(background.status(), StatusCode::CREATED);
    app.post(
        "/api/create-client",
        &json!({ "slug": "sari-budi", "colorTheme": "lavender", "password": "rahasia" }),
    )
    .await;

    let background_deleted = app.delete("/api/custom-background-themes?id=lavender&confirm=true").await;
    assert_eq!(background_deleted.status(), StatusCode::OK);

    let color_deleted = app.delete("/api/custom-themes?themeId=lavender&confirm=true").await;
    assert_eq!(color_deleted.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn background_sections_can_be_uploaded_one_at_a_time() {
    let app = TestApp::spawn().await;
    app.post(
        "/api/custom-background-themes",
        &json!({ "id": "batik", "name": "Batik", "backgrounds": { "hero": "/images/batik/hero.jpg" } }),
    )
    .await;

    let response = app
        .put(
            "/api/custom-background-themes/batik/sections/loveStory",
            &json!({ "image": "/images/batik/story.jpg" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = app.get("/api/custom-background-themes?id=batik").await.json().await.unwrap();
    assert_eq!(body["theme"]["backgrounds"]["hero"], "/images/batik/hero.jpg");
    assert_eq!(body["theme"]["backgrounds"]["loveStory"], "/images/batik/story.jpg");
}
