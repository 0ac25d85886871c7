//! Integration tests for the franchise endpoints.

use axum::http::StatusCode;
use serde_json::json;

use pronto_integration_tests::{ADMIN_EMAIL, TestApp};

#[tokio::test]
async fn test_list_franchises_is_public() {
    let app = TestApp::spawn();

    let (status, body) = app.request("GET", "/api/franchise", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["franchises"].is_array());
}

#[tokio::test]
async fn test_create_franchise_as_admin() {
    let app = TestApp::spawn();
    let (admin, token) = app.login_admin().await;

    let franchise = app.create_franchise(&token, "pizzaPocket", ADMIN_EMAIL).await;
    assert_eq!(franchise["name"], "pizzaPocket");
    assert!(franchise["id"].is_number());
    assert_eq!(franchise["admins"][0]["email"], ADMIN_EMAIL);
    assert_eq!(franchise["admins"][0]["id"], admin["id"]);
    assert_eq!(franchise["stores"], json!([]));

    let (_, listed) = app.request("GET", "/api/franchise", None, None).await;
    assert!(
        listed["franchises"]
            .as_array()
            .expect("franchises array")
            .iter()
            .any(|f| f["name"] == "pizzaPocket")
    );
}

#[tokio::test]
async fn test_create_franchise_as_non_admin_is_forbidden() {
    let app = TestApp::spawn();
    let (_, diner_token) = app.register("d1", "d1@test.com", "a").await;

    let (status, _) = app
        .request(
            "POST",
            "/api/franchise",
            Some(&diner_token),
            Some(json!({ "name": "hack", "admins": [{ "email": "d1@test.com" }] })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_franchise_unknown_admin_email_fails() {
    let app = TestApp::spawn();
    let (_, token) = app.login_admin().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/franchise",
            Some(&token),
            Some(json!({ "name": "ghost", "admins": [{ "email": "nobody@test.com" }] })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "unknown user for franchise admin nobody@test.com"
    );
}

#[tokio::test]
async fn test_create_franchise_requires_admins_list() {
    let app = TestApp::spawn();
    let (_, token) = app.login_admin().await;

    let (status, _) = app
        .request(
            "POST",
            "/api/franchise",
            Some(&token),
            Some(json!({ "name": "lonely", "admins": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user_franchises() {
    let app = TestApp::spawn();
    let (admin, token) = app.login_admin().await;
    app.create_franchise(&token, "mine", ADMIN_EMAIL).await;

    let (status, body) = app
        .request(
            "GET",
            &format!("/api/franchise/{}", admin["id"]),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let franchises = body.as_array().expect("array response");
    assert!(franchises.iter().any(|f| f["name"] == "mine"));
}

#[tokio::test]
async fn test_get_other_users_franchises_returns_empty() {
    let app = TestApp::spawn();
    let (admin, admin_token) = app.login_admin().await;
    app.create_franchise(&admin_token, "mine", ADMIN_EMAIL).await;

    let (_, diner_token) = app.register("d1", "d1@test.com", "a").await;

    // The diner asking for the admin's franchises gets an empty array, not an
    // error - whether those franchises exist is not leaked.
    let (status, body) = app
        .request(
            "GET",
            &format!("/api/franchise/{}", admin["id"]),
            Some(&diner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_delete_franchise_cascades() {
    let app = TestApp::spawn();
    let (_, token) = app.login_admin().await;

    let franchise = app.create_franchise(&token, "doomed", ADMIN_EMAIL).await;
    app.create_store(&token, &franchise["id"], "SLC").await;

    let (status, body) = app
        .request(
            "DELETE",
            &format!("/api/franchise/{}", franchise["id"]),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "franchise deleted");

    // Store operations against the deleted franchise now fail with 404.
    let (status, _) = app
        .request(
            "POST",
            &format!("/api/franchise/{}/store", franchise["id"]),
            Some(&token),
            Some(json!({ "name": "Provo" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = app.request("GET", "/api/franchise", None, None).await;
    assert!(
        !listed["franchises"]
            .as_array()
            .expect("franchises array")
            .iter()
            .any(|f| f["name"] == "doomed")
    );
}

#[tokio::test]
async fn test_create_store() {
    let app = TestApp::spawn();
    let (_, token) = app.login_admin().await;
    let franchise = app.create_franchise(&token, "stores", ADMIN_EMAIL).await;

    let store = app.create_store(&token, &franchise["id"], "SLC").await;
    assert_eq!(store["name"], "SLC");
    assert!(store["id"].is_number());
}

#[tokio::test]
async fn test_create_store_without_privilege_is_forbidden() {
    let app = TestApp::spawn();
    let (_, admin_token) = app.login_admin().await;
    let franchise = app.create_franchise(&admin_token, "noperm", ADMIN_EMAIL).await;

    let (_, diner_token) = app.register("d1", "d1@test.com", "a").await;
    let (status, _) = app
        .request(
            "POST",
            &format!("/api/franchise/{}/store", franchise["id"]),
            Some(&diner_token),
            Some(json!({ "name": "SLC" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_franchisee_can_manage_own_stores() {
    let app = TestApp::spawn();
    let (_, admin_token) = app.login_admin().await;

    // Creating the franchise grants the diner a franchisee role scoped to it.
    let (_, owner_token) = app.register("owner", "owner@test.com", "a").await;
    let franchise = app
        .create_franchise(&admin_token, "owned", "owner@test.com")
        .await;
    let owner_token = owner_token.as_str();

    // The pre-existing session picks up the new grant on its next verified
    // request; no re-login is needed.
    let (status, store) = app
        .request(
            "POST",
            &format!("/api/franchise/{}/store", franchise["id"]),
            Some(owner_token),
            Some(json!({ "name": "SLC" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/franchise/{}/store/{}", franchise["id"], store["id"]),
            Some(owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The grant does not extend to other franchises' stores.
    let other = app.create_franchise(&admin_token, "other", ADMIN_EMAIL).await;
    let (status, _) = app
        .request(
            "POST",
            &format!("/api/franchise/{}/store", other["id"]),
            Some(owner_token),
            Some(json!({ "name": "SLC" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_store() {
    let app = TestApp::spawn();
    let (_, token) = app.login_admin().await;
    let franchise = app.create_franchise(&token, "dstore", ADMIN_EMAIL).await;
    let store = app.create_store(&token, &franchise["id"], "SLC").await;

    let (status, body) = app
        .request(
            "DELETE",
            &format!("/api/franchise/{}/store/{}", franchise["id"], store["id"]),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "store deleted");
}

#[tokio::test]
async fn test_delete_store_without_privilege_is_forbidden() {
    let app = TestApp::spawn();
    let (_, admin_token) = app.login_admin().await;
    let franchise = app.create_franchise(&admin_token, "nodel", ADMIN_EMAIL).await;
    let store = app.create_store(&admin_token, &franchise["id"], "SLC").await;

    let (_, diner_token) = app.register("d1", "d1@test.com", "a").await;
    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/franchise/{}/store/{}", franchise["id"], store["id"]),
            Some(&diner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
