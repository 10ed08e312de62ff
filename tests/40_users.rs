mod common;

use anyhow::Result;
use common::{TestServer, ADMIN, ALICE, BOB};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn user_administration_is_admin_only() -> Result<()> {
    let server = TestServer::spawn().await?;
    let alice = server.token(ALICE).await?;

    let res = server.get("/api/users", &alice).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .post("/api/users", &alice)
        .json(&json!({ "login": "eve", "password": "pw" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.delete("/api/users/bob", &alice).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.post("/api/users/bob/reset-password", &alice).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .patch("/api/users/bob/role", &alice)
        .json(&json!({ "role": "ADMIN" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_lists_and_creates_accounts() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.token(ADMIN).await?;

    let page: Value = server.get("/api/users", &admin).send().await?.json().await?;
    assert_eq!(page["data"]["total_elements"], 3);
    let first = &page["data"]["content"][0];
    assert_eq!(first["login"], "admin");
    assert!(first.get("password_hash").is_none());

    let res = server
        .post("/api/users", &admin)
        .json(&json!({ "login": "carol", "password": "carol-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["login"], "carol");
    assert_eq!(body["data"]["role"], "USER");

    // The new account can log in
    server.token(("carol", "carol-password")).await?;

    let res = server
        .post("/api/users", &admin)
        .json(&json!({ "login": "carol", "password": "again" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = server
        .post("/api/users", &admin)
        .json(&json!({ "login": "dave", "password": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn admin_can_not_delete_or_re_role_themselves() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.token(ADMIN).await?;

    let res = server.delete("/api/users/admin", &admin).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .patch("/api/users/admin/role", &admin)
        .json(&json!({ "role": "USER" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Account is untouched
    let body: Value = server.get("/api/auth/whoami", &admin).send().await?.json().await?;
    assert_eq!(body["data"]["role"], "ADMIN");

    let res = server.delete("/api/users/nobody", &admin).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn reset_password_returns_a_fresh_password() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.token(ADMIN).await?;

    let first: Value = server
        .post("/api/users/bob/reset-password", &admin)
        .send()
        .await?
        .json()
        .await?;
    let first = first["data"]["password"].as_str().unwrap_or_default().to_string();
    assert_eq!(first.chars().count(), 16);

    let second: Value = server
        .post("/api/users/bob/reset-password", &admin)
        .send()
        .await?
        .json()
        .await?;
    let second = second["data"]["password"].as_str().unwrap_or_default().to_string();
    assert_ne!(first, second);

    // Only the latest password works
    let res = server.login_response(BOB.0, BOB.1).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let res = server.login_response(BOB.0, &first).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    server.token((BOB.0, second.as_str())).await?;

    let res = server.post("/api/users/nobody/reset-password", &admin).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn users_change_only_their_own_password() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.token(ADMIN).await?;
    let alice = server.token(ALICE).await?;

    // Not even an admin may set someone else's password
    let res = server
        .patch("/api/users/alice/password", &admin)
        .json(&json!({ "password": "chosen-by-admin" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .patch("/api/users/bob/password", &alice)
        .json(&json!({ "password": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .patch("/api/users/alice/password", &alice)
        .json(&json!({ "password": "  " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .patch("/api/users/alice/password", &alice)
        .json(&json!({ "password": "new-alice-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.login_response(ALICE.0, ALICE.1).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    server.token((ALICE.0, "new-alice-password")).await?;
    Ok(())
}

#[tokio::test]
async fn demoted_admins_lose_admin_access() -> Result<()> {
    let server = TestServer::spawn().await?;
    let admin = server.token(ADMIN).await?;

    let res = server
        .patch("/api/users/bob/role", &admin)
        .json(&json!({ "role": "ADMIN" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let bob = server.token(BOB).await?;
    let res = server.get("/api/users", &bob).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .patch("/api/users/bob/role", &admin)
        .json(&json!({ "role": "USER" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.get("/api/users", &bob).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
