use serde_json::json;

use crate::common::{JWT_SECRET, TestApp, routes};
use cattery_server::utils::jwt;

#[tokio::test]
async fn public_endpoints_need_no_token() {
    let app = TestApp::spawn().await;

    for path in [routes::CATS, routes::ACHIEVEMENTS, routes::LOOKUPS, routes::PAST_LITTERS] {
        let res = app.get_without_token(path).await;
        assert_eq!(res.status, 200, "{path} failed: {}", res.text);
    }
}

#[tokio::test]
async fn admin_endpoints_require_a_token() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::ADMIN_CATS).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn tampered_token_is_invalid() {
    let app = TestApp::spawn().await;
    let forged = jwt::sign("another-secret", None, "service_role", chrono::Duration::hours(1))
        .unwrap();

    let res = app.get_with_token(routes::GALLERY, &forged).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn expired_token_is_invalid() {
    let app = TestApp::spawn().await;
    let expired = jwt::sign(JWT_SECRET, None, "service_role", chrono::Duration::hours(-2))
        .unwrap();

    let res = app.get_with_token(routes::ADMIN_CATS, &expired).await;

    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn non_admin_role_is_forbidden() {
    let app = TestApp::spawn().await;

    let res = app
        .post_with_token(
            routes::ADMIN_CATS,
            &json!({"name": "Luna", "gender": "female"}),
            &app.user_token(),
        )
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn admin_role_is_accepted() {
    let app = TestApp::spawn().await;

    let res = app
        .get_with_token(routes::ADMIN_CATS, &app.admin_token())
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!([]));
}
