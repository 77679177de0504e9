mod common;

use axum::{
    body::Body,
    http::{
        Method, StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
};
use common::{
    TestApp, assert_redirects_to_posts, assets_dir, body_bytes, body_text, request, set_cookie,
    with_cookie,
};

async fn toggle_theme(app: &TestApp, cookie: Option<&str>) -> String {
    let mut request = request(Method::GET, "/theme", None, Body::empty());
    if let Some(cookie) = cookie {
        request = with_cookie(request, cookie);
    }
    let response = app.send(request).await;
    assert_redirects_to_posts(&response);
    set_cookie(&response).unwrap().to_owned()
}

#[tokio::test]
async fn theme_toggle() {
    let app = TestApp::new();

    assert!(toggle_theme(&app, None).await.starts_with("currentTheme=light"));
    assert!(
        toggle_theme(&app, Some("currentTheme=light"))
            .await
            .starts_with("currentTheme=dark")
    );
    assert!(
        toggle_theme(&app, Some("currentTheme=dark"))
            .await
            .starts_with("currentTheme=light")
    );
    assert!(
        toggle_theme(&app, Some("currentTheme=sepia"))
            .await
            .starts_with("currentTheme=light")
    );
}

#[tokio::test]
async fn logout_is_unauthorized_notice() {
    let app = TestApp::new();

    let response = app.get("/logout", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let html = body_text(response).await;
    assert!(html.contains("ログアウトしました"));
    assert!(html.contains(r#"href="/posts""#));
}

#[tokio::test]
async fn favicon() {
    let app = TestApp::new();

    let response = app.get("/favicon.ico", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/vnd.microsoft.icon");
    assert_eq!(response.headers()[CACHE_CONTROL], "public, max-age=604800");

    let expected = std::fs::read(assets_dir().join("favicon.ico")).unwrap();
    assert_eq!(body_bytes(response).await, expected);
}

#[tokio::test]
async fn stylesheet_and_script() {
    let app = TestApp::new();

    let response = app.get("/style.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/css");
    let expected = std::fs::read(assets_dir().join("style.css")).unwrap();
    assert_eq!(body_bytes(response).await, expected);

    let response = app.get("/nn-chat.js", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/javascript");
    let expected = std::fs::read(assets_dir().join("nn-chat.js")).unwrap();
    assert_eq!(body_bytes(response).await, expected);
}

#[tokio::test]
async fn unknown_route_is_not_found_page() {
    let app = TestApp::new();

    let response = app.get("/no-such-page", Some("alice")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let html = body_text(response).await;
    assert!(html.contains("ページが見つかりません"));
    assert!(html.contains("/no-such-page"));
}
