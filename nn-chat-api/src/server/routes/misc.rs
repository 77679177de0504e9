use crate::server::{ServerError, ServerRouter, routes::POSTS_LOCATION};
use axum::{
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::{
    extract::{CookieJar, cookie::Cookie},
    routing::{RouterExt, TypedPath},
};
use nn_chat_common::theme::{THEME_COOKIE_NAME, Theme};
use serde::Deserialize;
use time::Duration;
use tracing::debug;

pub const THEME_COOKIE_MAX_AGE: Duration = Duration::days(30);

const LOGOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="ja">
  <head><meta charset="utf-8"><title>ログアウト</title></head>
  <body>
    <h1>ログアウトしました</h1>
    <a href="/posts">ログイン</a>
  </body>
</html>
"#;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(logout)
        .typed_get(change_theme)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/logout", rejection(ServerError))]
struct LogoutPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/theme", rejection(ServerError))]
struct ThemePath();

/// Reads the theme preference and stores it again with a fresh expiry.
pub fn persist_theme(jar: CookieJar) -> (CookieJar, Theme) {
    let theme = Theme::from_cookie(jar.get(THEME_COOKIE_NAME).map(Cookie::value));
    let cookie = Cookie::build((THEME_COOKIE_NAME, theme.as_str()))
        .path("/")
        .max_age(THEME_COOKIE_MAX_AGE);

    (jar.add(cookie), theme)
}

/// Answering 401 makes browsers forget the Basic credentials they sent.
async fn logout(LogoutPath(): LogoutPath) -> (StatusCode, Html<&'static str>) {
    (StatusCode::UNAUTHORIZED, Html(LOGOUT_HTML))
}

async fn change_theme(ThemePath(): ThemePath, jar: CookieJar) -> (CookieJar, Redirect) {
    let theme = Theme::toggled_from_cookie(jar.get(THEME_COOKIE_NAME).map(Cookie::value));
    debug!(%theme, "Theme changed");

    let cookie = Cookie::build((THEME_COOKIE_NAME, theme.as_str())).path("/");
    (jar.add(cookie), Redirect::to(POSTS_LOCATION))
}
