use crate::server::{Result, ServerError, ServerRouter, Settings};
use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(favicon)
        .typed_get(stylesheet)
        .typed_get(client_script)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/favicon.ico", rejection(ServerError))]
struct FaviconPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/style.css", rejection(ServerError))]
struct StylesheetPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/nn-chat.js", rejection(ServerError))]
struct ClientScriptPath();

/// Read fresh on every request.
async fn read_asset(settings: &Settings, file_name: &str) -> Result<Vec<u8>> {
    let path = settings.assets_dir.join(file_name);
    tokio::fs::read(&path)
        .await
        .map_err(|source| ServerError::Asset { path, source })
}

async fn favicon(
    FaviconPath(): FaviconPath,
    State(settings): State<Arc<Settings>>,
) -> Result<impl IntoResponse> {
    let body = read_asset(&settings, "favicon.ico").await?;
    Ok((
        [
            (CONTENT_TYPE, "image/vnd.microsoft.icon"),
            (CACHE_CONTROL, "public, max-age=604800"),
        ],
        body,
    ))
}

async fn stylesheet(
    StylesheetPath(): StylesheetPath,
    State(settings): State<Arc<Settings>>,
) -> Result<impl IntoResponse> {
    let body = read_asset(&settings, "style.css").await?;
    Ok(([(CONTENT_TYPE, "text/css")], body))
}

async fn client_script(
    ClientScriptPath(): ClientScriptPath,
    State(settings): State<Arc<Settings>>,
) -> Result<impl IntoResponse> {
    let body = read_asset(&settings, "nn-chat.js").await?;
    Ok(([(CONTENT_TYPE, "text/javascript")], body))
}
