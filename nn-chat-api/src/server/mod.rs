use crate::server::{auth::Credentials, templates::NotFoundTemplate};
use askama::Template;
use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{FormRejection, PathRejection},
    },
    http::{
        Method, StatusCode, Uri,
        header::{CONTENT_TYPE, WWW_AUTHENTICATE},
    },
    response::{Html, IntoResponse, Response},
};
use axum_extra::typed_header::TypedHeaderRejection;
use nn_chat_common::{
    model::{Id, post::PostMarker, user::UserName},
    time_display::DisplayZone,
    token::OneTimeTokenStore,
};
use nn_chat_db::{DbError, PostStore};
use std::{path::PathBuf, sync::Arc};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

pub mod auth;
mod client_info;
mod form;
mod routes;
mod templates;

pub type ServerRouter = Router<ServerState>;

pub const BAD_REQUEST_BODY: &str = "未対応のリクエストです。";
pub const AUTH_REALM: &str = r#"Basic realm="nn-chat", charset="UTF-8""#;

#[derive(Clone, FromRef)]
pub struct ServerState {
    pub posts: Arc<dyn PostStore>,
    pub tokens: Arc<OneTimeTokenStore>,
    pub credentials: Arc<Credentials>,
    pub settings: Arc<Settings>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Settings {
    /// May delete any post.
    pub admin: UserName,
    /// Holds the favicon, stylesheet and client script.
    pub assets_dir: PathBuf,
    pub display_zone: DisplayZone,
}

pub fn routes() -> ServerRouter {
    routes::routes()
        .method_not_allowed_fallback(unsupported_method)
        .fallback(fallback)
}

/// The complete application, ready to be served.
pub fn app(state: ServerState) -> Router {
    routes().layer(TraceLayer::new_for_http()).with_state(state)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub async fn unsupported_method(method: Method, uri: Uri) -> ServerError {
    ServerError::UnsupportedMethod(method, uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Method {0} is not supported for {1}")]
    UnsupportedMethod(Method, Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming form rejected: {0}")]
    FormRejection(#[from] FormRejection),
    #[error("Authorization header was missing or invalid: {0}")]
    InvalidAuthorizationHeader(TypedHeaderRejection),
    #[error("Provided credentials were invalid")]
    InvalidCredentials,
    #[error("The form did not contain a one-time token")]
    MissingOneTimeToken,
    #[error("One-time token of {0} did not match or was already used")]
    InvalidOneTimeToken(UserName),
    #[error("{user} may not delete post {post_id}")]
    NotPostAuthor {
        user: UserName,
        post_id: Id<PostMarker>,
    },
    #[error("Post with id {0} was not found.")]
    PostByIdNotFound(Id<PostMarker>),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Rendering template failed: {0}")]
    Template(#[from] askama::Error),
    #[error("Formatting a timestamp failed: {0}")]
    TimeFormat(#[from] time::error::Format),
    #[error("A timestamp fell outside the supported range: {0}")]
    TimeRange(#[from] time::error::ComponentRange),
    #[error("Reading asset {path:?} failed: {source}")]
    Asset {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::PostByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidAuthorizationHeader(_) | ServerError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ServerError::UnsupportedMethod(..)
            | ServerError::FormRejection(_)
            | ServerError::MissingOneTimeToken
            | ServerError::InvalidOneTimeToken(_)
            | ServerError::NotPostAuthor { .. } => StatusCode::BAD_REQUEST,
            ServerError::Database(_)
            | ServerError::Template(_)
            | ServerError::TimeFormat(_)
            | ServerError::TimeRange(_)
            | ServerError::Asset { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn not_found_resource(&self) -> String {
        match self {
            ServerError::UnknownRoute(uri) => uri.path().to_owned(),
            ServerError::PostByIdNotFound(id) => format!("投稿 #{id}"),
            _ => String::new(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, %status, "Replying with error");
        } else {
            warn!(error = %self, %status, "Replying with error");
        }

        match status {
            StatusCode::NOT_FOUND => {
                let template = NotFoundTemplate {
                    resource: &self.not_found_resource(),
                };
                match template.render() {
                    Ok(html) => (status, Html(html)).into_response(),
                    Err(err) => ServerError::Template(err).into_response(),
                }
            }
            StatusCode::UNAUTHORIZED => (
                status,
                [
                    (WWW_AUTHENTICATE, AUTH_REALM),
                    (CONTENT_TYPE, "text/plain; charset=utf-8"),
                ],
                "ログインが必要です。",
            )
                .into_response(),
            StatusCode::BAD_REQUEST => (
                status,
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                BAD_REQUEST_BODY,
            )
                .into_response(),
            _ => (
                status,
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                "サーバーエラーが発生しました。",
            )
                .into_response(),
        }
    }
}
