#![allow(dead_code)]

use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{
        Method, Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use headers::{Authorization, HeaderMapExt};
use nn_chat_api::server::{
    self, ServerState, Settings,
    auth::{Credentials, hash_password},
};
use nn_chat_common::{
    model::{
        Id,
        post::{CreatePost, Post, PostMarker},
        user::UserName,
    },
    time_display::DisplayZone,
    token::OneTimeTokenStore,
};
use nn_chat_db::{DbError, PostStore, memory::MemoryPostStore};
use std::{path::PathBuf, sync::Arc};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery staple";
pub const USERS: [&str; 3] = ["alice", "bob", "admin"];

pub fn user(name: &str) -> UserName {
    UserName::new(name.to_owned()).unwrap()
}

pub fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../assets")
}

/// Behaves like a database whose connection pool has gone away.
pub struct FailingPostStore;

fn pool_closed() -> DbError {
    DbError::Sqlx(sqlx::Error::PoolClosed)
}

#[async_trait]
impl PostStore for FailingPostStore {
    async fn list_posts(&self) -> nn_chat_db::Result<Vec<Post>> {
        Err(pool_closed())
    }

    async fn create_post(&self, _post: &CreatePost) -> nn_chat_db::Result<Post> {
        Err(pool_closed())
    }

    async fn fetch_post(&self, _post_id: Id<PostMarker>) -> nn_chat_db::Result<Option<Post>> {
        Err(pool_closed())
    }

    async fn delete_post(&self, _post_id: Id<PostMarker>) -> nn_chat_db::Result<bool> {
        Err(pool_closed())
    }
}

pub struct TestApp<P = MemoryPostStore> {
    router: Router,
    pub posts: Arc<P>,
    pub tokens: Arc<OneTimeTokenStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(MemoryPostStore::new(), assets_dir())
    }
}

impl<P: PostStore + 'static> TestApp<P> {
    pub fn with_store(posts: P, assets_dir: PathBuf) -> Self {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).unwrap();
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let credentials = Credentials::from_entries(
            USERS.map(|name| (user(name), hash_password(&argon2, PASSWORD).unwrap())),
        )
        .unwrap();

        let posts = Arc::new(posts);
        let tokens = Arc::new(OneTimeTokenStore::new());
        let router = server::app(ServerState {
            posts: posts.clone(),
            tokens: tokens.clone(),
            credentials: Arc::new(credentials),
            settings: Arc::new(Settings {
                admin: UserName::admin(),
                assets_dir,
                display_zone: DisplayZone::TOKYO,
            }),
        });

        Self {
            router,
            posts,
            tokens,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, user: Option<&str>) -> Response {
        self.send(request(Method::GET, uri, user, Body::empty()))
            .await
    }

    pub async fn post_form(&self, uri: &str, user: &str, form: &str) -> Response {
        let mut request = request(Method::POST, uri, Some(user), Body::from(form.to_owned()));
        request.headers_mut().insert(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        self.send(request).await
    }

    /// Renders the listing as `user` and returns the token embedded in it.
    pub async fn fetch_token(&self, user: &str) -> String {
        let response = self.get("/posts", Some(user)).await;
        assert_eq!(response.status(), StatusCode::OK);
        embedded_token(&body_text(response).await)
    }
}

pub fn request(method: Method, uri: &str, user: Option<&str>, body: Body) -> Request<Body> {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    if let Some(user) = user {
        request
            .headers_mut()
            .typed_insert(Authorization::basic(user, PASSWORD));
    }
    request
}

pub fn with_cookie(mut request: Request<Body>, cookie: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(COOKIE, cookie.parse().unwrap());
    request
}

pub async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).into_owned()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub fn embedded_token(html: &str) -> String {
    let marker = r#"name="oneTimeToken" value=""#;
    let start = html.find(marker).expect("page has no one-time token") + marker.len();
    let end = start + html[start..].find('"').unwrap();
    html[start..end].to_owned()
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(LOCATION)
        .map(|value| value.to_str().unwrap())
}

pub fn set_cookie(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(SET_COOKIE)
        .map(|value| value.to_str().unwrap())
}

pub fn assert_redirects_to_posts(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), Some("/posts"));
}
