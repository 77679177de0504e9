use crate::server::ServerRouter;
use axum::Router;

mod assets;
mod misc;
mod posts;

pub const POSTS_LOCATION: &str = "/posts";

pub fn routes() -> ServerRouter {
    Router::new()
        .merge(posts::routes())
        .merge(misc::routes())
        .merge(assets::routes())
}
