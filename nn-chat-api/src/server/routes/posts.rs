use crate::server::{
    Result, ServerError, ServerRouter, Settings,
    auth::AuthenticatedUser,
    client_info::ClientInfo,
    form::Form,
    routes::{POSTS_LOCATION, misc::persist_theme},
    templates::{PostView, PostsTemplate},
};
use askama::Template;
use axum::{
    extract::State,
    http::header::CONTENT_SECURITY_POLICY,
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::{
    extract::CookieJar,
    routing::{RouterExt, TypedPath},
};
use nn_chat_common::{
    model::{
        Id,
        post::{CreatePost, Post, PostMarker},
        user::UserName,
    },
    token::OneTimeTokenStore,
};
use nn_chat_db::PostStore;
use serde::Deserialize;
use std::sync::Arc;
use time::UtcDateTime;
use tracing::{debug, info};

pub const CONTENT_SECURITY_POLICY_VALUE: &str =
    "default-src 'self'; script-src 'self' https://*; style-src 'self' https://*; font-src https://*;";

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_post(create_post)
        .typed_post(delete_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct PostsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/delete", rejection(ServerError))]
struct DeletePostPath();

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
struct CreatePostForm {
    content: Option<String>,
    #[serde(rename = "oneTimeToken")]
    one_time_token: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
struct DeletePostForm {
    id: Option<String>,
    #[serde(rename = "oneTimeToken")]
    one_time_token: Option<String>,
}

fn redirect_to_posts() -> Redirect {
    Redirect::to(POSTS_LOCATION)
}

/// Consumes the submitted token of `user`. An empty field counts as missing.
fn consume_token(
    tokens: &OneTimeTokenStore,
    user: &UserName,
    submitted: Option<&str>,
) -> Result<()> {
    let submitted = submitted
        .filter(|token| !token.is_empty())
        .ok_or(ServerError::MissingOneTimeToken)?;

    if tokens.consume(user, submitted) {
        Ok(())
    } else {
        Err(ServerError::InvalidOneTimeToken(user.clone()))
    }
}

fn post_view(
    post: &Post,
    user: &UserName,
    settings: &Settings,
    now: UtcDateTime,
) -> Result<PostView> {
    Ok(PostView {
        id: post.id.get(),
        content: post.content.clone(),
        posted_by: post.posted_by.get().to_owned(),
        formatted_created_at: settings.display_zone.format_absolute(post.created_at)?,
        relative_created_at: settings.display_zone.format_relative(post.created_at, now)?,
        can_delete: post.deletable_by(user, &settings.admin),
    })
}

async fn list_posts(
    PostsPath(): PostsPath,
    State(db): State<Arc<dyn PostStore>>,
    State(tokens): State<Arc<OneTimeTokenStore>>,
    State(settings): State<Arc<Settings>>,
    user: AuthenticatedUser,
    client: ClientInfo,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let (jar, theme) = persist_theme(jar);
    let user = user.user_name();

    let posts = db.list_posts().await?;
    let now = UtcDateTime::now();
    let views = posts
        .iter()
        .map(|post| post_view(post, user, &settings, now))
        .collect::<Result<Vec<_>>>()?;

    let one_time_token = tokens.issue(user);
    let html = PostsTemplate {
        theme,
        posts: &views,
        user: user.get(),
        one_time_token: one_time_token.as_str(),
    }
    .render()?;

    info!(
        %user,
        remote_address = ?client.remote_address,
        user_agent = ?client.user_agent,
        "Posts viewed"
    );

    Ok((
        jar,
        [(CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY_VALUE)],
        Html(html),
    ))
}

async fn create_post(
    PostsPath(): PostsPath,
    State(db): State<Arc<dyn PostStore>>,
    State(tokens): State<Arc<OneTimeTokenStore>>,
    user: AuthenticatedUser,
    jar: CookieJar,
    Form(form): Form<CreatePostForm>,
) -> Result<(CookieJar, Redirect)> {
    let (jar, _) = persist_theme(jar);
    let user = user.user_name();

    let Some(content) = form.content.filter(|content| !content.is_empty()) else {
        debug!(%user, "Empty post submitted, ignoring");
        return Ok((jar, redirect_to_posts()));
    };
    consume_token(&tokens, user, form.one_time_token.as_deref())?;

    let post = db
        .create_post(&CreatePost {
            content,
            posted_by: user.clone(),
        })
        .await?;
    info!(%user, post_id = %post.id, content = %post.content, "Post submitted");

    Ok((jar, redirect_to_posts()))
}

async fn delete_post(
    DeletePostPath(): DeletePostPath,
    State(db): State<Arc<dyn PostStore>>,
    State(tokens): State<Arc<OneTimeTokenStore>>,
    State(settings): State<Arc<Settings>>,
    user: AuthenticatedUser,
    client: ClientInfo,
    Form(form): Form<DeletePostForm>,
) -> Result<Redirect> {
    let user = user.user_name();

    let Some(post_id) = form
        .id
        .as_deref()
        .and_then(|id| id.parse::<Id<PostMarker>>().ok())
    else {
        debug!(%user, id = ?form.id, "Deletion without a valid id, ignoring");
        return Ok(redirect_to_posts());
    };
    consume_token(&tokens, user, form.one_time_token.as_deref())?;

    let post = db
        .fetch_post(post_id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(post_id))?;

    if !post.deletable_by(user, &settings.admin) {
        return Err(ServerError::NotPostAuthor {
            user: user.clone(),
            post_id,
        });
    }

    if !db.delete_post(post_id).await? {
        debug!(%post_id, "Post was already gone");
    }
    info!(
        %user,
        %post_id,
        remote_address = ?client.remote_address,
        user_agent = ?client.user_agent,
        "Post deleted"
    );

    Ok(redirect_to_posts())
}
