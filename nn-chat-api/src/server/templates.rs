use askama::Template;
use nn_chat_common::theme::Theme;

/// One post as shown in the listing.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct PostView {
    pub id: i64,
    pub content: String,
    pub posted_by: String,
    pub formatted_created_at: String,
    pub relative_created_at: String,
    pub can_delete: bool,
}

#[derive(Template)]
#[template(path = "posts.html")]
pub struct PostsTemplate<'a> {
    pub theme: Theme,
    pub posts: &'a [PostView],
    pub user: &'a str,
    pub one_time_token: &'a str,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate<'a> {
    pub resource: &'a str,
}
