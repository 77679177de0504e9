use crate::model::{Id, user::UserName};
use time::UtcDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub content: String,
    pub posted_by: UserName,
    pub created_at: UtcDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct CreatePost {
    pub content: String,
    pub posted_by: UserName,
}

impl Post {
    /// Whether `user` may delete this post: its author, or the admin identity.
    #[must_use]
    pub fn deletable_by(&self, user: &UserName, admin: &UserName) -> bool {
        self.posted_by == *user || user == admin
    }
}
