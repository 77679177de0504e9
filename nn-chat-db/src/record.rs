use nn_chat_common::model::{ModelValidationError, post::Post, user::UserName};
use sqlx::FromRow;
use time::PrimitiveDateTime;

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct PostRecord {
    pub post_id: i64,
    pub content: String,
    pub posted_by: String,
    pub created_at: PrimitiveDateTime,
}

impl TryFrom<PostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.post_id.try_into()?,
            content: value.content,
            posted_by: UserName::new(value.posted_by)?,
            created_at: value.created_at.as_utc(),
        })
    }
}
