use crate::{PostStore, Result, record::PostRecord};
use async_trait::async_trait;
use nn_chat_common::model::{
    Id,
    post::{CreatePost, Post, PostMarker},
};
use sqlx::{PgPool, postgres::PgPoolOptions, query, query_as};
use tracing::{debug, info};

pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect(database_url).await?;
        debug!("Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl PostStore for DbClient {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT
                posts.post_id,
                posts.content,
                posts.posted_by,
                posts.created_at
            FROM
                posts.posts
            ORDER BY
                posts.post_id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    async fn create_post(&self, post: &CreatePost) -> Result<Post> {
        let record = query_as::<_, PostRecord>(
            "
            INSERT INTO posts.posts (content, posted_by)
            VALUES ($1, $2)
            RETURNING
                posts.post_id,
                posts.content,
                posts.posted_by,
                posts.created_at
            ",
        )
        .bind(&post.content)
        .bind(post.posted_by.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(record.try_into()?)
    }

    async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(
            "
            SELECT
                posts.post_id,
                posts.content,
                posts.posted_by,
                posts.created_at
            FROM
                posts.posts
            WHERE
                posts.post_id = $1
            ",
        )
        .bind(post_id.get())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    async fn delete_post(&self, post_id: Id<PostMarker>) -> Result<bool> {
        let result = query(
            "
            DELETE FROM posts.posts
            WHERE posts.post_id = $1
            ",
        )
        .bind(post_id.get())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
