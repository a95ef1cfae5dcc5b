use async_trait::async_trait;

use crate::{Comment, CommentId, CommentPage, Error, PostId};

/// The remote side of the comment API, as seen by the client cache.
///
/// Every call is independent and may be in flight concurrently with the
/// others. Failures of any kind, including a comment or post that no longer
/// exists, are reported through [`Error`].
#[async_trait]
pub trait Remote: Send + Sync {
    async fn list_root_comments(
        &self,
        post: PostId,
        page: u32,
        per_page: u32,
    ) -> Result<CommentPage, Error>;

    async fn list_replies(
        &self,
        parent: CommentId,
        page: u32,
        per_page: u32,
    ) -> Result<CommentPage, Error>;

    async fn create_comment(&self, post: PostId, body: String) -> Result<Comment, Error>;

    async fn create_reply(&self, parent: CommentId, body: String) -> Result<Comment, Error>;

    async fn fetch_comment(&self, id: CommentId) -> Result<Comment, Error>;

    async fn update_comment(&self, id: CommentId, body: String) -> Result<Comment, Error>;

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error>;
}
