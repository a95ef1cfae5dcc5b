use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    api::{Comment, CommentId, Error, PostId, Remote},
    CommentStore, Feed, FeedKey, FeedView,
};

/// Runs comment operations against a [`Remote`] and applies their confirmed
/// results to a shared [`CommentStore`].
///
/// The store lock is only ever taken between remote calls, so each operation
/// lands as a single state transition. Operations may run concurrently; their
/// effects apply in the order the remote answers.
pub struct CommentEngine<R> {
    remote: R,
    store: Arc<RwLock<CommentStore>>,
    page_size: u32,
}

impl<R: Remote> CommentEngine<R> {
    pub fn new(remote: R, page_size: u32) -> CommentEngine<R> {
        CommentEngine::with_store(remote, Arc::new(RwLock::new(CommentStore::new())), page_size)
    }

    pub fn with_store(
        remote: R,
        store: Arc<RwLock<CommentStore>>,
        page_size: u32,
    ) -> CommentEngine<R> {
        CommentEngine {
            remote,
            store,
            page_size: page_size.max(1),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn store(&self) -> Arc<RwLock<CommentStore>> {
        self.store.clone()
    }

    pub fn snapshot(&self) -> CommentStore {
        self.store.read().clone()
    }

    pub fn comment(&self, id: CommentId) -> Option<Arc<Comment>> {
        self.store.read().comment(id).cloned()
    }

    pub fn feed_view(&self, key: &FeedKey) -> Option<FeedView> {
        self.store.read().feed_view(key)
    }

    pub fn clear_feed(&self, key: &FeedKey) -> Option<Feed> {
        self.store.write().clear_feed(key)
    }

    pub fn reset(&self) {
        self.store.write().reset()
    }

    /// Fetches one page of `key` and merges it into the feed, which is
    /// created if needed. On failure the feed keeps its items and records
    /// the error.
    pub async fn load_page(
        &self,
        key: FeedKey,
        page: u32,
        page_size: u32,
        append: bool,
    ) -> Result<FeedView, Error> {
        if page == 0 {
            return Err(Error::InvalidPage(page));
        }
        let page_size = page_size.max(1);
        self.store.write().begin_load(key);

        tracing::debug!(%key, page, page_size, append, "fetching comments");
        let res = match key {
            FeedKey::Root(post) => self.remote.list_root_comments(post, page, page_size).await,
            FeedKey::Children(parent) => self.remote.list_replies(parent, page, page_size).await,
        };

        let mut store = self.store.write();
        match res {
            Ok(fetched) => Ok(store.apply_page(key, fetched, append)),
            Err(err) => {
                tracing::warn!(%key, page, %err, "failed fetching comments");
                store.fail_load(key, err.to_string());
                Err(err)
            }
        }
    }

    /// Reloads the first page, keeping comments created here that the
    /// server does not list yet
    pub async fn refresh(&self, key: FeedKey) -> Result<FeedView, Error> {
        self.load_page(key, 1, self.page_size, false).await
    }

    pub async fn expand_replies(&self, parent: CommentId) -> Result<FeedView, Error> {
        self.refresh(FeedKey::Children(parent)).await
    }

    /// Appends the page after the last one loaded, if the server has more
    pub async fn load_more(&self, key: FeedKey) -> Result<FeedView, Error> {
        let next = {
            let store = self.store.read();
            match store.feed(&key) {
                Some(feed) if !feed.has_more() => return Ok(store.view(feed)),
                Some(feed) => feed.pagination.current_page + 1,
                None => 1,
            }
        };
        self.load_page(key, next, self.page_size, true).await
    }

    /// Creates a comment on `post`, as a reply to `parent` if set
    pub async fn create(
        &self,
        post: PostId,
        body: String,
        parent: Option<CommentId>,
    ) -> Result<Arc<Comment>, Error> {
        if let Some(parent) = parent {
            return self.reply(parent, body).await;
        }
        let confirmed = self.remote.create_comment(post, body).await.map_err(|err| {
            tracing::warn!(%post, %err, "failed creating comment");
            err
        })?;
        tracing::info!(comment = %confirmed.id, %post, "created comment");
        Ok(self.store.write().insert_created(confirmed, None))
    }

    pub async fn reply(&self, parent: CommentId, body: String) -> Result<Arc<Comment>, Error> {
        let confirmed = self
            .remote
            .create_reply(parent, body)
            .await
            .map_err(|err| {
                tracing::warn!(%parent, %err, "failed creating reply");
                err
            })?;
        tracing::info!(comment = %confirmed.id, %parent, "created reply");
        Ok(self.store.write().insert_created(confirmed, Some(parent)))
    }

    pub async fn update(&self, id: CommentId, body: String) -> Result<Arc<Comment>, Error> {
        let confirmed = self.remote.update_comment(id, body).await.map_err(|err| {
            tracing::warn!(comment = %id, %err, "failed updating comment");
            err
        })?;
        tracing::info!(comment = %id, edits = confirmed.edit_count, "updated comment");
        Ok(self.store.write().replace_comment(confirmed))
    }

    /// Re-reads one comment from the server
    pub async fn refresh_comment(&self, id: CommentId) -> Result<Arc<Comment>, Error> {
        let fetched = self.remote.fetch_comment(id).await.map_err(|err| {
            tracing::warn!(comment = %id, %err, "failed refreshing comment");
            err
        })?;
        Ok(self.store.write().replace_comment(fetched))
    }

    /// Deletes a comment; `parent` is the comment it replies to, if any.
    ///
    /// Replies to the deleted comment stay cached.
    pub async fn delete(&self, id: CommentId, parent: Option<CommentId>) -> Result<(), Error> {
        self.remote.delete_comment(id).await.map_err(|err| {
            tracing::warn!(comment = %id, %err, "failed deleting comment");
            err
        })?;
        tracing::info!(comment = %id, ?parent, "deleted comment");
        self.store.write().remove_comment(id, parent);
        Ok(())
    }
}
