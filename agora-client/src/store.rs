use std::{collections::HashMap, sync::Arc};

use crate::{
    api::{Comment, CommentId, CommentPage},
    merge_page, Feed, FeedKey, FeedStatus, FeedView,
};

/// Normalized comment cache: one canonical record per comment, plus the
/// feeds listing them by id.
///
/// Cloning is cheap and yields an immutable snapshot; writers copy on write.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommentStore {
    pub(crate) comments: Arc<HashMap<CommentId, Arc<Comment>>>,
    pub(crate) feeds: Arc<HashMap<FeedKey, Feed>>,
}

impl CommentStore {
    pub fn new() -> CommentStore {
        CommentStore::default()
    }

    /// Drops every comment and every feed
    pub fn reset(&mut self) {
        *self = CommentStore::new();
    }

    pub fn comment(&self, id: CommentId) -> Option<&Arc<Comment>> {
        self.comments.get(&id)
    }

    pub fn num_comments(&self) -> usize {
        self.comments.len()
    }

    pub fn feed(&self, key: &FeedKey) -> Option<&Feed> {
        self.feeds.get(key)
    }

    pub fn feeds(&self) -> impl Iterator<Item = &Feed> {
        self.feeds.values()
    }

    pub fn feed_view(&self, key: &FeedKey) -> Option<FeedView> {
        self.feeds.get(key).map(|feed| self.view(feed))
    }

    pub(crate) fn view(&self, feed: &Feed) -> FeedView {
        FeedView {
            key: feed.key,
            items: feed
                .items
                .iter()
                .filter_map(|id| self.comments.get(id))
                .cloned()
                .collect(),
            pagination: feed.pagination,
            status: feed.status,
            error: feed.error.clone(),
        }
    }

    /// Forgets one feed; the comments it listed stay cached
    pub fn clear_feed(&mut self, key: &FeedKey) -> Option<Feed> {
        Arc::make_mut(&mut self.feeds).remove(key)
    }

    fn feed_mut(&mut self, key: FeedKey) -> &mut Feed {
        Arc::make_mut(&mut self.feeds)
            .entry(key)
            .or_insert_with(|| Feed::new(key))
    }

    pub fn begin_load(&mut self, key: FeedKey) {
        let feed = self.feed_mut(key);
        feed.status = FeedStatus::Loading;
        feed.error = None;
    }

    /// Records a failed fetch, leaving items and pagination as they were
    pub fn fail_load(&mut self, key: FeedKey, message: String) {
        let feed = self.feed_mut(key);
        feed.status = FeedStatus::Failed;
        feed.error = Some(message);
    }

    pub fn apply_page(&mut self, key: FeedKey, page: CommentPage, append: bool) -> FeedView {
        let mut incoming = Vec::with_capacity(page.comments.len());
        {
            let comments = Arc::make_mut(&mut self.comments);
            for c in page.comments {
                if key.holds(&c) {
                    incoming.push(c.id);
                } else {
                    tracing::warn!(
                        %key,
                        comment = %c.id,
                        "server listed comment from another scope"
                    );
                }
                comments.insert(c.id, Arc::new(c));
            }
        }
        let feed = self.feed_mut(key);
        feed.items = merge_page(&feed.items, &incoming, append);
        feed.pagination = page.pagination.into();
        feed.status = FeedStatus::Succeeded;
        feed.error = None;
        tracing::debug!(%key, items = feed.items.len(), append, "merged page into feed");
        let feed = feed.clone();
        self.view(&feed)
    }

    /// Records a comment the server just confirmed creating, under `parent`
    /// if it is a reply
    pub fn insert_created(
        &mut self,
        comment: Comment,
        parent: Option<CommentId>,
    ) -> Arc<Comment> {
        let key = match parent {
            Some(parent) => FeedKey::Children(parent),
            None => FeedKey::Root(comment.post_id),
        };
        let id = comment.id;
        let comment = Arc::new(comment);
        Arc::make_mut(&mut self.comments).insert(id, comment.clone());

        let feed = self.feed_mut(key);
        if feed.prepend(id) {
            feed.count_created();
        } else {
            // a fetch resolved first and already counted it
            tracing::debug!(%key, comment = %id, "created comment was already listed");
        }

        if let Some(parent) = parent {
            self.adjust_children_count(parent, CountChange::Created);
        }
        comment
    }

    /// Overwrites the canonical record, which every feed listing it reads
    pub fn replace_comment(&mut self, comment: Comment) -> Arc<Comment> {
        let comment = Arc::new(comment);
        Arc::make_mut(&mut self.comments).insert(comment.id, comment.clone());
        comment
    }

    /// Forgets a comment the server just confirmed deleting.
    ///
    /// The comment is unlisted from every feed. The root feed of its post and,
    /// for a reply, its parent's reply feed have their totals decremented.
    /// Its own replies, if any, are left cached.
    pub fn remove_comment(
        &mut self,
        id: CommentId,
        parent: Option<CommentId>,
    ) -> Option<Arc<Comment>> {
        let removed = Arc::make_mut(&mut self.comments).remove(&id);
        let parent = parent.or_else(|| removed.as_ref().and_then(|c| c.parent_id));
        let root = removed.as_ref().map(|c| FeedKey::Root(c.post_id));
        let children = parent.map(FeedKey::Children);

        for feed in Arc::make_mut(&mut self.feeds).values_mut() {
            let listed = feed.remove(id);
            let counted = Some(feed.key) == root
                || Some(feed.key) == children
                || (removed.is_none() && listed);
            if counted {
                feed.count_deleted();
            }
        }

        if let Some(parent) = parent {
            self.adjust_children_count(parent, CountChange::Deleted);
        }
        if self.feeds.contains_key(&FeedKey::Children(id)) {
            tracing::debug!(comment = %id, "deleted comment leaves its replies cached");
        }
        removed
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum CountChange {
    Created,
    Deleted,
}
