use std::sync::Arc;

use crate::{api::CommentId, store::CountChange, CommentStore, FeedKey};

impl CommentStore {
    /// Sets the reply count of `parent` and returns every loaded scope that
    /// currently lists it.
    ///
    /// Feeds read comments through the store, so all of them show the new
    /// count as soon as this returns.
    pub fn sync_children_count(&mut self, parent: CommentId, count: u64) -> Vec<FeedKey> {
        match Arc::make_mut(&mut self.comments).get_mut(&parent) {
            Some(c) => Arc::make_mut(c).children_count = count,
            None => {
                tracing::debug!(%parent, "reply count changed for a comment that is not cached");
                return Vec::new();
            }
        }
        let mut scopes = self
            .feeds
            .values()
            .filter(|f| f.contains(parent))
            .map(|f| f.key)
            .collect::<Vec<_>>();
        scopes.sort();
        tracing::debug!(%parent, count, ?scopes, "synchronized reply count");
        scopes
    }

    pub(crate) fn adjust_children_count(
        &mut self,
        parent: CommentId,
        change: CountChange,
    ) -> Vec<FeedKey> {
        let current = match self.comments.get(&parent) {
            Some(c) => c.children_count,
            None => return Vec::new(),
        };
        let count = match change {
            CountChange::Created => current + 1,
            CountChange::Deleted => current.saturating_sub(1),
        };
        self.sync_children_count(parent, count)
    }
}
