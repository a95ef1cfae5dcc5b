use std::sync::Arc;

use crate::{
    api::{Comment, CommentId, Pagination},
    FeedKey,
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

impl From<Pagination> for PageInfo {
    fn from(p: Pagination) -> PageInfo {
        PageInfo {
            current_page: p.current_page,
            total_pages: p.total_pages,
            total_count: p.total_comments,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FeedStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Ordered ids of the comments listed under one scope, with their paging
/// state. Comment contents live in the store, not here.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Feed {
    pub key: FeedKey,
    pub items: Vec<CommentId>,
    pub pagination: PageInfo,
    pub status: FeedStatus,

    /// Set iff `status` is `Failed`
    pub error: Option<String>,
}

impl Feed {
    pub fn new(key: FeedKey) -> Feed {
        Feed {
            key,
            items: Vec::new(),
            pagination: PageInfo::default(),
            status: FeedStatus::Idle,
            error: None,
        }
    }

    pub fn contains(&self, id: CommentId) -> bool {
        self.items.contains(&id)
    }

    /// Whether a next page may exist; true until a page has been loaded
    pub fn has_more(&self) -> bool {
        self.pagination.current_page == 0
            || self.pagination.current_page < self.pagination.total_pages
    }

    /// Returns false if the id was already listed
    pub(crate) fn prepend(&mut self, id: CommentId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.items.insert(0, id);
        true
    }

    pub(crate) fn remove(&mut self, id: CommentId) -> bool {
        let len = self.items.len();
        self.items.retain(|i| *i != id);
        self.items.len() != len
    }

    pub(crate) fn count_created(&mut self) {
        self.pagination.total_count += 1;
    }

    pub(crate) fn count_deleted(&mut self) {
        self.pagination.total_count = self.pagination.total_count.saturating_sub(1);
    }
}

/// A feed with its comments resolved from the store, for rendering
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedView {
    pub key: FeedKey,
    pub items: Vec<Arc<Comment>>,
    pub pagination: PageInfo,
    pub status: FeedStatus,
    pub error: Option<String>,
}
