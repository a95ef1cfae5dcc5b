use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use agora_api::{
    Author, Comment, CommentId, CommentPage, Error, Pagination, PostId, Remote, UserId,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

/// In-memory comment server, listing comments oldest first
pub struct MockServer(Mutex<MockDb>);

#[derive(Debug)]
struct MockDb {
    author: Author,
    posts: BTreeSet<PostId>,
    comments: BTreeMap<CommentId, Comment>,
    next_id: i64,

    /// Existing but not yet returned by listings
    hidden: HashSet<CommentId>,

    failures: VecDeque<Error>,
    num_calls: usize,
}

impl MockDb {
    fn begin_call(&mut self) -> Result<(), Error> {
        self.num_calls += 1;
        match self.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn list(
        &self,
        page: u32,
        per_page: u32,
        filter: impl Fn(&Comment) -> bool,
    ) -> Result<CommentPage, Error> {
        if page == 0 {
            return Err(Error::InvalidPage(page));
        }
        let per_page = per_page.max(1) as usize;
        let matching = self
            .comments
            .values()
            .filter(|c| !self.hidden.contains(&c.id) && filter(c))
            .collect::<Vec<_>>();
        let total = matching.len();
        Ok(CommentPage {
            comments: matching
                .into_iter()
                .skip((page as usize - 1) * per_page)
                .take(per_page)
                .cloned()
                .collect(),
            pagination: Pagination {
                current_page: page,
                total_pages: ((total + per_page - 1) / per_page) as u32,
                total_comments: total as u64,
            },
        })
    }

    fn insert(
        &mut self,
        post: PostId,
        parent: Option<CommentId>,
        body: String,
    ) -> Result<Comment, Error> {
        if body.trim().is_empty() {
            return Err(Error::EmptyBody);
        }
        let now = Utc::now();
        let id = CommentId(self.next_id);
        self.next_id += 1;
        let c = Comment {
            id,
            body,
            author: self.author.clone(),
            post_id: post,
            parent_id: parent,
            created_at: now,
            updated_at: now,
            is_edited: false,
            edit_count: 0,
            like_count: 0,
            children_count: 0,
        };
        self.comments.insert(id, c.clone());
        Ok(c)
    }

    fn comment_mut(&mut self, id: CommentId) -> Result<&mut Comment, Error> {
        self.comments.get_mut(&id).ok_or(Error::CommentNotFound(id))
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer(Mutex::new(MockDb {
            author: Author {
                id: UserId(1),
                display_name: String::from("mock"),
            },
            posts: BTreeSet::new(),
            comments: BTreeMap::new(),
            next_id: 1,
            hidden: HashSet::new(),
            failures: VecDeque::new(),
            num_calls: 0,
        }))
    }

    pub fn add_post(&self, post: PostId) {
        self.0.lock().posts.insert(post);
    }

    /// Store a comment as-is, bypassing every check
    pub fn test_seed(&self, c: Comment) {
        let mut db = self.0.lock();
        db.posts.insert(c.post_id);
        db.next_id = db.next_id.max(c.id.0 + 1);
        db.comments.insert(c.id, c);
    }

    pub fn test_comment(&self, id: CommentId) -> Option<Comment> {
        self.0.lock().comments.get(&id).cloned()
    }

    /// Keep a comment out of listings, as a lagging replica would
    pub fn test_hide(&self, id: CommentId) {
        self.0.lock().hidden.insert(id);
    }

    pub fn test_reveal(&self, id: CommentId) {
        self.0.lock().hidden.remove(&id);
    }

    /// Make the next call fail with `err`, whatever it is
    pub fn test_fail_next(&self, err: Error) {
        self.0.lock().failures.push_back(err);
    }

    /// Return the number of calls served so far, failed ones included
    pub fn test_num_calls(&self) -> usize {
        self.0.lock().num_calls
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

#[async_trait]
impl Remote for MockServer {
    async fn list_root_comments(
        &self,
        post: PostId,
        page: u32,
        per_page: u32,
    ) -> Result<CommentPage, Error> {
        let mut db = self.0.lock();
        db.begin_call()?;
        if !db.posts.contains(&post) {
            return Err(Error::PostNotFound(post));
        }
        db.list(page, per_page, |c| c.post_id == post && c.parent_id.is_none())
    }

    async fn list_replies(
        &self,
        parent: CommentId,
        page: u32,
        per_page: u32,
    ) -> Result<CommentPage, Error> {
        let mut db = self.0.lock();
        db.begin_call()?;
        if !db.comments.contains_key(&parent) {
            return Err(Error::CommentNotFound(parent));
        }
        db.list(page, per_page, |c| c.parent_id == Some(parent))
    }

    async fn create_comment(&self, post: PostId, body: String) -> Result<Comment, Error> {
        let mut db = self.0.lock();
        db.begin_call()?;
        if !db.posts.contains(&post) {
            return Err(Error::PostNotFound(post));
        }
        db.insert(post, None, body)
    }

    async fn create_reply(&self, parent: CommentId, body: String) -> Result<Comment, Error> {
        let mut db = self.0.lock();
        db.begin_call()?;
        let post = db.comment_mut(parent)?.post_id;
        let c = db.insert(post, Some(parent), body)?;
        db.comment_mut(parent)?.children_count += 1;
        Ok(c)
    }

    async fn fetch_comment(&self, id: CommentId) -> Result<Comment, Error> {
        let mut db = self.0.lock();
        db.begin_call()?;
        db.comment_mut(id).map(|c| c.clone())
    }

    async fn update_comment(&self, id: CommentId, body: String) -> Result<Comment, Error> {
        let mut db = self.0.lock();
        db.begin_call()?;
        if body.trim().is_empty() {
            return Err(Error::EmptyBody);
        }
        let c = db.comment_mut(id)?;
        c.body = body;
        c.updated_at = Utc::now();
        c.is_edited = true;
        c.edit_count += 1;
        Ok(c.clone())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        let mut db = self.0.lock();
        db.begin_call()?;
        let removed = db.comments.remove(&id).ok_or(Error::CommentNotFound(id))?;
        db.hidden.remove(&id);
        // replies are not deleted along with their parent
        if let Some(parent) = removed.parent_id {
            if let Ok(parent) = db.comment_mut(parent) {
                parent.children_count = parent.children_count.saturating_sub(1);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed initializing tokio runtime")
            .block_on(f)
    }

    #[test]
    fn paginates_oldest_first() {
        block_on(async {
            let mock = MockServer::new();
            mock.add_post(PostId(1));
            for i in 0..5 {
                mock.create_comment(PostId(1), format!("c{i}")).await.unwrap();
            }
            let p = mock.list_root_comments(PostId(1), 2, 2).await.unwrap();
            let bodies = p.comments.iter().map(|c| &c.body as &str).collect::<Vec<_>>();
            assert_eq!(bodies, vec!["c2", "c3"]);
            assert_eq!(
                p.pagination,
                Pagination {
                    current_page: 2,
                    total_pages: 3,
                    total_comments: 5
                }
            );
            let p = mock.list_root_comments(PostId(1), 4, 2).await.unwrap();
            assert!(p.comments.is_empty());
            assert_eq!(
                mock.list_root_comments(PostId(1), 0, 2).await,
                Err(Error::InvalidPage(0))
            );
        })
    }

    #[test]
    fn replies_track_parent_count_without_cascade() {
        block_on(async {
            let mock = MockServer::new();
            mock.add_post(PostId(1));
            let parent = mock.create_comment(PostId(1), String::from("p")).await.unwrap();
            let reply = mock.create_reply(parent.id, String::from("r")).await.unwrap();
            assert_eq!(reply.post_id, PostId(1));
            assert_eq!(mock.test_comment(parent.id).unwrap().children_count, 1);

            let roots = mock.list_root_comments(PostId(1), 1, 10).await.unwrap();
            assert_eq!(roots.comments.len(), 1);

            mock.delete_comment(parent.id).await.unwrap();
            assert!(mock.test_comment(reply.id).is_some());
            assert_eq!(
                mock.list_replies(parent.id, 1, 10).await,
                Err(Error::CommentNotFound(parent.id))
            );
        })
    }

    #[test]
    fn rejects_empty_bodies_and_unknown_posts() {
        block_on(async {
            let mock = MockServer::new();
            assert_eq!(
                mock.create_comment(PostId(1), String::from("hi")).await,
                Err(Error::PostNotFound(PostId(1)))
            );
            mock.add_post(PostId(1));
            assert_eq!(
                mock.create_comment(PostId(1), String::from("  ")).await,
                Err(Error::EmptyBody)
            );
        })
    }

    #[test]
    fn hidden_comments_and_injected_failures() {
        block_on(async {
            let mock = MockServer::new();
            mock.add_post(PostId(1));
            let c = mock.create_comment(PostId(1), String::from("x")).await.unwrap();
            mock.test_hide(c.id);
            let p = mock.list_root_comments(PostId(1), 1, 10).await.unwrap();
            assert!(p.comments.is_empty());
            mock.test_reveal(c.id);

            mock.test_fail_next(Error::PermissionDenied);
            assert_eq!(
                mock.list_root_comments(PostId(1), 1, 10).await,
                Err(Error::PermissionDenied)
            );
            let p = mock.list_root_comments(PostId(1), 1, 10).await.unwrap();
            assert_eq!(p.comments.len(), 1);
            assert_eq!(mock.test_num_calls(), 4);
        })
    }

    #[test]
    fn edits_are_tracked() {
        block_on(async {
            let mock = MockServer::new();
            mock.add_post(PostId(1));
            let c = mock.create_comment(PostId(1), String::from("x")).await.unwrap();
            let c = mock.update_comment(c.id, String::from("y")).await.unwrap();
            assert!(c.is_edited);
            assert_eq!(c.edit_count, 1);
            assert_eq!(mock.fetch_comment(c.id).await.unwrap().body, "y");
        })
    }
}
