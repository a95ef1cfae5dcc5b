mod config;
pub use config::{ClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE};

mod engine;
pub use engine::CommentEngine;

mod feed;
pub use feed::{Feed, FeedStatus, FeedView, PageInfo};

mod http;
pub use http::HttpRemote;

mod merge;
pub use merge::{dedup_ids, merge_page};

mod scope;
pub use scope::FeedKey;

mod store;
pub use store::CommentStore;

mod sync;

pub mod api {
    pub use agora_api::*;
}
