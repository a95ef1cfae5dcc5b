use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

mod comment;
pub use comment::{Author, Comment, CommentId, PostId, UserId};

mod error;
pub use error::Error;

mod page;
pub use page::{CommentBody, CommentEnvelope, CommentPage, ListQuery, NewComment, Pagination};

mod remote;
pub use remote::Remote;

#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AuthToken(pub Uuid);
