use std::{fmt, str::FromStr};

use crate::api::{Comment, CommentId, Error, PostId};

/// Identifies one thread node whose comments are listed in a feed
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum FeedKey {
    /// Root comments of a post
    Root(PostId),

    /// Direct replies to a comment
    Children(CommentId),
}

impl FeedKey {
    /// The scope a comment is listed under: its parent's replies, or its
    /// post's root comments
    pub fn of(c: &Comment) -> FeedKey {
        match c.parent_id {
            Some(parent) => FeedKey::Children(parent),
            None => FeedKey::Root(c.post_id),
        }
    }

    pub fn holds(&self, c: &Comment) -> bool {
        *self == FeedKey::of(c)
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKey::Root(post) => write!(f, "root:{post}"),
            FeedKey::Children(parent) => write!(f, "children:{parent}"),
        }
    }
}

impl FromStr for FeedKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<FeedKey, Error> {
        let invalid = || Error::InvalidSourceKey(String::from(s));
        let (kind, id) = s.split_once(':').ok_or_else(invalid)?;
        let id = id.parse::<i64>().map_err(|_| invalid())?;
        match kind {
            "root" => Ok(FeedKey::Root(PostId(id))),
            "children" => Ok(FeedKey::Children(CommentId(id))),
            _ => Err(invalid()),
        }
    }
}
