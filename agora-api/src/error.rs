use anyhow::{anyhow, Context};
use serde_json::json;

use crate::{CommentId, PostId};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Comment {0} not found")]
    CommentNotFound(CommentId),

    #[error("Post {0} not found")]
    PostNotFound(PostId),

    #[error("Comment body must not be empty")]
    EmptyBody,

    #[error("Invalid page {0}, pages start at 1")]
    InvalidPage(u32),

    #[error("Invalid feed key {0:?}")]
    InvalidSourceKey(String),

    #[error("Could not reach server: {0}")]
    Transport(String),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::CommentNotFound(_) => StatusCode::NOT_FOUND,
            Error::PostNotFound(_) => StatusCode::NOT_FOUND,
            Error::EmptyBody => StatusCode::BAD_REQUEST,
            Error::InvalidPage(_) => StatusCode::BAD_REQUEST,
            Error::InvalidSourceKey(_) => StatusCode::BAD_REQUEST,
            Error::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::CommentNotFound(id) => json!({
                "message": "comment not found",
                "type": "comment-not-found",
                "id": id,
            }),
            Error::PostNotFound(id) => json!({
                "message": "post not found",
                "type": "post-not-found",
                "id": id,
            }),
            Error::EmptyBody => json!({
                "message": "comment body must not be empty",
                "type": "empty-body",
            }),
            Error::InvalidPage(page) => json!({
                "message": "pages start at 1",
                "type": "invalid-page",
                "page": page,
            }),
            Error::InvalidSourceKey(key) => json!({
                "message": "feed key is neither root:<post> nor children:<comment>",
                "type": "invalid-source-key",
                "key": key,
            }),
            Error::Transport(msg) => json!({
                "message": msg,
                "type": "transport",
            }),
        })
        .expect("serializing error")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let message = || {
            String::from(
                data.get("message")
                    .and_then(|msg| msg.as_str())
                    .unwrap_or(""),
            )
        };
        let int_field = |name: &str| {
            data.get(name)
                .and_then(|v| v.as_i64())
                .ok_or_else(|| anyhow!("error has no integer {name} field"))
        };
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(message()),
                "permission-denied" => Error::PermissionDenied,
                "comment-not-found" => Error::CommentNotFound(CommentId(int_field("id")?)),
                "post-not-found" => Error::PostNotFound(PostId(int_field("id")?)),
                "empty-body" => Error::EmptyBody,
                "invalid-page" => Error::InvalidPage(
                    u32::try_from(int_field("page")?).context("page number out of range")?,
                ),
                "invalid-source-key" => Error::InvalidSourceKey(String::from(
                    data.get("key").and_then(|k| k.as_str()).ok_or_else(|| {
                        anyhow!("error is about an invalid feed key but no key was provided")
                    })?,
                )),
                "transport" => Error::Transport(message()),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_from(kind: u8, num: i64, text: String) -> Error {
        match kind % 8 {
            0 => Error::Unknown(text),
            1 => Error::PermissionDenied,
            2 => Error::CommentNotFound(CommentId(num)),
            3 => Error::PostNotFound(PostId(num)),
            4 => Error::EmptyBody,
            5 => Error::InvalidPage(num as u32),
            6 => Error::InvalidSourceKey(text),
            _ => Error::Transport(text),
        }
    }

    #[test]
    fn error_round_trips_through_json() {
        bolero::check!()
            .with_type::<(u8, i64, String)>()
            .cloned()
            .for_each(|(kind, num, text)| {
                let err = error_from(kind, num, text);
                let parsed = Error::parse(&err.contents()).expect("parsing serialized error");
                assert_eq!(parsed, err);
            })
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            Error::CommentNotFound(CommentId(3)).status_code(),
            http::StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(Error::parse(br#"{ "type": "nope", "message": "" }"#).is_err());
        assert!(Error::parse(b"not json").is_err());
    }
}
