use crate::{Comment, CommentId};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_comments: u64,
}

/// One page of a comment listing, root comments or replies alike
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentEnvelope {
    pub comment: Comment,
}

/// Body of a root comment creation; `parent_id` is always sent, as null
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub body: String,
    pub parent_id: Option<CommentId>,
}

impl NewComment {
    pub fn root(body: String) -> NewComment {
        NewComment {
            body,
            parent_id: None,
        }
    }
}

/// Body of reply creation and of comment edition
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentBody {
    pub body: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_root_comment_sends_null_parent() {
        let v = serde_json::to_value(NewComment::root(String::from("hi"))).unwrap();
        assert_eq!(v, serde_json::json!({ "body": "hi", "parent_id": null }));
    }

    #[test]
    fn list_query_omits_absent_parent() {
        let v = serde_json::to_value(ListQuery {
            page: 2,
            per_page: 10,
            parent_id: None,
        })
        .unwrap();
        assert_eq!(v, serde_json::json!({ "page": 2, "per_page": 10 }));
    }

    #[test]
    fn parses_empty_page() {
        let p: CommentPage = serde_json::from_str(
            r#"{ "comments": [], "pagination": { "current_page": 1, "total_pages": 0, "total_comments": 0 } }"#,
        )
        .unwrap();
        assert!(p.comments.is_empty());
        assert_eq!(p.pagination.current_page, 1);
    }
}
