use serde::{Deserialize, Serialize};

/// Post entity - an article owned by exactly one user.
///
/// `creator_id` references a user by id; the store does not enforce it.
/// Timestamps are epoch seconds. `deleted_at` is carried for storage
/// compatibility and never written: deletes are hard deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub creator_id: i64,
    #[serde(rename = "post_title")]
    pub title: String,
    #[serde(rename = "post_body")]
    pub body: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub deleted_at: Option<i64>,
}

impl Post {
    /// Create an unsaved post. The store assigns `id` on insert.
    pub fn new(creator_id: i64, title: String, body: String) -> Self {
        Self {
            id: 0,
            creator_id,
            title,
            body,
            created_at: crate::now_timestamp(),
            updated_at: None,
            deleted_at: None,
        }
    }

    /// A post with neither title nor body carries no content to store.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_serializes_with_column_names() {
        let post = Post::new(7, "A".to_string(), "B".to_string());
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["creator_id"], 7);
        assert_eq!(json["post_title"], "A");
        assert_eq!(json["post_body"], "B");
        assert!(json["updated_at"].is_null());
    }

    #[test]
    fn test_blank_post() {
        assert!(Post::new(1, " ".to_string(), String::new()).is_blank());
        assert!(!Post::new(1, String::new(), "body".to_string()).is_blank());
    }
}
