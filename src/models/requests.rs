//! Request DTOs for the blog API
//!
//! Defines the structure of incoming HTTP request bodies. Fields are optional
//! at the serde level so a missing field becomes a validation error with a
//! readable message instead of a deserialization failure.

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::post::{NewPost, PostChanges, MAX_AUTHOR_LENGTH, MAX_TITLE_LENGTH};

/// Request body for POST /api/posts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl CreatePostRequest {
    /// Checks that title, content and author are present and within limits.
    pub fn validate(self) -> Result<NewPost> {
        let (Some(title), Some(content), Some(author)) = (
            present(self.title),
            present(self.content),
            present(self.author),
        ) else {
            return Err(AppError::Validation(
                "Title, content and author are required".to_string(),
            ));
        };

        check_title(&title)?;
        if author.chars().count() > MAX_AUTHOR_LENGTH {
            return Err(AppError::Validation(format!(
                "Author must be at most {} characters",
                MAX_AUTHOR_LENGTH
            )));
        }

        Ok(NewPost {
            title,
            content,
            author,
        })
    }
}

/// Request body for PUT /api/posts/:id
///
/// Any `author` field in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl UpdatePostRequest {
    /// Checks that title and content are present and within limits.
    pub fn validate(self) -> Result<PostChanges> {
        let (Some(title), Some(content)) = (present(self.title), present(self.content)) else {
            return Err(AppError::Validation(
                "Title and content are required".to_string(),
            ));
        };

        check_title(&title)?;

        Ok(PostChanges { title, content })
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

fn check_title(title: &str) -> Result<()> {
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create(title: &str, content: &str, author: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            author: Some(author.to_string()),
        }
    }

    #[test]
    fn test_create_request_deserialize() {
        let json = r#"{"title": "A", "content": "B", "author": "C"}"#;
        let req: CreatePostRequest = serde_json::from_str(json).unwrap();
        let post = req.validate().unwrap();
        assert_eq!(post.title, "A");
        assert_eq!(post.content, "B");
        assert_eq!(post.author, "C");
    }

    #[test]
    fn test_create_missing_field() {
        let json = r#"{"title": "A", "content": "B"}"#;
        let req: CreatePostRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_create_blank_field() {
        let req = create("A", "   ", "C");
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_title_boundary() {
        assert!(create(&"x".repeat(255), "B", "C").validate().is_ok());
        assert!(matches!(
            create(&"x".repeat(256), "B", "C").validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_title_length_counts_characters() {
        // 255 multi-byte characters is still within the limit
        assert!(create(&"é".repeat(255), "B", "C").validate().is_ok());
    }

    #[test]
    fn test_author_too_long() {
        let req = create("A", "B", &"a".repeat(101));
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_ignores_author() {
        let json = r#"{"title": "T", "content": "C", "author": "someone else"}"#;
        let req: UpdatePostRequest = serde_json::from_str(json).unwrap();
        let changes = req.validate().unwrap();
        assert_eq!(changes.title, "T");
        assert_eq!(changes.content, "C");
    }

    #[test]
    fn test_update_missing_content() {
        let req = UpdatePostRequest {
            title: Some("T".to_string()),
            content: None,
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    proptest! {
        #[test]
        fn prop_title_limit_is_exact(len in 1usize..400) {
            let result = create(&"t".repeat(len), "body", "author").validate();
            prop_assert_eq!(result.is_ok(), len <= MAX_TITLE_LENGTH);
        }
    }
}
