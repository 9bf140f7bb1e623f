//! Concrete record shapes
//!
//! - [`PostData`]: blog posts, title and content always present
//! - [`IssueFeatures`]: issue reports, every feature optional

use super::record::{Record, RecordField};
use serde::{Deserialize, Serialize};

/// Fields of a [`PostData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostField {
    Title,
    Content,
}

impl RecordField for PostField {
    fn name(&self) -> &'static str {
        match self {
            PostField::Title => "title",
            PostField::Content => "content",
        }
    }
}

/// A post with a title and body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostData {
    pub title: String,
    pub content: String,
}

impl PostData {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

impl Record for PostData {
    type Field = PostField;

    const FIELDS: &'static [PostField] = &[PostField::Title, PostField::Content];

    fn field(&self, field: PostField) -> Option<&str> {
        match field {
            PostField::Title => Some(&self.title),
            PostField::Content => Some(&self.content),
        }
    }
}

/// Fields of an [`IssueFeatures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueField {
    Operation,
    Phenomenon,
    ExpectedBehavior,
    ActualBehavior,
}

impl RecordField for IssueField {
    fn name(&self) -> &'static str {
        match self {
            IssueField::Operation => "operation",
            IssueField::Phenomenon => "phenomenon",
            IssueField::ExpectedBehavior => "expected_behavior",
            IssueField::ActualBehavior => "actual_behavior",
        }
    }
}

/// Descriptive features of an issue report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFeatures {
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub phenomenon: Option<String>,
    #[serde(default)]
    pub expected_behavior: Option<String>,
    #[serde(default)]
    pub actual_behavior: Option<String>,
}

impl Record for IssueFeatures {
    type Field = IssueField;

    const FIELDS: &'static [IssueField] = &[
        IssueField::Operation,
        IssueField::Phenomenon,
        IssueField::ExpectedBehavior,
        IssueField::ActualBehavior,
    ];

    fn field(&self, field: IssueField) -> Option<&str> {
        match field {
            IssueField::Operation => self.operation.as_deref(),
            IssueField::Phenomenon => self.phenomenon.as_deref(),
            IssueField::ExpectedBehavior => self.expected_behavior.as_deref(),
            IssueField::ActualBehavior => self.actual_behavior.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_fields_always_present() {
        let post = PostData::default();
        assert_eq!(post.field(PostField::Title), Some(""));
        assert_eq!(post.field(PostField::Content), Some(""));
    }

    #[test]
    fn test_issue_fields_optional() {
        let issue = IssueFeatures {
            operation: Some("Turn on the switch".into()),
            ..Default::default()
        };
        assert_eq!(issue.field(IssueField::Operation), Some("Turn on the switch"));
        assert_eq!(issue.field(IssueField::Phenomenon), None);
    }

    #[test]
    fn test_issue_deserializes_with_missing_fields() {
        let issue: IssueFeatures =
            serde_json::from_str(r#"{"operation":"Turn off the switch"}"#).unwrap();
        assert_eq!(issue.operation.as_deref(), Some("Turn off the switch"));
        assert!(issue.actual_behavior.is_none());
    }
}
