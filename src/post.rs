use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::transport::error_field;

/// Server-assigned post identity. Numeric and string ids are both accepted and
/// kept as their textual form.
#[derive(Hash, Clone, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        PostId(id.to_owned())
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        PostId(id)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        PostId(id.to_string())
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => PostId(text),
            RawId::Number(number) => PostId(number.to_string()),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub likes: u64,
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Body of create and update requests.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: String,
}

/// List parameters, sent verbatim. Empty strings leave the choice to the server.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostFilter {
    pub category: String,
    pub sort: String,
    pub direction: String,
}

impl PostFilter {
    pub fn query(&self) -> [(&str, &str); 3] {
        [
            ("category", self.category.as_str()),
            ("sort", self.sort.as_str()),
            ("direction", self.direction.as_str()),
        ]
    }
}

/// What a list or search endpoint answered with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostListing {
    Posts(Vec<Post>),
    Error(String),
}

impl PostListing {
    /// Accepts `{posts: [...]}`, a bare array, or `{error}`.
    pub fn parse(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;

        if let Some(message) = error_field(&value) {
            return Ok(PostListing::Error(message));
        }

        let posts = match value {
            Value::Array(posts) => Value::Array(posts),
            Value::Object(mut fields) => match fields.remove("posts") {
                Some(posts @ Value::Array(_)) => posts,
                _ => return Err(ClientError::Malformed("expected a list of posts".into())),
            },
            _ => return Err(ClientError::Malformed("expected a list of posts".into())),
        };

        Ok(PostListing::Posts(serde_json::from_value(posts)?))
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct LikeReceipt {
    #[serde(default)]
    pub likes: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_accept_numbers_and_strings() {
        let post: Post = serde_json::from_str(r#"{"id": 42, "title": "t"}"#).unwrap();
        assert_eq!(post.id, PostId::from(42));

        let post: Post = serde_json::from_str(r#"{"id": "abc", "likes": null}"#).unwrap();
        assert_eq!(post.id.as_str(), "abc");
        assert_eq!(post.likes, 0);
        assert_eq!(post.author, None);
    }

    #[test]
    fn listing_shapes() {
        let wrapped = PostListing::parse(r#"{"posts": [{"id": 1}, {"id": 2}]}"#).unwrap();
        let bare = PostListing::parse(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(wrapped, bare);

        assert_eq!(
            PostListing::parse(r#"{"error": "no matches"}"#).unwrap(),
            PostListing::Error("no matches".into())
        );
    }

    #[test]
    fn listing_rejects_other_shapes() {
        assert!(matches!(
            PostListing::parse(r#"{"items": []}"#),
            Err(ClientError::Malformed(_))
        ));
        assert!(matches!(
            PostListing::parse("12"),
            Err(ClientError::Malformed(_))
        ));
        assert!(matches!(PostListing::parse("oops"), Err(ClientError::Json(_))));
    }
}
