use std::fmt::{Display, Formatter};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const STATUS_SUCCESS: &str = "success";

/// Identifier of the post a vote control belongs to.
///
/// Clients send it either as a string or as a bare integer, both map to the
/// same id. It is always serialized back as a string.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Deserialize::deserialize(deserializer)? {
            Value::String(s) if !s.is_empty() => PostId(s),
            Value::Number(num) if num.is_i64() || num.is_u64() => PostId(num.to_string()),
            _ => return Err(de::Error::custom("Wrong type, expected post id")),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Path segment of the endpoint handling this direction.
    pub fn segment(&self) -> &'static str {
        match self {
            VoteDirection::Up => "upvote",
            VoteDirection::Down => "downvote",
        }
    }

    pub fn delta(&self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

impl Display for VoteDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.segment())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VoteRequest {
    pub postid: PostId,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VoteResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<i64>,
}

impl VoteResponse {
    pub fn success(upvotes: i64) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            upvotes: Some(upvotes),
        }
    }

    pub fn failure(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            upvotes: None,
        }
    }

    /// The new count, only when the server reported success.
    pub fn success_count(&self) -> Option<i64> {
        if self.status == STATUS_SUCCESS {
            self.upvotes
        } else {
            None
        }
    }
}

/// Markup placed inside the count element of a post.
pub fn format_count(count: i64) -> String {
    format!("&nbsp;<strong>{count}</strong>&nbsp;")
}

#[derive(Error, Debug, PartialEq)]
pub enum EndpointError {
    #[error("Vote control for post {0} has no post url")]
    MissingPostUrl(PostId),
}

/// Where a vote for a post is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteEndpoint {
    /// `{root}/upvote` and `{root}/downvote`, shared by every post.
    Fixed { root: String },
    /// `{post_url}/upvote`, with the base url taken from each control.
    PerPost,
}

impl Default for VoteEndpoint {
    fn default() -> Self {
        VoteEndpoint::Fixed { root: String::new() }
    }
}

impl VoteEndpoint {
    pub fn url_for(
        &self,
        post: &PostId,
        direction: VoteDirection,
        post_url: Option<&str>,
    ) -> Result<String, EndpointError> {
        let base = match self {
            VoteEndpoint::Fixed { root } => root.as_str(),
            VoteEndpoint::PerPost => {
                post_url.ok_or_else(|| EndpointError::MissingPostUrl(post.clone()))?
            }
        };

        Ok(format!("{}/{}", base.trim_end_matches('/'), direction.segment()))
    }
}
