use anyhow::Result;
use async_trait::async_trait;
use shared::{
    format_count, EndpointError, PostId, VoteDirection, VoteEndpoint, VoteRequest, VoteResponse,
    STATUS_SUCCESS,
};
use thiserror::Error;

pub mod api;
pub mod util;

/// Sends a vote to the server and decodes its answer.
#[async_trait(?Send)]
pub trait VoteTransport {
    async fn post_vote(&self, url: &str, request: &VoteRequest) -> Result<VoteResponse>;
}

/// Place on the page where the count of a post is shown.
pub trait CountDisplay {
    fn show(&self, post: &PostId, markup: &str);
}

/// What a click on a vote control asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteClick {
    pub post: PostId,
    pub direction: VoteDirection,
    pub post_url: Option<String>,
}

#[derive(Error, Debug)]
pub enum VoteError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("Request to {url} failed: {reason:#}")]
    Transport { url: String, reason: anyhow::Error },

    #[error("Server answered with status {status:?}")]
    Rejected { status: String },

    #[error("Server reported success without a vote count")]
    MissingCount,
}

#[derive(Debug)]
pub enum VoteOutcome {
    Updated { post: PostId, count: i64 },
    Ignored { post: PostId, reason: VoteError },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdapterConfig {
    pub endpoint: VoteEndpoint,
}

impl AdapterConfig {
    /// Reads the `data-vote-endpoint` and `data-vote-root` values of the page.
    /// Unknown modes fall back to fixed endpoints.
    pub fn from_attributes(mode: Option<&str>, root: Option<&str>) -> Self {
        let endpoint = match mode.map(str::trim) {
            Some("per-post") => VoteEndpoint::PerPost,
            _ => VoteEndpoint::Fixed {
                root: root.unwrap_or_default().trim().to_string(),
            },
        };

        Self { endpoint }
    }
}

pub struct VoteAdapter<T, D> {
    config: AdapterConfig,
    transport: T,
    display: D,
}

impl<T: VoteTransport, D: CountDisplay> VoteAdapter<T, D> {
    pub fn new(config: AdapterConfig, transport: T, display: D) -> Self {
        Self {
            config,
            transport,
            display,
        }
    }

    /// Runs one vote to completion. Every failure ends up in the outcome,
    /// the page is only touched on success.
    pub async fn vote(&self, click: VoteClick) -> VoteOutcome {
        let post = click.post.clone();

        match self.try_vote(click).await {
            Ok(count) => {
                self.display.show(&post, &format_count(count));
                VoteOutcome::Updated { post, count }
            }
            Err(reason) => VoteOutcome::Ignored { post, reason },
        }
    }

    async fn try_vote(&self, click: VoteClick) -> Result<i64, VoteError> {
        let url = self
            .config
            .endpoint
            .url_for(&click.post, click.direction, click.post_url.as_deref())?;

        let request = VoteRequest { postid: click.post };

        let response = match self.transport.post_vote(&url, &request).await {
            Ok(v) => v,
            Err(reason) => return Err(VoteError::Transport { url, reason }),
        };

        if response.status != STATUS_SUCCESS {
            return Err(VoteError::Rejected { status: response.status });
        }

        response.upvotes.ok_or(VoteError::MissingCount)
    }
}
