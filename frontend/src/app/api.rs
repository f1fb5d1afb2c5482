use anyhow::Result;
use async_trait::async_trait;

use gloo_net::http::Request;
use shared::{VoteRequest, VoteResponse};

use crate::app::VoteTransport;

const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

pub struct BackendApi {}

#[async_trait(?Send)]
impl VoteTransport for BackendApi {
    async fn post_vote(&self, url: &str, request: &VoteRequest) -> Result<VoteResponse> {
        let resp = Request::post(url)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .body(serde_json::to_string(request)?)?
            .send()
            .await?;

        Ok(resp.json::<VoteResponse>().await?)
    }
}
