use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    claim::{
        error::{ClaimError, api_error, transport_error},
        types::ClaimReply,
    },
    config::ClaimConfig,
};

/// One claim attempt against the remote endpoint. The reqwest
/// implementation is the production transport; tests substitute scripted
/// implementations.
#[async_trait]
pub trait ClaimApi: Send + Sync {
    async fn claim_points(&self, identity: &str) -> Result<ClaimReply, ClaimError>;
}

pub struct HttpClaimApi {
    client: Client,
    endpoint: String,
    origin: String,
    user_agent: String,
    cookie: String,
    timeout: Duration,
}

impl HttpClaimApi {
    pub fn new(config: &ClaimConfig, cookie: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            origin: config.origin.clone(),
            user_agent: config.user_agent.clone(),
            cookie,
            timeout: Duration::from_millis(config.request_timeout_ms),
        }
    }
}

#[async_trait]
impl ClaimApi for HttpClaimApi {
    async fn claim_points(&self, identity: &str) -> Result<ClaimReply, ClaimError> {
        let request_id = Uuid::now_v7().to_string();
        // tRPC batch envelope: one call keyed "0".
        let body = json!({ "0": { "json": { "username": identity } } });

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header(header::CONTENT_TYPE, "application/json")
            .header("Trpc-Accept", "application/json")
            .header("X-Trpc-Source", "nextjs-react")
            .header(header::ORIGIN, &self.origin)
            .header(header::REFERER, format!("{}/boost/{}", self.origin, identity))
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::COOKIE, &self.cookie)
            .header("x-request-id", &request_id)
            .json(&body)
            .send()
            .await
            .map_err(|err| transport_error(format!("claim request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_message(&body).unwrap_or_default();
            tracing::debug!(
                target: "claim",
                identity = %identity,
                request_id = %request_id,
                status = status.as_u16(),
                rejection = %message,
                "claim_attempt_rejected"
            );
            return Err(api_error(message).with_http_status(status.as_u16()));
        }

        let payload = match response.json::<Value>().await {
            Ok(payload) => payload,
            Err(err) => {
                // A 2xx with an undecodable body classifies as an
                // unrecognized reply, not a transport failure.
                tracing::debug!(
                    target: "claim",
                    identity = %identity,
                    request_id = %request_id,
                    error = %err,
                    "claim_reply_undecodable"
                );
                return Ok(ClaimReply::default());
            }
        };

        let reply = parse_claim_reply(&payload);
        tracing::debug!(
            target: "claim",
            identity = %identity,
            request_id = %request_id,
            success = reply.success,
            claimed_points = reply.claimed_points,
            "claim_attempt_answered"
        );
        Ok(reply)
    }
}

/// Success-path envelope: an array whose first element carries
/// `result.data.json`. Missing pieces degrade to the default reply.
fn parse_claim_reply(payload: &Value) -> ClaimReply {
    let Some(data) = payload
        .get(0)
        .and_then(|entry| entry.get("result"))
        .and_then(|result| result.get("data"))
        .and_then(|data| data.get("json"))
    else {
        return ClaimReply::default();
    };

    ClaimReply {
        success: data.get("success").and_then(Value::as_bool).unwrap_or(false),
        message: data
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        claimed_points: data
            .get("onboarding")
            .and_then(|onboarding| onboarding.get("points"))
            .and_then(Value::as_u64)
            .unwrap_or(0),
        total_points: data
            .get("userPoints")
            .and_then(|user_points| user_points.get("points"))
            .and_then(Value::as_u64)
            .unwrap_or(0),
    }
}

/// Error-path envelope: an array whose first element carries
/// `error.json.message`.
fn parse_error_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;
    payload
        .get(0)?
        .get("error")?
        .get("json")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
