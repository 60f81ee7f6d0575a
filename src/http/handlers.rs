//! Handlers for the public faucet endpoints.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::faucet::FaucetError;
use crate::http::request::request_id;
use crate::http::response::{BalanceResponse, FailureResponse, RequestResponse};
use crate::http::server::AppState;
use crate::observability::metrics;

/// `?address=<addr>&chain=<name>`
#[derive(Debug, Default, Deserialize)]
pub struct FaucetQuery {
    pub address: Option<String>,
    pub chain: Option<String>,
}

impl FaucetQuery {
    /// Both parameters, present and non-empty.
    fn required(self) -> Result<(String, String), FaucetError> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (present(self.address), present(self.chain)) {
            (Some(address), Some(chain)) => Ok((address, chain)),
            _ => Err(FaucetError::MissingParameters),
        }
    }
}

fn failure(endpoint: &'static str, err: FaucetError) -> Response {
    let outcome = if err.is_policy_rejection() { "rejected" } else { "fail" };
    metrics::record_request(endpoint, outcome);
    err.into_response()
}

/// `GET /balance`
pub async fn get_balance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FaucetQuery>,
) -> Response {
    let (address, chain) = match query.required() {
        Ok(params) => params,
        Err(e) => return failure("balance", e),
    };
    tracing::debug!(request_id = %request_id(&headers), address = %address, chain = %chain, "Balance request");

    match state.faucet.query_balance(&address, &chain).await {
        Ok(balance) => {
            metrics::record_request("balance", "success");
            Json(BalanceResponse {
                status: "success",
                address,
                chain,
                balance,
            })
            .into_response()
        }
        Err(e) => {
            tracing::info!(request_id = %request_id(&headers), chain = %chain, error = %e, "Balance request failed");
            failure("balance", e)
        }
    }
}

/// `GET /request`
pub async fn request_tokens(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<FaucetQuery>,
) -> Response {
    let (address, chain) = match query.required() {
        Ok(params) => params,
        Err(e) => return failure("request", e),
    };
    tracing::debug!(request_id = %request_id(&headers), address = %address, chain = %chain, "Token request");

    // Detached so a client disconnect or the timeout layer cannot cancel the
    // flow between admission and rollback.
    let faucet = state.faucet.clone();
    let (addr, net) = (address.clone(), chain.clone());
    let outcome = tokio::spawn(async move { faucet.request_tokens(&addr, &net).await }).await;

    match outcome {
        Ok(Ok(sent)) => {
            metrics::record_request("request", "success");
            Json(RequestResponse {
                status: "success",
                address,
                chain,
                amount: sent.amount,
                hash: sent.tx_hash,
            })
            .into_response()
        }
        Ok(Err(e)) => failure("request", e),
        Err(e) => {
            tracing::error!(request_id = %request_id(&headers), error = %e, "Token request task failed");
            metrics::record_request("request", "fail");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FailureResponse::new("Error: internal error")),
            )
                .into_response()
        }
    }
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
