//! Response bodies and error mapping.
//!
//! Every body carries `status`: `"success"` or `"fail"`. Policy rejections
//! (daily cap, cooldown) answer 200; every other failure answers 400.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::faucet::FaucetError;
use crate::node::Coin;

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub status: &'static str,
    pub address: String,
    pub chain: String,
    pub balance: Vec<Coin>,
}

#[derive(Debug, Serialize)]
pub struct RequestResponse {
    pub status: &'static str,
    pub address: String,
    pub chain: String,
    pub amount: String,
    pub hash: String,
}

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub status: &'static str,
    pub message: String,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "fail",
            message: message.into(),
        }
    }
}

pub fn status_for(err: &FaucetError) -> StatusCode {
    if err.is_policy_rejection() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for FaucetError {
    fn into_response(self) -> Response {
        (status_for(&self), Json(FailureResponse::new(self.to_string()))).into_response()
    }
}
