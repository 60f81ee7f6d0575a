//! Error taxonomy of the faucet.

use thiserror::Error;

use crate::node::NodeError;

#[derive(Debug, Error)]
pub enum FaucetError {
    /// `address` or `chain` missing from the query string.
    #[error("Error: address or chain_id not specified")]
    MissingParameters,

    #[error("Error: invalid chain; specify {}", .valid.join(" or "))]
    UnknownNetwork { chain: String, valid: Vec<String> },

    #[error("Error: invalid address")]
    InvalidAddress(String),

    #[error("The daily cap for this faucet has been reached")]
    DailyCapReached,

    #[error(
        "Tokens will only be sent out once every {window_hours} hours for the same testnet, please try again in {wait}"
    )]
    CooldownActive { wait: String, window_hours: u64 },

    /// The broadcast failed; both limits were rolled back.
    #[error("{0}")]
    TransferFailed(String),

    /// Validation or balance call failed for a reason other than a bad address.
    #[error("{0}")]
    Adapter(NodeError),
}

impl FaucetError {
    /// Policy rejections are ordinary answers, not request errors.
    pub fn is_policy_rejection(&self) -> bool {
        matches!(
            self,
            FaucetError::DailyCapReached | FaucetError::CooldownActive { .. }
        )
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FaucetError::MissingParameters => "missing_parameters",
            FaucetError::UnknownNetwork { .. } => "unknown_network",
            FaucetError::InvalidAddress(_) => "invalid_address",
            FaucetError::DailyCapReached => "daily_cap",
            FaucetError::CooldownActive { .. } => "cooldown",
            FaucetError::TransferFailed(_) => "transfer_failed",
            FaucetError::Adapter(_) => "adapter",
        }
    }
}

impl From<NodeError> for FaucetError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::InvalidAddress(detail) => FaucetError::InvalidAddress(detail),
            other => FaucetError::Adapter(other),
        }
    }
}

pub type FaucetResult<T> = Result<T, FaucetError>;
