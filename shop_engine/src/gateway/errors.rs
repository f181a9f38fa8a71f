use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The payment ledger could not be reached. {0}")]
    Unavailable(String),
    #[error("The payment ledger rejected our credentials. {0}")]
    Unauthorized(String),
    #[error("Could not interpret the payment ledger response. {0}")]
    InvalidResponse(String),
}
