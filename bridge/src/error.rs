use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no {event} event found for transaction {tx}")]
    MissingLog { event: &'static str, tx: String },

    #[error("transaction {tx} does not carry a {expected} event")]
    UnexpectedEvent { expected: &'static str, tx: String },

    #[error("source chain call {method} failed: {reason}")]
    Call { method: &'static str, reason: String },
}
