use async_trait::async_trait;

use anyhow::Result;

/// An outbound message, ready for whatever transport delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Outbound email delivery. Fire-and-forget from the caller's point of
/// view: no retries, and a failure must fail the operation that asked
/// for the send.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<()>;
}
