//! Completion gateway trait.
//!
//! The controller only ever sees "system payload plus recent window in,
//! reply text or error out". The HTTP shape, endpoint, model name, and
//! credentials all live behind the trait in botweave-infra.

use botweave_types::chat::Message;
use botweave_types::gateway::GatewayError;

/// Upstream chat-completion boundary.
pub trait CompletionGateway: Send + Sync {
    /// Request one completion for the composed context.
    ///
    /// `recent` is the truncated history window, oldest first; the
    /// implementation prepends the system payload as the first message.
    fn complete(
        &self,
        system: &str,
        recent: &[Message],
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;
}
