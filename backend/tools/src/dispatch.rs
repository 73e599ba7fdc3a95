//! Dispatch a resolved task to the remote tool-execution client, or to the
//! local fallback generator when no client is configured.
//!
//! The remote call is timeout-bounded here; retry and backoff, if any,
//! belong to the collaborator behind the [`ToolClient`] trait.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use parley_core::{ParleyError, ToolClient};
use parley_routing::{KeywordRouter, RoutingDecision};

use crate::fallback::FallbackResponder;

/// Default bound on one remote tool invocation.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(15);

pub struct ToolDispatch {
    router: KeywordRouter,
    client: Option<Arc<dyn ToolClient>>,
    fallback: FallbackResponder,
    timeout: Duration,
}

impl ToolDispatch {
    pub fn new(client: Option<Arc<dyn ToolClient>>, timeout: Duration) -> Self {
        Self {
            router: KeywordRouter::new(),
            client,
            fallback: FallbackResponder::new(),
            timeout,
        }
    }

    /// Dispatch without a remote client — every answer comes from the local
    /// fallback generator.
    pub fn local_only() -> Self {
        Self::new(None, DEFAULT_TOOL_TIMEOUT)
    }

    /// Route `query` to its tool family and produce an answer.
    ///
    /// A remote failure or timeout propagates as a typed error for the
    /// caller to surface; it is never retried here.
    pub async fn execute(&self, query: &str) -> Result<(RoutingDecision, String), ParleyError> {
        let decision = self.router.route(query);

        let Some(client) = &self.client else {
            let text = self.fallback.respond(decision.kind, query);
            return Ok((decision, text));
        };

        info!(tool = %decision.tool_name, client = %client.name(), "Invoking tool client");
        match tokio::time::timeout(self.timeout, client.invoke(query)).await {
            Ok(Ok(text)) => Ok((decision, text)),
            Ok(Err(err)) => {
                warn!(tool = %decision.tool_name, error = %err, "Tool invocation failed");
                Err(err)
            }
            Err(_elapsed) => Err(ParleyError::ToolTimeout {
                tool: decision.tool_name.clone(),
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_routing::QueryKind;

    struct EchoClient;

    #[async_trait]
    impl ToolClient for EchoClient {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(&self, query: &str) -> Result<String, ParleyError> {
            Ok(format!("echo: {query}"))
        }
    }

    struct StuckClient;

    #[async_trait]
    impl ToolClient for StuckClient {
        fn name(&self) -> &str {
            "stuck"
        }

        async fn invoke(&self, _query: &str) -> Result<String, ParleyError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(String::new())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl ToolClient for FailingClient {
        fn name(&self) -> &str {
            "failing"
        }

        async fn invoke(&self, _query: &str) -> Result<String, ParleyError> {
            Err(ParleyError::Tool {
                tool: "failing".to_string(),
                message: "remote exploded".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn local_only_answers_from_fallback() {
        let dispatch = ToolDispatch::local_only();
        let (decision, text) = dispatch.execute("add a note about lunch").await.unwrap();
        assert_eq!(decision.kind, QueryKind::StickyNotes);
        assert!(text.contains("lunch"));
    }

    #[tokio::test]
    async fn remote_client_answer_passes_through() {
        let dispatch = ToolDispatch::new(Some(Arc::new(EchoClient)), DEFAULT_TOOL_TIMEOUT);
        let (_, text) = dispatch.execute("hello there").await.unwrap();
        assert_eq!(text, "echo: hello there");
    }

    #[tokio::test]
    async fn slow_client_maps_to_timeout_error() {
        let dispatch = ToolDispatch::new(Some(Arc::new(StuckClient)), Duration::from_millis(30));
        let err = dispatch.execute("anything").await.unwrap_err();
        assert!(matches!(err, ParleyError::ToolTimeout { .. }));
    }

    #[tokio::test]
    async fn client_error_propagates_untouched() {
        let dispatch = ToolDispatch::new(Some(Arc::new(FailingClient)), DEFAULT_TOOL_TIMEOUT);
        let err = dispatch.execute("anything").await.unwrap_err();
        assert!(matches!(err, ParleyError::Tool { .. }));
    }
}
