//! Internal hook dispatch for the run loop.
//!
//! [`HookPair`] bundles the run-level [`RunHooks`] with the optional
//! per-agent [`AgentHooks`] so the [`Runner`](super::Runner) can fire both
//! with a single call at each lifecycle point. Run-level hooks receive the
//! agent name explicitly; agent-level hooks are already bound to one agent.

use serde_json::Value;

use crate::callback::{AgentHooks, RunContext, RunHooks};
use crate::chat::ChatResponse;
use crate::error::Error;
use crate::message::Message;

/// Dispatches lifecycle events to both hook layers in order:
/// run-level first, then agent-level (if present).
pub(crate) struct HookPair<'a> {
    run: &'a dyn RunHooks,
    agent: Option<&'a dyn AgentHooks>,
    agent_name: &'a str,
}

impl<'a> HookPair<'a> {
    pub(crate) fn new(
        run: &'a dyn RunHooks,
        agent: Option<&'a dyn AgentHooks>,
        agent_name: &'a str,
    ) -> Self {
        Self {
            run,
            agent,
            agent_name,
        }
    }

    pub(crate) async fn agent_start(&self, ctx: &RunContext) {
        self.run.on_agent_start(ctx, self.agent_name).await;
        if let Some(hooks) = self.agent {
            hooks.on_start(ctx).await;
        }
    }

    pub(crate) async fn agent_end(&self, ctx: &RunContext, output: &Value) {
        self.run.on_agent_end(ctx, self.agent_name, output).await;
        if let Some(hooks) = self.agent {
            hooks.on_end(ctx, output).await;
        }
    }

    pub(crate) async fn llm_start(
        &self,
        ctx: &RunContext,
        system_prompt: Option<&str>,
        messages: &[Message],
    ) {
        self.run
            .on_llm_start(ctx, self.agent_name, system_prompt, messages)
            .await;
        if let Some(hooks) = self.agent {
            hooks.on_llm_start(ctx, system_prompt, messages).await;
        }
    }

    pub(crate) async fn llm_end(&self, ctx: &RunContext, response: &ChatResponse) {
        self.run.on_llm_end(ctx, self.agent_name, response).await;
        if let Some(hooks) = self.agent {
            hooks.on_llm_end(ctx, response).await;
        }
    }

    pub(crate) async fn tool_start(&self, ctx: &RunContext, tool_name: &str) {
        self.run
            .on_tool_start(ctx, self.agent_name, tool_name)
            .await;
        if let Some(hooks) = self.agent {
            hooks.on_tool_start(ctx, tool_name).await;
        }
    }

    pub(crate) async fn tool_end(&self, ctx: &RunContext, tool_name: &str, result: &str) {
        self.run
            .on_tool_end(ctx, self.agent_name, tool_name, result)
            .await;
        if let Some(hooks) = self.agent {
            hooks.on_tool_end(ctx, tool_name, result).await;
        }
    }

    pub(crate) async fn error(&self, ctx: &RunContext, error: &Error) {
        self.run.on_error(ctx, self.agent_name, error).await;
        if let Some(hooks) = self.agent {
            hooks.on_error(ctx, error).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::callback::NoopRunHooks;
    use crate::message::Message;

    /// Counts every event it receives, regardless of kind.
    #[derive(Debug, Default)]
    struct CountingRunHooks {
        count: AtomicUsize,
    }

    #[async_trait]
    impl RunHooks for CountingRunHooks {
        async fn on_agent_start(&self, _ctx: &RunContext, _agent_name: &str) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }

        async fn on_tool_start(&self, _ctx: &RunContext, _agent_name: &str, _tool_name: &str) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug, Default)]
    struct CountingAgentHooks {
        count: AtomicUsize,
    }

    #[async_trait]
    impl AgentHooks for CountingAgentHooks {
        async fn on_start(&self, _ctx: &RunContext) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }

        async fn on_tool_start(&self, _ctx: &RunContext, _tool_name: &str) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn dispatches_to_both_layers() {
        let run_hooks = CountingRunHooks::default();
        let agent_hooks = CountingAgentHooks::default();
        let pair = HookPair::new(&run_hooks, Some(&agent_hooks), "tester");
        let ctx = RunContext::new();

        pair.agent_start(&ctx).await;
        pair.tool_start(&ctx, "calculator").await;

        assert_eq!(run_hooks.count.load(Ordering::SeqCst), 2);
        assert_eq!(agent_hooks.count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn agent_layer_is_optional() {
        let run_hooks = CountingRunHooks::default();
        let pair = HookPair::new(&run_hooks, None, "tester");
        let ctx = RunContext::new();

        pair.agent_start(&ctx).await;

        assert_eq!(run_hooks.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_events_fire_without_panic() {
        let pair = HookPair::new(&NoopRunHooks, None, "tester");
        let ctx = RunContext::new();
        let output = serde_json::json!({"done": true});
        let response = ChatResponse::new(Message::assistant("ok"));
        let messages = vec![Message::user("hi")];
        let error = Error::agent("boom");

        pair.agent_start(&ctx).await;
        pair.llm_start(&ctx, Some("sys"), &messages).await;
        pair.llm_end(&ctx, &response).await;
        pair.tool_start(&ctx, "t").await;
        pair.tool_end(&ctx, "t", "ok").await;
        pair.agent_end(&ctx, &output).await;
        pair.error(&ctx, &error).await;
    }
}
