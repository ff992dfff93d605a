//! Agent registry
//!
//! Holds the loaded agents keyed by [`AgentKind`] and records each agent's
//! optional capabilities once, at registration.

use crate::ports::agent::{Agent, AgentCapabilities};
use demeter_domain::AgentKind;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// An agent together with the capabilities resolved when it was registered
#[derive(Clone)]
pub struct RegisteredAgent {
    pub agent: Arc<dyn Agent>,
    pub capabilities: AgentCapabilities,
}

impl std::fmt::Debug for RegisteredAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredAgent")
            .field("kind", &self.agent.kind())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentKind, RegisteredAgent>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent, replacing any earlier agent of the same kind
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        let kind = agent.kind();
        let capabilities = agent.capabilities();
        debug!(
            agent = %kind,
            process_query = capabilities.process_query,
            formatter = capabilities.format_result_text,
            "Registered agent"
        );
        self.agents.insert(
            kind,
            RegisteredAgent {
                agent,
                capabilities,
            },
        );
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.register(agent);
        self
    }

    pub fn get(&self, kind: AgentKind) -> Option<&RegisteredAgent> {
        self.agents.get(&kind)
    }

    pub fn contains(&self, kind: AgentKind) -> bool {
        self.agents.contains_key(&kind)
    }

    /// Registered kinds in routing-table order
    pub fn kinds(&self) -> Vec<AgentKind> {
        self.agents.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent::AgentError;
    use async_trait::async_trait;
    use demeter_domain::{AgentPayload, AgentResult, Context};

    struct Plain(AgentKind);

    #[async_trait]
    impl Agent for Plain {
        fn kind(&self) -> AgentKind {
            self.0
        }

        async fn predict(&self, _payload: &AgentPayload) -> Result<AgentResult, AgentError> {
            Ok(AgentResult::success(Context::new()))
        }
    }

    struct Rich;

    #[async_trait]
    impl Agent for Rich {
        fn kind(&self) -> AgentKind {
            AgentKind::Crop
        }

        fn capabilities(&self) -> AgentCapabilities {
            AgentCapabilities::predict_only()
                .with_process_query()
                .with_formatter()
        }

        async fn predict(&self, _payload: &AgentPayload) -> Result<AgentResult, AgentError> {
            Ok(AgentResult::success(Context::new()))
        }
    }

    #[test]
    fn test_capabilities_resolved_at_registration() {
        let registry = AgentRegistry::new()
            .with_agent(Arc::new(Plain(AgentKind::Risk)))
            .with_agent(Arc::new(Rich));

        let crop = registry.get(AgentKind::Crop).unwrap();
        assert!(crop.capabilities.process_query);
        assert!(crop.capabilities.format_result_text);

        let risk = registry.get(AgentKind::Risk).unwrap();
        assert_eq!(risk.capabilities, AgentCapabilities::predict_only());
    }

    #[test]
    fn test_kinds_in_table_order() {
        let registry = AgentRegistry::new()
            .with_agent(Arc::new(Plain(AgentKind::Finance)))
            .with_agent(Arc::new(Plain(AgentKind::Crop)));
        assert_eq!(registry.kinds(), vec![AgentKind::Crop, AgentKind::Finance]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.contains(AgentKind::Pest));
    }

    #[test]
    fn test_empty_registry() {
        assert!(AgentRegistry::new().is_empty());
    }
}
