//! Agent router and general query handler.
//!
//! Maps a classified intent to an agent, builds the agent payload, invokes
//! the agent under a deadline and turns every error, timeout or panic into
//! an [`AgentResult::Failure`]. Requests no agent can take go to the
//! [`GeneralQueryHandler`].

use crate::registry::{AgentRegistry, RegisteredAgent};
use demeter_domain::intent::keywords::mentions_help;
use demeter_domain::{
    AgentKind, AgentPayload, AgentResult, ClassifiedIntent, Context, ExtractedParameters,
    FailureKind, Intent, is_present,
};
use futures::FutureExt;
use serde_json::{Value, json};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Canonical key ← alternative spellings, applied to crop payloads
const CROP_SYNONYMS: &[(&str, &[&str])] = &[
    ("N", &["nitrogen"]),
    ("P", &["phosphorus"]),
    ("K", &["potassium"]),
    ("temperature", &["temp"]),
    ("ph", &["pH"]),
];

/// Example requests offered when a query cannot be routed
pub const EXAMPLE_QUERIES: &[&str] = &[
    "What crop should I plant in sandy soil with pH 6.5?",
    "Predict rice prices for this season",
    "What are the weather risks for my crop near Nashik?",
    "What pest is eating my tomato leaves?",
    "Which government schemes can I get for 2 acres?",
];

/// Outcome of routing one request
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    pub result: AgentResult,
    /// Agent that produced `result`; `None` for handler answers and failures
    pub agent_used: Option<AgentKind>,
    /// The general handler took the request
    pub via_general_handler: bool,
}

/// Merge extracted parameters into caller context without overwriting it.
pub fn merge_parameters(parameters: &ExtractedParameters, context: &Context) -> Context {
    let mut merged = context.clone();
    for (key, value) in parameters.iter() {
        if !merged.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Populate the canonical crop feature keys from whichever spelling is present.
///
/// `rain` and `rainfall` both end up present if either is.
pub fn normalize_crop_context(context: &mut Context) {
    for (canonical, alternatives) in CROP_SYNONYMS {
        if context.contains_key(*canonical) {
            continue;
        }
        if let Some(value) = alternatives.iter().find_map(|alt| context.get(*alt)).cloned() {
            context.insert(canonical.to_string(), value);
        }
    }

    match (context.get("rain").cloned(), context.get("rainfall").cloned()) {
        (Some(rain), None) => {
            context.insert("rainfall".to_string(), rain);
        }
        (None, Some(rainfall)) => {
            context.insert("rain".to_string(), rainfall);
        }
        _ => {}
    }
}

pub struct AgentRouter {
    registry: Arc<AgentRegistry>,
    general: GeneralQueryHandler,
    agent_timeout: Duration,
    min_route_confidence: f64,
}

impl AgentRouter {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self {
            general: GeneralQueryHandler::new(registry.clone()),
            registry,
            agent_timeout: Duration::from_secs(30),
            min_route_confidence: 0.1,
        }
    }

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_min_route_confidence(mut self, confidence: f64) -> Self {
        self.min_route_confidence = confidence;
        self
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Route a classified request and return the agent's result.
    ///
    /// `crop_recommendation` always goes to the crop agent, whatever the
    /// confidence. Never propagates an agent failure.
    pub async fn route(
        &self,
        classified: ClassifiedIntent,
        text: &str,
        parameters: &ExtractedParameters,
        context: &Context,
    ) -> RouteOutcome {
        let target = match AgentKind::for_intent(classified.intent) {
            Some(AgentKind::Crop) => Some(AgentKind::Crop),
            Some(_) if classified.confidence < self.min_route_confidence => {
                debug!(
                    intent = %classified.intent,
                    confidence = classified.confidence,
                    "Confidence below routing floor"
                );
                None
            }
            other => other,
        };

        match target.and_then(|kind| self.registry.get(kind)) {
            Some(registered) => self.dispatch(registered, text, parameters, context).await,
            None => {
                info!(intent = %classified.intent, "No agent for request, using general handler");
                self.general.handle(text, parameters, context, self).await
            }
        }
    }

    /// Build the payload for `registered` and invoke it.
    async fn dispatch(
        &self,
        registered: &RegisteredAgent,
        text: &str,
        parameters: &ExtractedParameters,
        context: &Context,
    ) -> RouteOutcome {
        let kind = registered.agent.kind();
        let mut merged = merge_parameters(parameters, context);
        if kind == AgentKind::Crop {
            normalize_crop_context(&mut merged);
        }
        let payload = AgentPayload::new(text, merged);
        let result = self.invoke(registered, text, &payload).await;
        let agent_used = match &result {
            AgentResult::Failure {
                error: FailureKind::AgentInvocation | FailureKind::Timeout,
                ..
            } => None,
            _ => Some(kind),
        };
        RouteOutcome {
            result,
            agent_used,
            via_general_handler: false,
        }
    }

    /// Call the agent with a deadline, converting errors and panics.
    async fn invoke(
        &self,
        registered: &RegisteredAgent,
        text: &str,
        payload: &AgentPayload,
    ) -> AgentResult {
        let agent = &registered.agent;
        let kind = agent.kind();
        let call = async {
            if registered.capabilities.process_query {
                agent.process_query(text, payload).await
            } else {
                agent.predict(payload).await
            }
        };
        let guarded = AssertUnwindSafe(call).catch_unwind();

        match tokio::time::timeout(self.agent_timeout, guarded).await {
            Ok(Ok(Ok(result))) => {
                debug!(agent = %kind, success = result.is_success(), "Agent answered");
                result
            }
            Ok(Ok(Err(e))) => {
                warn!(agent = %kind, "Agent failed: {}", e);
                AgentResult::failure(FailureKind::AgentInvocation, format!("{} agent: {}", kind, e))
            }
            Ok(Err(panic)) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(agent = %kind, "Agent panicked: {}", reason);
                AgentResult::failure(
                    FailureKind::AgentInvocation,
                    format!("{} agent panicked: {}", kind, reason),
                )
            }
            Err(_) => {
                warn!(agent = %kind, timeout = ?self.agent_timeout, "Agent timed out");
                AgentResult::failure(
                    FailureKind::Timeout,
                    format!("{} agent did not answer within {:?}", kind, self.agent_timeout),
                )
            }
        }
    }
}

/// Answers requests that no agent takes.
///
/// Help requests get a capability listing; a request naming a crop is
/// retried through the crop agent; anything else gets example
/// reformulations. Listings and refusals are reported with `success: false`.
pub struct GeneralQueryHandler {
    registry: Arc<AgentRegistry>,
}

impl GeneralQueryHandler {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }

    async fn handle(
        &self,
        text: &str,
        parameters: &ExtractedParameters,
        context: &Context,
        router: &AgentRouter,
    ) -> RouteOutcome {
        if mentions_help(text) {
            return self.own_answer(self.capability_listing());
        }

        let crop_agent = mentioned_crop(parameters).and_then(|crop| {
            self.registry
                .get(AgentKind::Crop)
                .map(|registered| (crop, registered))
        });
        match crop_agent {
            Some((crop, registered)) => {
                info!(crop = %crop, "Retrying unroutable request through the crop agent");
                let mut outcome = router.dispatch(registered, text, parameters, context).await;
                outcome.via_general_handler = true;
                outcome
            }
            None => self.own_answer(not_understood()),
        }
    }

    fn own_answer(&self, result: AgentResult) -> RouteOutcome {
        RouteOutcome {
            result,
            agent_used: None,
            via_general_handler: true,
        }
    }

    fn capability_listing(&self) -> AgentResult {
        let capabilities: Vec<Value> = self
            .registry
            .kinds()
            .into_iter()
            .map(|kind| json!({"agent": kind.as_str(), "description": kind.description()}))
            .collect();
        let mut message = String::from("I can help you with:");
        for kind in self.registry.kinds() {
            message.push_str(&format!("\n- {}", capitalize(kind.description())));
        }
        message.push_str("\n\nTry asking, for example:");
        for example in EXAMPLE_QUERIES {
            message.push_str(&format!("\n- {}", example));
        }

        AgentResult::failure(FailureKind::HelpRequested, "capability listing requested")
            .with_field("capabilities", capabilities)
            .with_field("suggestions", EXAMPLE_QUERIES.to_vec())
            .with_message(message)
    }
}

fn mentioned_crop(parameters: &ExtractedParameters) -> Option<String> {
    ["crop", "crop_type"]
        .iter()
        .find(|key| is_present(parameters.get(key)))
        .and_then(|key| parameters.text(key))
        .map(str::to_string)
}

fn not_understood() -> AgentResult {
    let mut message = String::from(
        "I could not understand your question. Please ask about crops, market prices, farming risks, pests or finance. For example:",
    );
    for example in EXAMPLE_QUERIES {
        message.push_str(&format!("\n- {}", example));
    }
    AgentResult::failure(FailureKind::NotUnderstood, "no agent matched the request")
        .with_field("suggestions", EXAMPLE_QUERIES.to_vec())
        .with_message(message)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
