//! Handle Query use case
//!
//! The orchestrator: runs one query through detection, translation,
//! classification, extraction, routing, synthesis and back-translation.
//! Every stage degrades instead of failing; the only hard error is an
//! empty agent registry.

use crate::config::PipelineConfig;
use crate::ports::conversation_logger::{
    AGENT_RESULT, ConversationEvent, ConversationLogger, INTENT_CLASSIFIED, NoConversationLogger,
    QUERY_RECEIVED, RESPONSE,
};
use crate::ports::language::LanguageDetector;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::store::KeyValueStore;
use crate::registry::AgentRegistry;
use crate::use_cases::route_agent::{AgentRouter, RouteOutcome};
use crate::use_cases::synthesize::ResponseSynthesizer;
use crate::use_cases::translate::{TranslationStatus, Translator};
use demeter_domain::util::preview;
use demeter_domain::{
    ClassifierMode, Context, IntentClassifier, LanguageCode, ParameterExtractor, Query, Response,
    Stage,
};
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Answer given when no agent is registered
pub const UNAVAILABLE_ANSWER: &str =
    "The assistant is temporarily unavailable. Please try again later.";

/// Errors that abort query handling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandleQueryError {
    #[error("No agents registered")]
    NoAgents { language: LanguageCode },
}

/// Key under which a memoized response is stored
pub fn response_cache_key(text: &str, context: &Context) -> String {
    format!(
        "response:{}:{}",
        text,
        serde_json::to_string(context).unwrap_or_default()
    )
}

/// Use case for answering one farmer query
pub struct HandleQueryUseCase {
    classifier: Arc<IntentClassifier>,
    extractor: ParameterExtractor,
    detector: Arc<dyn LanguageDetector>,
    translator: Arc<Translator>,
    registry: Arc<AgentRegistry>,
    router: AgentRouter,
    synthesizer: ResponseSynthesizer,
    query_cache: Option<Arc<dyn KeyValueStore>>,
    logger: Arc<dyn ConversationLogger>,
    config: PipelineConfig,
}

impl HandleQueryUseCase {
    pub fn new(
        classifier: Arc<IntentClassifier>,
        detector: Arc<dyn LanguageDetector>,
        translator: Arc<Translator>,
        registry: Arc<AgentRegistry>,
    ) -> Self {
        let config = PipelineConfig::default();
        Self {
            router: build_router(&registry, &config),
            synthesizer: ResponseSynthesizer::new(registry.clone(), translator.clone()),
            classifier,
            extractor: ParameterExtractor::new(),
            detector,
            translator,
            registry,
            query_cache: None,
            logger: Arc::new(NoConversationLogger),
            config,
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.router = build_router(&self.registry, &config);
        self.config = config;
        self
    }

    /// Store used for response memoization
    pub fn with_query_cache(mut self, cache: Arc<dyn KeyValueStore>) -> Self {
        self.query_cache = Some(cache);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classifier_mode(&self) -> ClassifierMode {
        self.classifier.mode()
    }

    /// Answer `text` with `context`; never fails.
    ///
    /// An empty registry yields a "service unavailable" response in the
    /// caller's language.
    pub async fn handle_query(&self, text: &str, context: Context) -> Response {
        self.handle_query_with_progress(text, context, &NoProgress).await
    }

    pub async fn handle_query_with_progress(
        &self,
        text: &str,
        context: Context,
        progress: &dyn ProgressNotifier,
    ) -> Response {
        let query = Query::with_context(text, context);
        match self.execute_with_progress(&query, progress).await {
            Ok(response) => response,
            Err(HandleQueryError::NoAgents { language }) => {
                warn!("Query rejected: agent registry is empty");
                let answer = self.synthesizer.localize(UNAVAILABLE_ANSWER, &language).await;
                let response =
                    Response::unavailable(language, "no agents registered", answer.text);
                progress.on_finished();
                response
            }
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, query: &Query) -> Result<Response, HandleQueryError> {
        self.execute_with_progress(query, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        query: &Query,
        progress: &dyn ProgressNotifier,
    ) -> Result<Response, HandleQueryError> {
        let text = query.text();
        let context = query.context();

        self.logger.log(ConversationEvent::new(
            QUERY_RECEIVED,
            json!({"text": text, "context": context}),
        ));

        if let Some(cached) = self.memoized(query) {
            info!("Serving memoized response");
            self.logger
                .log(ConversationEvent::new(RESPONSE, response_event(&cached, true)));
            progress.on_finished();
            return Ok(cached);
        }

        let mut warnings = Vec::new();

        // Detect
        progress.on_stage_start(Stage::Detect);
        let (language, detect_degraded) = self.detect_language(text, &mut warnings).await;
        progress.on_stage_complete(Stage::Detect, detect_degraded);

        if self.registry.is_empty() {
            return Err(HandleQueryError::NoAgents { language });
        }

        // Translate in
        progress.on_stage_start(Stage::TranslateIn);
        let incoming = self.translator.to_working_language(text, &language).await;
        if incoming.is_degraded() {
            warnings.push(format!(
                "Query could not be translated from '{}'; it was processed as written",
                language
            ));
        }
        progress.on_stage_complete(Stage::TranslateIn, incoming.is_degraded());
        let working_text = incoming.text;

        // Classify
        progress.on_stage_start(Stage::Classify);
        let (classified, classifier_error) = self.classifier.classify_traced(&working_text, context);
        if let Some(e) = &classifier_error {
            warn!("Intent model failed, switching to keyword fallback: {}", e);
            warnings.push(format!("Intent model unavailable ({}); keyword fallback used", e));
        }
        let classify_degraded = self.classifier.mode() == ClassifierMode::Fallback;
        progress.on_stage_complete(Stage::Classify, classify_degraded);
        info!(
            intent = %classified.intent,
            confidence = classified.confidence,
            mode = self.classifier.mode().as_str(),
            "Intent classified"
        );
        self.logger.log(ConversationEvent::new(
            INTENT_CLASSIFIED,
            json!({
                "intent": classified.intent,
                "confidence": classified.confidence,
                "mode": self.classifier.mode().as_str(),
                "language": language,
            }),
        ));

        // Extract
        progress.on_stage_start(Stage::Extract);
        let parameters = self
            .extractor
            .extract(&working_text, classified.intent, context);
        debug!(count = parameters.len(), "Parameters extracted");
        progress.on_stage_complete(Stage::Extract, false);

        // Route
        progress.on_stage_start(Stage::Route);
        let outcome = self
            .router
            .route(classified, &working_text, &parameters, context)
            .await;
        if outcome.via_general_handler {
            warnings.push("No agent matched the request; answered by the general handler".to_string());
        }
        progress.on_stage_complete(Stage::Route, !outcome.result.is_success());
        self.logger
            .log(ConversationEvent::new(AGENT_RESULT, agent_event(&outcome)));

        // Synthesize + translate out
        progress.on_stage_start(Stage::Synthesize);
        let synthesized = self
            .synthesizer
            .synthesize(
                &outcome.result,
                classified.intent,
                outcome.agent_used,
                context,
                &language,
            )
            .await;
        debug!("English answer: {}", preview(&synthesized.english, 120));
        progress.on_stage_complete(Stage::Synthesize, false);

        progress.on_stage_start(Stage::TranslateOut);
        let answer = synthesized.localized;
        if answer.is_degraded() {
            warnings.push(format!(
                "Answer could not be translated to '{}'; returned in '{}'",
                language,
                self.translator.working_language()
            ));
        }
        progress.on_stage_complete(Stage::TranslateOut, answer.is_degraded());
        if matches!(answer.status, TranslationStatus::Translated) {
            debug!(language = %language, "Answer translated");
        }

        let RouteOutcome {
            result, agent_used, ..
        } = outcome;
        let response = Response {
            language,
            intent: classified.intent,
            confidence: classified.confidence,
            agent_used,
            success: result.is_success(),
            error: result.error_text(),
            result,
            answer: answer.text,
            parameters,
            warnings,
        };

        self.memoize(query, &response);
        self.logger
            .log(ConversationEvent::new(RESPONSE, response_event(&response, false)));
        progress.on_finished();

        info!(
            intent = %response.intent,
            agent = response.agent_used.map(|a| a.as_str()).unwrap_or("none"),
            success = response.success,
            "Query answered: {}",
            preview(&response.answer, 80)
        );
        Ok(response)
    }

    /// Empty the translation cache and the query cache
    pub fn clear_cache(&self) {
        self.translator.clear_cache();
        let Some(cache) = &self.query_cache else {
            return;
        };
        if let Err(e) = cache.clear() {
            warn!("Failed to clear query cache: {}", e);
        }
    }

    async fn detect_language(&self, text: &str, warnings: &mut Vec<String>) -> (LanguageCode, bool) {
        let default = self.config.default_language.clone();
        if text.trim().is_empty() {
            return (default, false);
        }
        match self.detector.detect(text).await {
            Ok(language) => {
                debug!(language = %language, "Language detected");
                (language, false)
            }
            Err(e) => {
                debug!("Language detection failed, using '{}': {}", default, e);
                warnings.push(format!(
                    "Language could not be detected; assuming '{}'",
                    default
                ));
                (default, true)
            }
        }
    }

    fn memoized(&self, query: &Query) -> Option<Response> {
        if !self.config.memoize_responses {
            return None;
        }
        let cache = self.query_cache.as_ref()?;
        let key = response_cache_key(query.text(), query.context());
        let entry = match cache.read(&key) {
            Ok(entry) => entry?,
            Err(e) => {
                warn!("Query cache read failed, treating as miss: {}", e);
                return None;
            }
        };
        let stored = entry.get("response")?.clone();
        match serde_json::from_value(stored) {
            Ok(response) => Some(response),
            Err(e) => {
                warn!("Ignoring unreadable memoized response: {}", e);
                None
            }
        }
    }

    fn memoize(&self, query: &Query, response: &Response) {
        if !self.config.memoize_responses {
            return;
        }
        let Some(cache) = &self.query_cache else {
            return;
        };
        let value = match serde_json::to_value(response) {
            Ok(value) => value,
            Err(e) => {
                warn!("Response not memoized: {}", e);
                return;
            }
        };
        let entry = json!({
            "stored_at": chrono::Utc::now().to_rfc3339(),
            "response": value,
        });
        let key = response_cache_key(query.text(), query.context());
        if let Err(e) = cache.write(&key, entry) {
            warn!("Query cache write dropped: {}", e);
        }
    }
}

fn build_router(registry: &Arc<AgentRegistry>, config: &PipelineConfig) -> AgentRouter {
    AgentRouter::new(registry.clone())
        .with_agent_timeout(config.agent_timeout)
        .with_min_route_confidence(config.min_route_confidence)
}

fn agent_event(outcome: &RouteOutcome) -> Value {
    json!({
        "agent": outcome.agent_used.map(|a| a.as_str()),
        "via_general_handler": outcome.via_general_handler,
        "success": outcome.result.is_success(),
        "error": outcome.result.error_text(),
    })
}

fn response_event(response: &Response, memoized: bool) -> Value {
    json!({
        "language": response.language,
        "intent": response.intent,
        "agent": response.agent_used.map(|a| a.as_str()),
        "success": response.success,
        "answer": response.answer,
        "warnings": response.warnings,
        "memoized": memoized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent::{Agent, AgentCapabilities, AgentError};
    use crate::ports::language::{FixedLanguage, LanguageDetectionError};
    use crate::ports::store::MemoryStore;
    use crate::ports::translation::{TranslationBackend, TranslationError};
    use async_trait::async_trait;
    use demeter_domain::{AgentKind, AgentPayload, AgentResult, Intent};
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Agent returning a canned payload and recording what it was sent
    struct CannedAgent {
        kind: AgentKind,
        payload: Value,
        calls: AtomicUsize,
        seen: Mutex<Option<AgentPayload>>,
    }

    impl CannedAgent {
        fn new(kind: AgentKind, payload: Value) -> Arc<Self> {
            Arc::new(Self {
                kind,
                payload,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Agent for CannedAgent {
        fn kind(&self) -> AgentKind {
            self.kind
        }

        async fn predict(&self, payload: &AgentPayload) -> Result<AgentResult, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some(payload.clone());
            Ok(AgentResult::success(
                self.payload.as_object().cloned().unwrap_or_default(),
            ))
        }
    }

    struct BrokenBackend;

    #[async_trait]
    impl TranslationBackend for BrokenBackend {
        fn name(&self) -> &str {
            "broken"
        }

        async fn translate(
            &self,
            _text: &str,
            _target: &LanguageCode,
            _source: &LanguageCode,
        ) -> Result<String, TranslationError> {
            Err(TranslationError::RequestFailed("connection refused".to_string()))
        }

        async fn detect_language(&self, _text: &str) -> Result<LanguageCode, TranslationError> {
            Err(TranslationError::Unavailable("offline".to_string()))
        }

        async fn supported_languages(&self) -> Result<BTreeMap<String, String>, TranslationError> {
            Err(TranslationError::Unavailable("offline".to_string()))
        }
    }

    /// Backend that "translates" by tagging the text with the target language
    struct TaggingBackend;

    #[async_trait]
    impl TranslationBackend for TaggingBackend {
        fn name(&self) -> &str {
            "tagging"
        }

        async fn translate(
            &self,
            text: &str,
            target: &LanguageCode,
            _source: &LanguageCode,
        ) -> Result<String, TranslationError> {
            if target.is_english() {
                Ok("What crop should I grow with this rain?".to_string())
            } else {
                Ok(format!("[{}] {}", target, text))
            }
        }

        async fn detect_language(&self, _text: &str) -> Result<LanguageCode, TranslationError> {
            Ok(LanguageCode::english())
        }

        async fn supported_languages(&self) -> Result<BTreeMap<String, String>, TranslationError> {
            Ok(BTreeMap::new())
        }
    }

    struct UnsureDetector;

    #[async_trait]
    impl LanguageDetector for UnsureDetector {
        async fn detect(&self, _text: &str) -> Result<LanguageCode, LanguageDetectionError> {
            Err(LanguageDetectionError::Inconclusive("no evidence".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        started: Mutex<Vec<Stage>>,
        degraded: Mutex<Vec<Stage>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_stage_start(&self, stage: Stage) {
            self.started.lock().unwrap().push(stage);
        }

        fn on_stage_complete(&self, stage: Stage, degraded: bool) {
            if degraded {
                self.degraded.lock().unwrap().push(stage);
            }
        }
    }

    fn crop_agent() -> Arc<CannedAgent> {
        CannedAgent::new(
            AgentKind::Crop,
            json!({"top_crop": "rice", "confidence": 0.85}),
        )
    }

    fn market_agent() -> Arc<CannedAgent> {
        CannedAgent::new(
            AgentKind::MarketYield,
            json!({"crop": "rice", "predicted_price": 32.5, "estimated_yield": 40, "estimated_profit": 52000}),
        )
    }

    fn use_case(
        agents: Vec<Arc<dyn Agent>>,
        detector: Arc<dyn LanguageDetector>,
        backend: Arc<dyn TranslationBackend>,
    ) -> HandleQueryUseCase {
        let mut registry = AgentRegistry::new();
        for agent in agents {
            registry.register(agent);
        }
        let translator = Translator::new(backend, Arc::new(MemoryStore::new()));
        HandleQueryUseCase::new(
            Arc::new(IntentClassifier::new()),
            detector,
            Arc::new(translator),
            Arc::new(registry),
        )
    }

    fn english() -> Arc<dyn LanguageDetector> {
        Arc::new(FixedLanguage(LanguageCode::english()))
    }

    fn ctx(value: Value) -> Context {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_scenario_crop_question() {
        let crop = crop_agent();
        let uc = use_case(vec![crop.clone(), market_agent()], english(), Arc::new(BrokenBackend));

        let response = uc
            .handle_query("What crop should I plant in sandy soil with pH 6.5?", Context::new())
            .await;

        assert_eq!(response.intent, Intent::CropRecommendation);
        assert_eq!(response.agent_used, Some(AgentKind::Crop));
        assert!(response.success);
        assert_eq!(response.parameters.number("ph"), Some(6.5));
        assert_eq!(response.parameters.text("soil_type"), Some("sandy"));
        assert!(response.answer.contains("rice"));
        assert!(response.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_scenario_market_question() {
        let uc = use_case(vec![crop_agent(), market_agent()], english(), Arc::new(BrokenBackend));

        let response = uc
            .handle_query("Predict rice prices for this season", Context::new())
            .await;

        assert_eq!(response.intent, Intent::MarketYield);
        assert_eq!(response.agent_used, Some(AgentKind::MarketYield));
        assert_eq!(response.parameters.text("crop"), Some("rice"));
        assert_eq!(
            response.parameters.get("timeframe"),
            Some(&json!({"value": 1, "unit": "seasons"}))
        );
    }

    #[tokio::test]
    async fn test_scenario_help() {
        let uc = use_case(vec![crop_agent(), market_agent()], english(), Arc::new(BrokenBackend));

        let response = uc.handle_query("help", Context::new()).await;

        assert_eq!(response.intent, Intent::General);
        assert!(!response.success);
        assert!(response.agent_used.is_none());
        assert!(response.answer.starts_with("I can help you with"));
        assert!(response.result.payload().contains_key("suggestions"));
    }

    #[tokio::test]
    async fn test_scenario_non_english_with_offline_translation() {
        let crop = crop_agent();
        let uc = use_case(
            vec![crop.clone()],
            Arc::new(FixedLanguage("ta".parse().unwrap())),
            Arc::new(BrokenBackend),
        );
        let context = ctx(json!({
            "N": 90, "P": 42, "K": 43, "temperature": 26,
            "humidity": 80, "ph": 6.5, "rain": 200
        }));

        let response = uc
            .handle_query("என் நிலத்தில் எந்த பயிர் வளர்க்கலாம்?", context)
            .await;

        assert_eq!(response.language.as_str(), "ta");
        assert_eq!(response.agent_used, Some(AgentKind::Crop));
        assert!(!response.answer.is_empty());
        assert!(response.answer.contains("rice"));
        assert_eq!(response.warnings.len(), 2);

        let seen = crop.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.context["rain"], json!(200));
        assert_eq!(seen.context["rainfall"], json!(200));
    }

    #[tokio::test]
    async fn test_answer_translated_back() {
        let uc = use_case(
            vec![crop_agent()],
            Arc::new(FixedLanguage("es".parse().unwrap())),
            Arc::new(TaggingBackend),
        );

        let response = uc
            .handle_query("¿Qué cultivo debo sembrar con esta lluvia?", Context::new())
            .await;

        assert_eq!(response.intent, Intent::CropRecommendation);
        assert!(response.answer.starts_with("[es] "));
        assert!(response.warnings.is_empty());
    }

    /// Crop agent whose payload has no template fields but which formats itself
    struct SelfFormattingCropAgent;

    #[async_trait]
    impl Agent for SelfFormattingCropAgent {
        fn kind(&self) -> AgentKind {
            AgentKind::Crop
        }

        fn capabilities(&self) -> AgentCapabilities {
            AgentCapabilities::predict_only().with_formatter()
        }

        async fn predict(&self, _payload: &AgentPayload) -> Result<AgentResult, AgentError> {
            Ok(AgentResult::success(ctx(json!({"shortlist": ["millet"]}))))
        }

        fn format_result_text(&self, _result: &AgentResult, _context: &Context) -> Option<String> {
            Some("Millet suits your field.".to_string())
        }
    }

    #[tokio::test]
    async fn test_agent_formatted_answer_is_translated_back() {
        let uc = use_case(
            vec![Arc::new(SelfFormattingCropAgent)],
            Arc::new(FixedLanguage("es".parse().unwrap())),
            Arc::new(TaggingBackend),
        );

        let response = uc
            .handle_query("¿Qué cultivo debo sembrar con esta lluvia?", Context::new())
            .await;

        assert_eq!(response.agent_used, Some(AgentKind::Crop));
        assert_eq!(response.answer, "[es] Millet suits your field.");
        assert!(response.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_detection_failure_defaults_to_english() {
        let uc = use_case(vec![crop_agent()], Arc::new(UnsureDetector), Arc::new(BrokenBackend));
        let progress = RecordingProgress::default();

        let response = uc
            .handle_query_with_progress("What crop should I grow?", Context::new(), &progress)
            .await;

        assert!(response.language.is_english());
        assert_eq!(response.warnings.len(), 1);
        assert_eq!(*progress.degraded.lock().unwrap(), vec![Stage::Detect]);
        assert_eq!(*progress.started.lock().unwrap(), Stage::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_empty_registry_is_unavailable() {
        let uc = use_case(vec![], english(), Arc::new(BrokenBackend));

        let err = uc.execute(&Query::new("What crop?")).await.unwrap_err();
        assert_eq!(
            err,
            HandleQueryError::NoAgents {
                language: LanguageCode::english()
            }
        );

        let response = uc.handle_query("What crop?", Context::new()).await;
        assert!(!response.success);
        assert_eq!(response.answer, UNAVAILABLE_ANSWER);
    }

    #[tokio::test]
    async fn test_memoized_response_served_on_repeat() {
        let crop = crop_agent();
        let cache = Arc::new(MemoryStore::new());
        let uc = use_case(vec![crop.clone()], english(), Arc::new(BrokenBackend))
            .with_config(PipelineConfig::default().with_memoize_responses(true))
            .with_query_cache(cache.clone());

        let first = uc.handle_query("What crop should I grow?", Context::new()).await;
        let second = uc.handle_query("What crop should I grow?", Context::new()).await;

        assert_eq!(first.answer, second.answer);
        assert_eq!(second.agent_used, Some(AgentKind::Crop));
        assert_eq!(crop.calls.load(Ordering::SeqCst), 1);
        let key = response_cache_key("What crop should I grow?", &Context::new());
        let entry = cache.read(&key).unwrap().unwrap();
        assert!(entry.get("stored_at").is_some());

        uc.clear_cache();
        assert!(cache.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_transcript_events_in_order() {
        let logger = Arc::new(RecordingLogger::default());
        let uc = use_case(vec![crop_agent()], english(), Arc::new(BrokenBackend))
            .with_conversation_logger(logger.clone());

        uc.handle_query("What crop should I grow?", Context::new()).await;

        assert_eq!(
            *logger.events.lock().unwrap(),
            vec![QUERY_RECEIVED, INTENT_CLASSIFIED, AGENT_RESULT, RESPONSE]
        );
    }

    #[tokio::test]
    async fn test_keyword_fallback_mode_is_reported_as_degraded() {
        let mut registry = AgentRegistry::new();
        registry.register(crop_agent());
        let translator = Translator::new(Arc::new(BrokenBackend), Arc::new(MemoryStore::new()));
        let uc = HandleQueryUseCase::new(
            Arc::new(IntentClassifier::keyword_only()),
            english(),
            Arc::new(translator),
            Arc::new(registry),
        );
        let progress = RecordingProgress::default();

        let response = uc
            .handle_query_with_progress("Which crop to plant in clay soil?", Context::new(), &progress)
            .await;

        assert_eq!(uc.classifier_mode(), ClassifierMode::Fallback);
        assert!(response.confidence <= 0.8);
        assert!(progress.degraded.lock().unwrap().contains(&Stage::Classify));
    }
}
