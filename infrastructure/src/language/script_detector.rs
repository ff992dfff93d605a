//! Offline language detection from Unicode scripts and stop words.
//!
//! Text dominated by a non-Latin script maps straight to the language that
//! script is used for here. Latin text is scored against short stop-word
//! lists. Short phrases can be misjudged.

use async_trait::async_trait;
use demeter_application::ports::language::{LanguageDetectionError, LanguageDetector};
use demeter_domain::LanguageCode;
use tracing::trace;

/// Inclusive code point ranges and the language they identify
const SCRIPTS: &[(u32, u32, &str)] = &[
    (0x0900, 0x097F, "hi"), // Devanagari
    (0x0980, 0x09FF, "bn"),
    (0x0A00, 0x0A7F, "pa"), // Gurmukhi
    (0x0A80, 0x0AFF, "gu"),
    (0x0B80, 0x0BFF, "ta"),
    (0x0C00, 0x0C7F, "te"),
    (0x0C80, 0x0CFF, "kn"),
    (0x0D00, 0x0D7F, "ml"),
    (0x0600, 0x06FF, "ar"),
    (0x1200, 0x137F, "am"), // Ethiopic
    (0x4E00, 0x9FFF, "zh"),
];

/// Stop words per Latin-script language, in tie-break order
const STOP_WORDS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "the", "is", "are", "what", "which", "how", "should", "my", "in", "for", "of", "and",
            "to", "with", "can", "i", "do", "this", "will",
        ],
    ),
    (
        "es",
        &[
            "el", "la", "los", "las", "que", "qué", "es", "en", "para", "con", "mi", "debo",
            "cómo", "cuál", "del", "una", "por",
        ],
    ),
    (
        "fr",
        &[
            "le", "la", "les", "est", "quel", "quelle", "dans", "pour", "avec", "mon", "ma",
            "je", "des", "du", "une", "comment",
        ],
    ),
    (
        "pt",
        &[
            "o", "os", "as", "que", "é", "em", "para", "com", "meu", "minha", "devo", "qual",
            "do", "da", "uma", "não",
        ],
    ),
    (
        "sw",
        &[
            "ni", "na", "ya", "wa", "kwa", "katika", "gani", "nini", "je", "yangu", "mimi",
            "hii", "za", "la",
        ],
    ),
];

/// Language detector that needs no network or model
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptLanguageDetector;

impl ScriptLanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous detection
    pub fn detect_text(&self, text: &str) -> Result<LanguageCode, LanguageDetectionError> {
        let mut latin = 0usize;
        let mut counts = vec![0usize; SCRIPTS.len()];
        for c in text.chars().filter(|c| c.is_alphabetic()) {
            let code = c as u32;
            match SCRIPTS
                .iter()
                .position(|(start, end, _)| (*start..=*end).contains(&code))
            {
                Some(index) => counts[index] += 1,
                None if code < 0x0250 => latin += 1,
                None => {}
            }
        }

        let dominant = counts
            .iter()
            .enumerate()
            .max_by_key(|(index, count)| (**count, std::cmp::Reverse(*index)))
            .filter(|(_, count)| **count > 0);

        if let Some((index, count)) = dominant
            && *count >= latin
        {
            trace!(script_chars = count, "Detected by script");
            return to_code(SCRIPTS[index].2);
        }

        if latin == 0 {
            return Err(LanguageDetectionError::Inconclusive(
                "text contains no letters".to_string(),
            ));
        }
        detect_latin(text)
    }
}

fn detect_latin(text: &str) -> Result<LanguageCode, LanguageDetectionError> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let mut best: Option<(&str, usize)> = None;
    for (code, words) in STOP_WORDS {
        let hits = tokens.iter().filter(|t| words.contains(t)).count();
        if hits > best.map_or(0, |(_, h)| h) {
            best = Some((*code, hits));
        }
    }

    match best {
        Some((code, hits)) => {
            trace!(language = code, hits, "Detected by stop words");
            to_code(code)
        }
        None => Err(LanguageDetectionError::Inconclusive(
            "no stop-word evidence".to_string(),
        )),
    }
}

fn to_code(code: &str) -> Result<LanguageCode, LanguageDetectionError> {
    code.parse()
        .map_err(|e: demeter_domain::DomainError| LanguageDetectionError::Backend(e.to_string()))
}

#[async_trait]
impl LanguageDetector for ScriptLanguageDetector {
    async fn detect(&self, text: &str) -> Result<LanguageCode, LanguageDetectionError> {
        self.detect_text(text)
    }
}
