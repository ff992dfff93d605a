//! Console output formatter for query responses

use colored::Colorize;
use demeter_domain::{OutputFormat, Response};
use serde_json::Value;

/// Formats responses for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a response in the requested format
    pub fn render(query: &str, response: &Response, format: OutputFormat) -> String {
        match format {
            OutputFormat::Answer => Self::format_answer(response),
            OutputFormat::Full => Self::format(query, response),
            OutputFormat::Json => Self::format_json(response),
        }
    }

    /// Only the answer text
    pub fn format_answer(response: &Response) -> String {
        if response.success {
            response.answer.clone()
        } else {
            format!("{}", response.answer.yellow())
        }
    }

    /// Answer with classification, routing and degradation details
    pub fn format(query: &str, response: &Response) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Demeter"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), query));
        output.push_str(&format!(
            "{} {}\n",
            "Language:".cyan().bold(),
            response.language
        ));
        output.push_str(&format!(
            "{} {} ({:.0}%)\n",
            "Intent:".cyan().bold(),
            response.intent,
            response.confidence * 100.0
        ));
        let agent = response
            .agent_used
            .map(|a| a.to_string())
            .unwrap_or_else(|| "none".to_string());
        output.push_str(&format!("{} {}\n", "Agent:".cyan().bold(), agent));

        let status = match &response.error {
            None => "ok".green().to_string(),
            Some(error) => error.red().to_string(),
        };
        output.push_str(&format!("{} {}\n", "Status:".cyan().bold(), status));

        output.push_str(&Self::section_header("Answer"));
        output.push_str(&response.answer);
        output.push('\n');

        if !response.parameters.is_empty() {
            output.push_str(&Self::section_header("Parameters"));
            for (key, value) in response.parameters.iter() {
                output.push_str(&format!("  {} {}\n", format!("{}:", key).dimmed(), plain(value)));
            }
        }

        if !response.warnings.is_empty() {
            output.push_str(&Self::section_header("Warnings"));
            for warning in &response.warnings {
                output.push_str(&format!("  {} {}\n", "!".yellow().bold(), warning));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(response: &Response) -> String {
        serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(plain).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demeter_domain::LanguageCode;

    fn unavailable() -> Response {
        let mut response = Response::unavailable(
            LanguageCode::english(),
            "no agents registered",
            "The service is temporarily unavailable.",
        );
        response.warnings.push("answer not translated".to_string());
        response
    }

    #[test]
    fn test_answer_format_is_just_the_answer() {
        colored::control::set_override(false);
        assert_eq!(
            ConsoleFormatter::render("hi", &unavailable(), OutputFormat::Answer),
            "The service is temporarily unavailable."
        );
    }

    #[test]
    fn test_full_format_lists_details() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::render("hi", &unavailable(), OutputFormat::Full);
        assert!(text.contains("Question: hi"));
        assert!(text.contains("Agent: none"));
        assert!(text.contains("unavailable: no agents registered"));
        assert!(text.contains("! answer not translated"));
    }

    #[test]
    fn test_json_format_parses_back() {
        let text = ConsoleFormatter::render("hi", &unavailable(), OutputFormat::Json);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["warnings"][0], "answer not translated");
    }
}
