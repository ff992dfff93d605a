//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::cli::{ContextInputError, parse_context};
use crate::progress::reporter::ProgressReporter;
use crate::ConsoleFormatter;
use colored::Colorize;
use demeter_application::HandleQueryUseCase;
use demeter_domain::{Context, OutputFormat};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::sync::Arc;

const HISTORY_SIZE: usize = 1000;

/// A slash command typed at the prompt
#[derive(Debug)]
pub enum ChatCommand {
    Help,
    Quit,
    ShowContext,
    /// Merge these keys into the session context
    SetContext(Result<Context, ContextInputError>),
    Clear,
    Unknown(String),
}

impl ChatCommand {
    /// Parse a line starting with `/`
    pub fn parse(line: &str) -> Self {
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map(|(n, r)| (n, r.trim()))
            .unwrap_or((line, ""));
        match name {
            "/quit" | "/exit" | "/q" => ChatCommand::Quit,
            "/help" | "/h" | "/?" => ChatCommand::Help,
            "/clear" => ChatCommand::Clear,
            "/context" if rest.is_empty() => ChatCommand::ShowContext,
            "/context" => ChatCommand::SetContext(parse_context(rest)),
            _ => ChatCommand::Unknown(name.to_string()),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: Arc<HandleQueryUseCase>,
    context: Context,
    format: OutputFormat,
    show_progress: bool,
}

impl ChatRepl {
    pub fn new(use_case: Arc<HandleQueryUseCase>) -> Self {
        Self {
            use_case,
            context: Context::new(),
            format: OutputFormat::Answer,
            show_progress: true,
        }
    }

    /// Context sent with every question until cleared
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();
        let history_path = dirs::data_dir().map(|p| p.join("demeter").join("history.txt"));
        if let Some(path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_SIZE, path) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => eprintln!("{} history disabled: {}", "warning:".yellow(), e),
            }
        }
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("demeter".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with('/') {
                        if self.handle_command(ChatCommand::parse(line)) {
                            break;
                        }
                        continue;
                    }
                    self.process_question(line).await;
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(_) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              Demeter - Chat Mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Ask about crops, market prices, farming risks, pests or schemes,");
        println!("in any supported language.");
        println!();
        Self::print_commands();
    }

    fn print_commands() {
        println!("Commands:");
        println!("  {}            - Show this help", "/help".cyan());
        println!("  {}         - Show the session context", "/context".cyan());
        println!("  {}  - Merge keys into the session context", "/context <json>".cyan());
        println!("  {}           - Clear the session context", "/clear".cyan());
        println!("  {}            - Exit chat", "/quit".cyan());
        println!();
    }

    /// Apply a slash command. Returns true if the REPL should exit.
    fn handle_command(&mut self, command: ChatCommand) -> bool {
        match command {
            ChatCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ChatCommand::Help => {
                println!();
                Self::print_commands();
            }
            ChatCommand::ShowContext => {
                let shown = serde_json::to_string_pretty(&self.context)
                    .unwrap_or_else(|_| "{}".to_string());
                println!("{}", shown);
            }
            ChatCommand::SetContext(Ok(update)) => {
                let keys = update.len();
                merge_context(&mut self.context, update);
                println!("{}", format!("Context updated ({} keys).", keys).green());
            }
            ChatCommand::SetContext(Err(e)) => {
                eprintln!("{} {}", "error:".red(), e);
            }
            ChatCommand::Clear => {
                self.context.clear();
                println!("{}", "Session context cleared.".green());
            }
            ChatCommand::Unknown(name) => {
                println!("Unknown command: {}", name);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_question(&self, question: &str) {
        println!();
        let response = if self.show_progress {
            let progress = ProgressReporter::new();
            self.use_case
                .handle_query_with_progress(question, self.context.clone(), &progress)
                .await
        } else {
            self.use_case.handle_query(question, self.context.clone()).await
        };
        println!("{}", ConsoleFormatter::render(question, &response, self.format));
        println!();
    }
}

/// Overwrite `context` with every key of `update`
pub fn merge_context(context: &mut Context, update: Context) {
    for (key, value) in update {
        context.insert(key, value);
    }
}
