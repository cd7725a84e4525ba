use anyhow::Result;
use chrono::Local;
use faq_engine::FaqEngine;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::output::print_faqs;

const PROMPT: &str = "you> ";

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn run_chat(engine: &mut FaqEngine) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("Ask a question. /faqs lists known questions, /clear clears the screen, exit quits.");

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed.to_ascii_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        rl.add_history_entry(trimmed).ok();

        match trimmed {
            "/faqs" => print_faqs(engine.curated())?,
            "/clear" => rl.clear_screen()?,
            query => {
                let asked_at = timestamp();
                println!("You ({asked_at}): {query}");
                let answer = engine.respond(query);
                println!("Chatbot ({asked_at}): {answer}");
            }
        }
    }

    Ok(())
}
