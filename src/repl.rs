use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::qa::{QaEngine, Session};

fn is_exit_command(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "exit" | "quit")
}

/// Interactive question loop on stdin/stdout. Ends on `exit`, `quit` or EOF.
pub async fn run(engine: &QaEngine) -> Result<()> {
    println!("Loaded index. Ask questions about the document. Type 'clear' to forget the conversation, 'exit' to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = Session::new();

    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit_command(question) {
            break;
        }
        if question.eq_ignore_ascii_case("clear") {
            session.clear();
            println!("\nBot: Conversation cleared.");
            continue;
        }

        match session.ask(engine, question).await {
            Ok(answer) => println!("\nBot: {}", answer.text),
            Err(e) => {
                tracing::error!("Failed to answer: {e:#}");
                println!("\nBot: Sorry, something went wrong answering that: {e:#}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands_case_insensitive() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command("Exit"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("what is the exit policy"));
    }
}
