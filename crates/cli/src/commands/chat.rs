//! Interactive chat command.
//!
//! Reproduces the original app's flow on the terminal: log in, optionally
//! upload a document, ask questions, log out. Errors are printed as messages
//! and the loop continues; the session stays usable after any failure.

use clap::Args;
use paperchat_core::{AppConfig, AppResult};
use paperchat_retrieval::{ingest, Role, Session};
use std::io::{BufRead, Write};
use std::path::Path;

/// Interactive chat with login gate and document upload.
#[derive(Args, Debug)]
pub struct ChatCommand {}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let engine = super::ask::build_engine(config)?;
        let mut session = Session::new();

        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();

        // Login gate: skipped entirely when no credentials are configured
        if config.credentials.is_empty() {
            session.login("", "", &config.credentials);
        } else {
            while !session.is_authenticated() {
                let username = match prompt_line(&mut lines, "Username: ")? {
                    Some(line) => line,
                    None => return Ok(()),
                };
                let password = match prompt_line(&mut lines, "Password: ")? {
                    Some(line) => line,
                    None => return Ok(()),
                };

                if !session.login(&username, &password, &config.credentials) {
                    println!("Invalid username or password");
                }
            }
            println!("Login successful");
        }

        println!("Type a question, or /open <file>, /history, /logout, /quit");

        loop {
            let line = match prompt_line(&mut lines, "> ")? {
                Some(line) => line,
                None => break,
            };
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match line.split_once(' ').map_or((line, ""), |(a, b)| (a, b)) {
                ("/quit", _) => break,
                ("/logout", _) => {
                    session.logout();
                    println!("Logged out");
                    break;
                }
                ("/history", _) => {
                    for turn in session.history() {
                        let who = match turn.role {
                            Role::User => "you",
                            Role::Assistant => "assistant",
                        };
                        println!("[{}] {}", who, turn.text);
                    }
                }
                ("/open", path) if !path.is_empty() => {
                    match open_document(&engine, &mut session, path.trim()).await {
                        Ok(count) => println!("Indexed {} chunks from {}", count, path.trim()),
                        Err(e) => println!("{}", e),
                    }
                }
                ("/open", _) => println!("Usage: /open <file>"),
                _ => {
                    // Grounded iff a document has been indexed in this session
                    let grounded = session.has_document();
                    match engine.answer(&mut session, line, grounded).await {
                        Ok(answer) => println!("{}", answer),
                        Err(e) => println!("{}", e),
                    }
                }
            }
        }

        Ok(())
    }
}

async fn open_document(
    engine: &paperchat_retrieval::QaEngine,
    session: &mut Session,
    path: &str,
) -> AppResult<usize> {
    let document = ingest::read_file(Path::new(path))?;
    engine.build_index(session, &document).await
}

/// Print a prompt and read one line; `None` on end of input.
fn prompt_line(
    lines: &mut std::io::Lines<std::io::StdinLock<'_>>,
    prompt: &str,
) -> AppResult<Option<String>> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}
