//! Terminal chat front-end for the provisioned assistant. Replies are
//! rendered with numbered citation markers and a references footer.

use anyhow::{Context, Result};
use askdocs::assistants::runs::PollConfig;
use askdocs::config::AppConfig;
use askdocs::session::ChatSession;
use askdocs::{ApiClient, Credentials};
use dotenvy::dotenv;
use std::io::{stdin, stdout, Write};

const SETUP_HINT: &str = "\
The assistant is not configured yet.
1. Run askdocs-setup to create the assistant and index your documents.
2. Export the printed ASSISTANT_ID and VECTOR_STORE_ID.
3. Start askdocs-chat again.";

/// Reads one trimmed line from stdin, `None` once stdin is closed.
fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}");
    stdout().flush()?;
    let mut line = String::new();
    if stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().context(SETUP_HINT)?;
    let credentials =
        Credentials::from_env().context("set OPENAI_KEY in the environment or a .env file")?;
    let client = ApiClient::new(credentials)?;
    let poll = PollConfig::default();
    let mut session = ChatSession::new();

    println!("AI document assistant. Ask about the indexed documents.");
    println!("Knowledge base: {}", config.vector_store_id);
    println!("Commands: /new starts a fresh conversation, /quit exits.\n");

    loop {
        let Some(input) = prompt("You: ")? else {
            break;
        };
        match input.as_str() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/new" | "/clear" => {
                let turns = session.transcript().len();
                session.reset();
                println!("Started a new conversation ({turns} earlier turns dropped).\n");
            }
            _ => run_turn(&client, &config, &poll, &mut session, &input).await,
        }
    }

    Ok(())
}

/// One user turn: send, poll the run, render citations, print.
async fn run_turn(
    client: &ApiClient,
    config: &AppConfig,
    poll: &PollConfig,
    session: &mut ChatSession,
    input: &str,
) {
    session.push_user(input);
    println!("Thinking...");

    let reply = async {
        let thread_id = session.thread_id(client).await?;
        let text = client
            .complete_turn(&config.assistant_id, &thread_id, input, poll)
            .await?;
        client.render_citations(&text).await
    }
    .await;

    match reply {
        Ok(rendered) => {
            println!("\nAssistant: {rendered}\n");
            session.push_assistant(rendered);
        }
        Err(error) => {
            println!("\nSorry, that request could not be completed ({error}). Please try again.\n");
        }
    }
}
