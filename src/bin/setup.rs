//! One-time provisioning: creates the vector store, uploads and indexes
//! documents, creates the assistant, and prints the identifiers the chat
//! front-end needs.

use anyhow::{bail, Context, Result};
use askdocs::assistants::files::FilePurpose;
use askdocs::assistants::runs::PollConfig;
use askdocs::assistants::vector_stores::{CreateVectorStoreRequest, FileBatchStatus};
use askdocs::assistants::{
    CreateAssistantBuilder, FileSearch, FileSearchResources, Tool, ToolResources,
};
use askdocs::{ApiClient, Credentials};
use dotenvy::dotenv;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

const MODEL: &str = "gpt-3.5-turbo";

const DEFAULT_ASSISTANT_NAME: &str = "Document Assistant";

const DEFAULT_INSTRUCTIONS: &str = "\
You are a helpful assistant that answers questions based on the documents in your knowledge base.
Use your vector store files to provide accurate, well-supported responses with citations.
Be clear, concise, and helpful in your answers.";

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

    let credentials =
        Credentials::from_env().context("set OPENAI_KEY in the environment or a .env file")?;
    let client = ApiClient::new(credentials)?;
    let poll = PollConfig::default();

    println!("Starting assistant setup...\n");

    println!("Step 1: creating vector store");
    let vector_store = client
        .create_vector_store(CreateVectorStoreRequest {
            name: "Document Assistant Knowledge Base".to_string(),
            ..Default::default()
        })
        .await?;
    println!("  created {}\n", vector_store.id);

    println!("Step 2: add the documents to index");
    println!("Enter file paths one at a time, or 'done' to finish.\n");
    let mut paths: Vec<PathBuf> = Vec::new();
    loop {
        let Some(line) = prompt("File path (or 'done'): ")? else {
            break;
        };
        if line.eq_ignore_ascii_case("done") {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let path = PathBuf::from(line);
        if path.exists() {
            println!("  added {}", path.display());
            paths.push(path);
        } else {
            println!("  not found: {}", path.display());
        }
    }
    if paths.is_empty() {
        bail!("no files added, nothing to set up");
    }

    println!("\nUploading {} file(s)...", paths.len());
    let mut file_ids = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = client.upload_file(path, FilePurpose::Assistants).await?;
        println!("  uploaded {} as {}", file.filename, file.id);
        file_ids.push(file.id);
    }

    println!("Indexing...");
    let batch = client.create_file_batch(&vector_store.id, &file_ids).await?;
    let batch = client
        .poll_file_batch(&vector_store.id, &batch.id, &poll)
        .await?;
    if batch.status != FileBatchStatus::Completed {
        bail!(
            "indexing ended with status {} ({} of {} files failed)",
            batch.status,
            batch.file_counts.failed,
            batch.file_counts.total
        );
    }
    println!("  indexed {} file(s)\n", batch.file_counts.completed);

    println!("Step 3: creating assistant");
    let name = prompt(&format!("Assistant name (default '{DEFAULT_ASSISTANT_NAME}'): "))?
        .unwrap_or_default();
    let name = if name.is_empty() {
        DEFAULT_ASSISTANT_NAME.to_string()
    } else {
        name
    };
    let instructions = prompt("Custom instructions (enter for default): ")?.unwrap_or_default();
    let instructions = if instructions.is_empty() {
        DEFAULT_INSTRUCTIONS.to_string()
    } else {
        instructions
    };

    let request = CreateAssistantBuilder::default()
        .model(MODEL)
        .name(name)
        .instructions(instructions)
        .tools(vec![Tool::FileSearch(FileSearch::default())])
        .tool_resources(ToolResources {
            file_search: Some(FileSearchResources {
                vector_store_ids: vec![vector_store.id.clone()],
            }),
        })
        .build()?;
    let assistant = client.create_assistant(request).await?;
    println!("  created {}\n", assistant.id);

    println!("{}", "=".repeat(60));
    println!("Setup complete. The chat front-end needs these identifiers:\n");
    println!("ASSISTANT_ID={}", assistant.id);
    println!("VECTOR_STORE_ID={}", vector_store.id);
    println!("\nNext steps:");
    println!("1. Export both variables, or add them to your deployment's environment.");
    println!("2. Start askdocs-chat.");
    println!("{}", "=".repeat(60));

    let test = prompt("\nTest the assistant now? (yes/no): ")?.unwrap_or_default();
    if test.eq_ignore_ascii_case("yes") {
        smoke_test(&client, &assistant.id, &poll).await?;
    }

    println!("\nAll done, the assistant is ready.");
    Ok(())
}

/// Minimal send/poll/print loop against the freshly created assistant.
async fn smoke_test(client: &ApiClient, assistant_id: &str, poll: &PollConfig) -> Result<()> {
    let thread = client.create_thread().await?;
    println!("\nTalk to the assistant ('exit' to quit):\n");
    loop {
        let Some(input) = prompt("You: ")? else {
            break;
        };
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            break;
        }
        match client
            .complete_turn(assistant_id, &thread.id, &input, poll)
            .await
        {
            Ok(text) => println!("\nAssistant: {}\n", text.value),
            Err(error) => println!("\nError: {error}\n"),
        }
    }
    Ok(())
}
