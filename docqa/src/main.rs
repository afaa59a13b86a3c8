// Terminal front end: open a PDF, then ask questions about it line by line.

use anyhow::{Context, Result};
use docqa::{AnswerGenerator, GeneratorConfig, QaSession};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

const HELP: &str = "Commands: :open <path.pdf>  load a document | :quit  exit | anything else is a question";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = GeneratorConfig::from_env().context("invalid configuration")?;
    if !config.has_credentials() {
        log::warn!("Azure OpenAI credentials are not set; questions will fail until they are");
    }

    let mut session = QaSession::new(Arc::new(AnswerGenerator::new(config)));

    println!("DocQBot - Automated Document Retrieval");
    println!("{}", HELP);

    if let Some(path) = std::env::args().nth(1) {
        open_document(&mut session, &path);
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        } else if line == ":quit" || line == ":q" {
            break;
        } else if line == ":help" {
            println!("{}", HELP);
        } else if let Some(path) = line.strip_prefix(":open") {
            let path = path.trim();
            if path.is_empty() {
                println!("Usage: :open <path.pdf>");
            } else {
                open_document(&mut session, path);
            }
        } else {
            println!("Generating answer... Please wait.");
            match session.ask(line).await {
                Ok(answer) => println!("\nAnswer:\n{}\n", answer),
                Err(e) => println!("Error: {}", e),
            }
        }
    }

    Ok(())
}

fn open_document(session: &mut QaSession, path: &str) {
    let error = session.load_file(Path::new(path));

    if let Some(e) = error {
        println!("Error while reading PDF: {}", e);
    }

    match session.document() {
        Some(doc) if !doc.is_empty() => println!("Document processed successfully!"),
        _ => println!("Could not extract text from the uploaded PDF."),
    }
}
