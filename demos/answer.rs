//! Answer — streams an answer to a question as it is generated.
//!
//! ```sh
//! VIZLOOK_API_KEY=... cargo run --example answer -- "How to learn python?"
//! ```
//!
//! Set `RUST_LOG=vizlook_rs=debug` to see requests and discarded frames.

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use vizlook_rs::client::VizlookClient;
use vizlook_rs::types::{AnswerOptions, StreamEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "How to learn python?".to_string());

    let client = VizlookClient::from_env().context("creating client")?;

    let mut stream = client
        .stream_answer(&query, AnswerOptions::default())
        .await
        .context("starting answer stream")?;

    while let Some(event) = stream.next().await {
        match event.context("reading answer stream")? {
            StreamEvent::AnswerChunk { text } => print!("{text}"),
            StreamEvent::Citations { citations } => {
                println!();
                println!();
                println!("Sources:");
                for citation in citations {
                    println!("  - {} ({})", citation.title, citation.url);
                }
            }
            StreamEvent::Cost { total_cost } => println!("Cost: ${total_cost}"),
            StreamEvent::Error { message } => eprintln!("[error] {message}"),
        }
    }

    Ok(())
}
