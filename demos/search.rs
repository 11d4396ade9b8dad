//! Search — finds videos matching a query.
//!
//! ```sh
//! VIZLOOK_API_KEY=... cargo run --example search -- "how to be productive"
//! ```

use vizlook_rs::client::VizlookClient;
use vizlook_rs::types::{Category, SearchOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "how to be productive".to_string());

    let client = VizlookClient::from_env()?;

    let options = SearchOptions {
        category: Some(Category::Education),
        max_results: Some(5),
        include_summary: Some(true),
        ..SearchOptions::default()
    };
    let response = client.search(&query, options).await?;

    for (i, item) in response.results.iter().enumerate() {
        println!("{}. {} ({:.0}s)", i + 1, item.title, item.duration);
        println!("   {}", item.url);
        println!("   by {}", item.author.name);
        if let Some(summary) = &item.summary {
            println!("   {}", summary.overall_summary);
        }
        for highlight in &item.highlights {
            println!(
                "   [{:.1}s - {:.1}s] {}",
                highlight.start_time, highlight.end_time, highlight.visual_description
            );
        }
    }
    println!();
    println!("Cost: ${}", response.dollar_cost.total);

    Ok(())
}
