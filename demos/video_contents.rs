//! Video contents — fetches the transcription and summary of YouTube videos.
//!
//! ```sh
//! VIZLOOK_API_KEY=... cargo run --example video_contents -- https://www.youtube.com/watch?v=QdBokRd2ahw
//! ```

use vizlook_rs::client::VizlookClient;
use vizlook_rs::types::{CrawlMode, VideoContentsOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        urls.push("https://www.youtube.com/watch?v=QdBokRd2ahw".to_string());
    }

    let client = VizlookClient::from_env()?;

    let options = VideoContentsOptions {
        crawl_mode: Some(CrawlMode::Fallback),
        include_transcription: Some(true),
        include_summary: Some(true),
    };
    let response = client.get_video_contents(urls, options).await?;

    for content in &response.results {
        println!("== {}", content.status.url);
        let Some(data) = content.data.as_ref().filter(|_| content.is_success()) else {
            match &content.status.error {
                Some(error) => println!(
                    "failed: {:?} {}",
                    error.error_type,
                    error.message.as_deref().unwrap_or_default()
                ),
                None => println!("failed"),
            }
            continue;
        };

        println!("{} ({:.0}s)", data.title, data.duration);
        if let Some(summary) = &data.summary {
            println!("{}", summary.overall_summary);
            for section in &summary.section_summaries {
                println!("  [{:.0}s] {}", section.start_time, section.title);
            }
        }
        if let Some(transcription) = &data.transcription {
            for clip in transcription.audio_clips.iter().take(5) {
                println!(
                    "  {:>7.1}s {}: {}",
                    clip.start_time, clip.speaker_id, clip.transcription
                );
            }
        }
        println!();
    }
    println!("Cost: ${}", response.dollar_cost.total);

    Ok(())
}
