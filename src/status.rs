// System status display — store stats for the CLI.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::store::Store;

/// Display store status to the terminal.
pub async fn show(store: &Arc<dyn Store>, db_display_path: &str) -> Result<()> {
    if !Path::new(db_display_path).exists() {
        println!("Store: not initialized");
        println!("\nRun `storykeep init` to set it up.");
        return Ok(());
    }

    // Store file size
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Store: {} ({})", db_display_path, file_size);

    let doc_count = store.count_documents().await?;
    println!("Documents: {}", doc_count);
    if doc_count == 0 {
        println!("  Run `storykeep load-csv` to load a corpus");
    }

    let topic_count = store.count_topics().await?;
    if topic_count == 0 {
        println!("Topics: none yet");
        println!("  Run `storykeep bootstrap` (or start the server) to seed them");
    } else {
        println!("Topics: {}", topic_count);
        for topic in store.list_topics(0, 5).await? {
            println!("  {:>3}. {} ({})", topic.topic_id, topic.name, topic.count);
        }
        if topic_count > 5 {
            println!("  ...");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
