// CSV corpus ingestion — the bulk source of stories.
//
// Rows are read wholesale (the corpus is small enough that streaming buys
// nothing) and loading is a full replace: the document collection is
// cleared first, and every row lands with empty topic lists — tagging
// happens in the bootstrap or the regeneration path, not here.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::info;

use crate::store::models::NewDocument;
use crate::store::Store;

/// One row of the corpus CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryRow {
    pub id: i64,
    pub title: String,
    pub story: String,
    pub genre: String,
}

/// Read every row of the corpus CSV.
pub fn read_stories(path: &Path) -> Result<Vec<StoryRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV at {}", path.display()))?;

    let mut rows = Vec::new();
    for (line, record) in reader.deserialize().enumerate() {
        let row: StoryRow =
            record.with_context(|| format!("Malformed CSV row {}", line + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Replace the document collection with the CSV rows (untagged).
pub async fn load_corpus(store: &Arc<dyn Store>, rows: &[StoryRow]) -> Result<usize> {
    store.delete_all_documents().await?;

    let documents: Vec<NewDocument> = rows
        .iter()
        .map(|row| NewDocument {
            story_id: row.id,
            title: row.title.clone(),
            content: row.story.clone(),
            genre: row.genre.clone(),
            topics: vec![],
            topic_names: vec![],
            authors: vec![],
            year: None,
            doi: None,
            date_added: Utc::now().to_rfc3339(),
            popularity: 0,
        })
        .collect();

    let loaded = store.insert_documents(&documents).await?;
    info!(loaded, "Loaded corpus from CSV");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_stories() {
        let dir = std::env::temp_dir().join("storykeep-ingest-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stories.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "id,title,story,genre").unwrap();
        writeln!(file, "1,The Harbor,\"Boats waited, silent in the fog\",Mystery").unwrap();
        writeln!(file, "2,Desert Road,Dust and heat and silence,Drama").unwrap();

        let rows = read_stories(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].story, "Boats waited, silent in the fog");
        assert_eq!(rows[1].genre, "Drama");
    }

    #[test]
    fn test_read_stories_missing_file() {
        let result = read_stories(Path::new("/nonexistent/stories.csv"));
        assert!(result.is_err());
    }
}
