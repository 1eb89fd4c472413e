//! Scores command: print the stored best score.

use std::path::Path;

use anyhow::{Context, Result};
use reflex_core::FileStore;

/// Show the best score from `store_path`. A missing file reads as 0.
pub fn run(store_path: &Path, json: bool) -> Result<()> {
    let store = FileStore::new(store_path);
    let record = store
        .load_record()
        .with_context(|| format!("Failed to read best score from {:?}", store_path))?;

    let best = record.as_ref().map_or(0, |r| r.best);
    if json {
        let value = serde_json::json!({
            "best": best,
            "updated_at": record.as_ref().map(|r| r.updated_at),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match record {
            Some(r) => println!(
                "Best score: {} (set {})",
                best,
                r.updated_at.format("%Y-%m-%d %H:%M UTC")
            ),
            None => println!("Best score: {}", best),
        }
    }

    Ok(())
}
