//! Status command - show what the exclusion list holds.

use std::collections::BTreeMap;
use std::path::PathBuf;

use colored::Colorize;
use lexuse::{ExclusionRecord, ExclusionStore, LexUseConfig};
use serde::Serialize;

/// Counts derived from an exclusion list.
#[derive(Debug, Serialize)]
struct ListStatus {
    file: String,
    total: usize,
    by_language: BTreeMap<String, usize>,
    most_recent: Option<RecentRecord>,
}

#[derive(Debug, Serialize)]
struct RecentRecord {
    form_id: String,
    word: String,
    language: String,
    date: String,
}

impl From<ExclusionRecord> for RecentRecord {
    fn from(record: ExclusionRecord) -> Self {
        Self {
            form_id: record.form_id,
            word: record.word,
            language: record.language,
            date: record.date_added,
        }
    }
}

pub fn run(
    exclude_list: Option<PathBuf>,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = exclude_list.unwrap_or_else(|| LexUseConfig::default().exclusion_path);

    if !path.exists() {
        return Err(format!(
            "Exclusion list not found: {}\nRun 'lexuse run' first.",
            path.display()
        )
        .into());
    }

    let store = ExclusionStore::open(&path)?;
    let status = summarize(&store, &path.display().to_string());

    if json_output {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Exclusion list".cyan().bold(),
        status.file.white()
    );
    println!();
    println!("Forms excluded: {}", status.total.to_string().white().bold());
    println!();

    if !status.by_language.is_empty() {
        println!("{}", "By language:".yellow().bold());
        for (language, count) in &status.by_language {
            println!("  {:<6} {}", language, count.to_string().white());
        }
        println!();
    }

    if let Some(recent) = &status.most_recent {
        println!("{}", "Most recent:".yellow().bold());
        println!(
            "  {} ({}, {}) on {}",
            recent.word.green(),
            recent.form_id,
            recent.language,
            recent.date
        );
    }

    Ok(())
}

/// Count records per language and find the latest addition.
fn summarize(store: &ExclusionStore, file: &str) -> ListStatus {
    let mut by_language = BTreeMap::new();
    let mut most_recent: Option<ExclusionRecord> = None;

    for record in store.records() {
        *by_language.entry(record.language.clone()).or_insert(0) += 1;
        // ISO-8601 dates of the same form order lexically.
        if most_recent
            .as_ref()
            .is_none_or(|latest| record.date_added >= latest.date_added)
        {
            most_recent = Some(record);
        }
    }

    ListStatus {
        file: file.to_string(),
        total: store.len(),
        by_language,
        most_recent: most_recent.map(RecentRecord::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_counts_and_latest() {
        let mut store = ExclusionStore::in_memory();
        store.add(ExclusionRecord::now("L1-F1", "bil", "sv").with_date("2024-01-01T00:00:00+00:00"));
        store.add(ExclusionRecord::now("L2-F1", "hus", "sv").with_date("2024-03-01T00:00:00+00:00"));
        store.add(ExclusionRecord::now("L3-F1", "bog", "da").with_date("2024-02-01T00:00:00+00:00"));

        let status = summarize(&store, "exclude_list.json");
        assert_eq!(status.total, 3);
        assert_eq!(status.by_language["sv"], 2);
        assert_eq!(status.by_language["da"], 1);
        assert_eq!(status.most_recent.unwrap().word, "hus");
    }

    #[test]
    fn test_summarize_empty() {
        let status = summarize(&ExclusionStore::in_memory(), "x.json");
        assert_eq!(status.total, 0);
        assert!(status.most_recent.is_none());
    }
}
