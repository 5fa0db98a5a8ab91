use std::sync::Arc;

use anyhow::Result;
use careerflow::{
    CareerFlowError, FileStore, HistoryEntry, HistoryStore, KeyValueStore, MemoryStore,
    HISTORY_CAPACITY,
};
use serde_json::json;

fn entry(n: usize) -> HistoryEntry {
    HistoryEntry::new(
        "cover-letter",
        format!("Letter {n}"),
        json!({"jobTitle": format!("Role {n}")}),
        json!({"coverLetter": format!("Letter body {n}")}),
    )
}

#[tokio::test]
async fn fifty_first_entry_evicts_exactly_the_oldest() -> Result<()> {
    let history = HistoryStore::new(Arc::new(MemoryStore::new()));
    assert_eq!(history.capacity(), HISTORY_CAPACITY);

    let mut appended = Vec::new();
    for n in 0..HISTORY_CAPACITY {
        let e = entry(n);
        appended.push(e.clone());
        assert!(history.append(e).await?.is_empty());
    }
    assert_eq!(history.len().await?, 50);

    let evicted = history.append(entry(50)).await?;
    assert_eq!(evicted.len(), 1);
    assert_eq!(evicted[0].id, appended[0].id);

    let remaining = history.list().await?;
    assert_eq!(remaining.len(), 50);
    assert_eq!(remaining[0].title, "Letter 50");
    let expected: Vec<_> = appended[1..].iter().rev().map(|e| e.id).collect();
    let actual: Vec<_> = remaining[1..].iter().map(|e| e.id).collect();
    assert_eq!(actual, expected);
    Ok(())
}

#[tokio::test]
async fn file_backed_history_survives_reopen() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let first = entry(1);
    {
        let history = HistoryStore::new(Arc::new(FileStore::new(dir.path())));
        history.append(first.clone()).await?;
        history.append(entry(2)).await?;
    }

    let reopened = HistoryStore::new(Arc::new(FileStore::new(dir.path())));
    assert_eq!(reopened.len().await?, 2);
    assert_eq!(reopened.get(first.id).await?, Some(first.clone()));

    assert!(reopened.remove(first.id).await?);
    assert!(!reopened.remove(first.id).await?);
    assert_eq!(reopened.len().await?, 1);

    reopened.clear().await?;
    assert!(reopened.is_empty().await?);
    Ok(())
}

#[tokio::test]
async fn corrupted_history_is_reported_not_dropped() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.set(careerflow::client::HISTORY_KEY, "{not json".to_string()).await?;

    let history = HistoryStore::new(store.clone());
    assert!(matches!(history.list().await, Err(CareerFlowError::History(_))));
    assert!(matches!(history.append(entry(1)).await, Err(CareerFlowError::History(_))));
    assert_eq!(store.get(careerflow::client::HISTORY_KEY).await?.as_deref(), Some("{not json"));
    Ok(())
}

#[tokio::test]
async fn smaller_capacity_is_honoured() -> Result<()> {
    let history = HistoryStore::new(Arc::new(MemoryStore::new())).with_capacity(2);
    history.append(entry(1)).await?;
    history.append(entry(2)).await?;
    let evicted = history.append(entry(3)).await?;
    assert_eq!(evicted[0].title, "Letter 1");
    let titles: Vec<_> = history.list().await?.into_iter().map(|e| e.title).collect();
    assert_eq!(titles, vec!["Letter 3", "Letter 2"]);
    Ok(())
}

#[test]
fn entries_serialize_with_camel_case_timestamps() {
    let value = serde_json::to_value(entry(7)).unwrap();
    assert!(value.get("createdAt").is_some());
    assert_eq!(value["flow"], "cover-letter");
}
