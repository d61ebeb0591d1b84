use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use prefillbench_types::ResultRecord;

/// Where the generator writes and the viewer reads, unless told otherwise.
pub const DEFAULT_ARTIFACT_PATH: &str = "public/test-results.json";

/// Serialize the full record list as one pretty-printed JSON document.
/// This is the generator's only fatal error path; partial writes are not
/// attempted.
pub async fn write_records(path: impl AsRef<Path>, records: &[ResultRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
    }

    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

/// Viewer-side read. A missing or unparsable artifact degrades to an empty
/// record list; the page shows its empty state instead of an error.
pub async fn load_records(path: impl AsRef<Path>) -> Vec<ResultRecord> {
    let path = path.as_ref();
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "artifact not readable, showing empty results");
            return Vec::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(records) => records,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "artifact not parsable, showing empty results");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ResultRecord {
        ResultRecord {
            model: "claude-3-5-haiku-latest".to_string(),
            developer: "anthropic".to_string(),
            prefix: "<product>".to_string(),
            prompt: "Extract as XML".to_string(),
            response: "<name>SmartHome Mini</name></product>".to_string(),
            description: "Formatting (XML)".to_string(),
            has_error: false,
        }
    }

    #[tokio::test]
    async fn write_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("test-results.json");

        write_records(&path, &[record(), record()]).await.unwrap();
        let loaded = load_records(&path).await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].model, "claude-3-5-haiku-latest");
        assert!(!loaded[0].has_error);
    }

    #[tokio::test]
    async fn written_artifact_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test-results.json");

        write_records(&path, &[record()]).await.unwrap();
        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(raw.contains("\"hasError\": false"));
        assert!(!raw.contains("has_error"));
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_records(dir.path().join("nope.json")).await;
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn load_garbage_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test-results.json");
        tokio::fs::write(&path, "not json at all {{{").await.unwrap();

        let loaded = load_records(&path).await;
        assert!(loaded.is_empty());
    }
}
