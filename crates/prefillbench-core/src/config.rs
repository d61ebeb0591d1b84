use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::suite;
use prefillbench_types::{ModelConfig, TestCase};

/// A runnable suite: which prompts to trial, against which models.
///
/// `Default` is the built-in suite; `load` reads a YAML or JSON file of the
/// same shape, dispatched on the file extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    #[serde(default)]
    pub cases: Vec<TestCase>,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            cases: suite::default_test_cases(),
            models: suite::default_models(),
        }
    }
}

impl SuiteConfig {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {:?}", path))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let config: SuiteConfig = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML in {:?}", path))?,
            _ => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {:?}", path))?,
        };
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_builtin_suite() {
        let config = SuiteConfig::default();
        assert_eq!(config.cases.len(), 3);
        assert_eq!(config.models.len(), 7);
    }

    #[tokio::test]
    async fn load_yaml_suite() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        write!(
            file,
            r#"
cases:
  - description: Forced Preference Test
    prompt: What is your favorite color?
    prefixes:
      - "If I had to pick, it would be green because"
models:
  - name: gpt-4o-mini
    developer: openai
  - name: accounts/fireworks/models/qwen2p5-72b-instruct
    developer: alibaba
    provider: fireworks
"#
        )
        .unwrap();

        let config = SuiteConfig::load(file.path()).await.unwrap();
        assert_eq!(config.cases.len(), 1);
        assert_eq!(config.cases[0].prefixes.len(), 1);
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models[1].routing_tag(), "fireworks");
    }

    #[tokio::test]
    async fn load_json_suite() {
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        write!(
            file,
            r#"{{
  "cases": [
    {{ "description": "Formatting (JSON)", "prompt": "Extract as JSON", "prefixes": ["{{"] }}
  ],
  "models": [ {{ "name": "gpt-4o", "developer": "openai" }} ]
}}"#
        )
        .unwrap();

        let config = SuiteConfig::load(file.path()).await.unwrap();
        assert_eq!(config.cases[0].prefixes, vec!["{".to_string()]);
        assert_eq!(config.models[0].name, "gpt-4o");
    }

    #[tokio::test]
    async fn load_missing_file_fails_with_path() {
        let err = SuiteConfig::load("does/not/exist.yaml").await.unwrap_err();
        assert!(err.to_string().contains("exist.yaml"));
    }
}
