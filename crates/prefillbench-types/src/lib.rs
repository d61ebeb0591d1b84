use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// A prompt plus the prefill strings to trial against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
	pub description: String,
	pub prompt: String,
	pub prefixes: Vec<String>,
}

impl TestCase {
	pub fn new(
		description: impl Into<String>,
		prompt: impl Into<String>,
		prefixes: Vec<String>,
	) -> Self {
		Self {
			description: description.into(),
			prompt: prompt.into(),
			prefixes,
		}
	}
}

/// A model under test. `provider` overrides `developer` when routing requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
	pub name: String,
	pub developer: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub provider: Option<String>,
}

impl ModelConfig {
	pub fn new(name: impl Into<String>, developer: impl Into<String>) -> Self {
		Self { name: name.into(), developer: developer.into(), provider: None }
	}

	pub fn with_provider(
		name: impl Into<String>,
		developer: impl Into<String>,
		provider: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			developer: developer.into(),
			provider: Some(provider.into()),
		}
	}

	/// The provider tag requests are dispatched on.
	pub fn routing_tag(&self) -> &str {
		self.provider.as_deref().unwrap_or(&self.developer)
	}

	/// Last path segment of the model id; Fireworks ids look like
	/// `accounts/fireworks/models/llama-v3p1-70b-instruct`.
	pub fn display_name(&self) -> &str {
		self.name.rsplit('/').next().unwrap_or(&self.name)
	}
}

/// One row of the output artifact.
///
/// Serialized with camelCase keys (`hasError`) so the JSON file keeps the
/// shape the viewer page already understands. Every field defaults on
/// deserialize; rows from older artifacts render blank, not broken.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultRecord {
	pub model: String,
	pub developer: String,
	pub prefix: String,
	pub prompt: String,
	pub response: String,
	pub description: String,
	pub has_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
	pub total: usize,
	pub succeeded: usize,
	pub failed: usize,
	pub error_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
	pub records: Vec<ResultRecord>,
	pub summary: RunSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
struct SummaryRow {
	model: String,
	developer: String,
	ok: String,
	prefix: String,
	description: String,
	response: String,
}

impl RunResult {
	pub fn summarize(records: &[ResultRecord]) -> RunSummary {
		let total = records.len();
		let failed = records.iter().filter(|r| r.has_error).count();
		let succeeded = total - failed;
		let error_rate = if total == 0 { 0.0 } else { failed as f64 / total as f64 };

		RunSummary { total, succeeded, failed, error_rate }
	}

	pub fn summary_table(&self) -> String {
		use tabled::Table;
		let rows: Vec<SummaryRow> = self.records.iter().map(|r| {
			let ok = if r.has_error { "✗" } else { "✓" };

			SummaryRow {
				model: r.model.clone(),
				developer: r.developer.clone(),
				ok: ok.to_string(),
				prefix: truncate(r.prefix.clone(), 32),
				description: r.description.clone(),
				response: truncate(r.response.clone(), 64),
			}
		}).collect();

		let table = Table::new(rows);
		let table_str = table.to_string();

		let summary_text = format!(
			"Total: {}  Succeeded: {}  Failed: {}  Error rate: {:.1}%",
			self.summary.total,
			self.summary.succeeded,
			self.summary.failed,
			self.summary.error_rate * 100.0,
		);

		format!("{}\n\n{}\n", table_str, summary_text)
	}
}

fn truncate(s: String, max_len: usize) -> String {
	if s.len() <= max_len {
		return s;
	}
	let mut truncated = s.chars().take(max_len.saturating_sub(1)).collect::<String>();
	truncated.push('…');
	truncated
}
