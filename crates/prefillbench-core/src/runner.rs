use anyhow::Result;
use tracing::warn;

use crate::provider::{ProviderError, ProviderRegistry};
use prefillbench_types::{ModelConfig, ResultRecord, RunResult, TestCase};

pub struct RunnerBuilder {
	cases: Vec<TestCase>,
	models: Vec<ModelConfig>,
	registry: Option<ProviderRegistry>,
}

impl RunnerBuilder {
	pub fn new() -> Self {
		Self {
			cases: Vec::new(),
			models: Vec::new(),
			registry: None,
		}
	}

	pub fn cases<I>(mut self, cases: I) -> Self
	where
		I: IntoIterator<Item = TestCase>,
	{
		self.cases = cases.into_iter().collect();
		self
	}

	pub fn models<I>(mut self, models: I) -> Self
	where
		I: IntoIterator<Item = ModelConfig>,
	{
		self.models = models.into_iter().collect();
		self
	}

	pub fn registry(mut self, registry: ProviderRegistry) -> Self {
		self.registry = Some(registry);
		self
	}

	pub fn build(self) -> Result<Runner> {
		Ok(Runner {
			cases: self.cases,
			models: self.models,
			registry: self.registry.ok_or_else(|| anyhow::anyhow!("registry must be set"))?,
		})
	}
}

impl Default for RunnerBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Debug)]
pub struct Runner {
	cases: Vec<TestCase>,
	models: Vec<ModelConfig>,
	registry: ProviderRegistry,
}

impl Runner {
	pub fn builder() -> RunnerBuilder {
		RunnerBuilder::new()
	}

	/// Number of records one `run` will produce.
	pub fn combination_count(&self) -> usize {
		self.cases
			.iter()
			.map(|case| self.models.len() * case.prefixes.len())
			.sum()
	}

	/// Attempt every (case, model, prefix) combination, strictly in that
	/// nested order and one request in flight at a time. A failed dispatch
	/// becomes a record with `has_error` set; the run never aborts.
	pub async fn run(&self) -> RunResult {
		let mut records = Vec::with_capacity(self.combination_count());

		for case in &self.cases {
			for model in &self.models {
				for prefix in &case.prefixes {
					let record = match self.dispatch(model, &case.prompt, prefix).await {
						Ok(response) => ResultRecord {
							model: model.display_name().to_string(),
							developer: model.developer.clone(),
							prefix: prefix.clone(),
							prompt: case.prompt.clone(),
							response,
							description: case.description.clone(),
							has_error: false,
						},
						Err(err) => {
							warn!(
								model = %model.name,
								prefix = %prefix,
								error = %err,
								"dispatch failed"
							);
							ResultRecord {
								model: model.display_name().to_string(),
								developer: model.developer.clone(),
								prefix: prefix.clone(),
								prompt: case.prompt.clone(),
								response: err.to_string(),
								description: case.description.clone(),
								has_error: true,
							}
						}
					};
					records.push(record);
				}
			}
		}

		let summary = RunResult::summarize(&records);
		RunResult { records, summary }
	}

	async fn dispatch(
		&self,
		model: &ModelConfig,
		prompt: &str,
		prefix: &str,
	) -> Result<String, ProviderError> {
		let provider = self.registry.get(model.routing_tag())?;
		provider.complete(&model.name, prompt, prefix).await
	}
}
