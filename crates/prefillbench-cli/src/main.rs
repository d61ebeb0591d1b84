use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prefillbench_core::{
	artifact, render_page, ProviderRegistry, ReportOptions, Runner, SuiteConfig,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(name = "prefillbench", about = "Trial assistant prefills across LLM providers")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Run every (case, model, prefix) combination and write the artifact
	Run(RunArgs),
	/// Render the results page from an existing artifact
	Report(ReportArgs),
}

#[derive(Debug, Clone, Parser)]
struct RunArgs {
	/// Suite file (YAML or JSON) with fields: { "cases": [...], "models": [...] };
	/// defaults to the built-in suite
	#[arg(long)]
	config: Option<PathBuf>,

	/// Where to write the JSON artifact
	#[arg(long, default_value = artifact::DEFAULT_ARTIFACT_PATH)]
	out: PathBuf,

	/// Also render the HTML results page to this path
	#[arg(long)]
	report: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
struct ReportArgs {
	/// JSON artifact produced by `run`; a missing or unparsable file renders
	/// the empty state
	#[arg(long, default_value = artifact::DEFAULT_ARTIFACT_PATH)]
	artifact: PathBuf,

	/// Output HTML file
	#[arg(long, default_value = "public/index.html")]
	out: PathBuf,

	/// Record field the dropdown filter matches on (developer or provider,
	/// depending on the artifact)
	#[arg(long, default_value = "developer")]
	category_field: String,

	/// Page heading
	#[arg(long, default_value = "LLM Prefilling")]
	title: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	FmtSubscriber::builder()
		.with_max_level(Level::INFO)
		.with_target(false)
		.compact()
		.init();

	let cli = Cli::parse();
	match cli.command {
		Commands::Run(args) => run(args).await?,
		Commands::Report(args) => report(args).await?,
	}
	Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
	let suite = match &args.config {
		Some(path) => SuiteConfig::load(path).await?,
		None => SuiteConfig::default(),
	};

	let runner = Runner::builder()
		.cases(suite.cases)
		.models(suite.models)
		.registry(ProviderRegistry::from_env())
		.build()?;

	info!("Running {} combinations", runner.combination_count());
	let result = runner.run().await;
	println!("{}", result.summary_table());

	artifact::write_records(&args.out, &result.records).await?;
	info!("Artifact written to {}", args.out.display());

	if let Some(path) = args.report {
		write_page(&path, &result.records, &ReportOptions::default()).await?;
	}

	Ok(())
}

async fn report(args: ReportArgs) -> Result<()> {
	let records = artifact::load_records(&args.artifact).await;
	let options = ReportOptions {
		title: args.title,
		category_field: args.category_field,
	};
	write_page(&args.out, &records, &options).await
}

async fn write_page(
	path: &PathBuf,
	records: &[prefillbench_core::ResultRecord],
	options: &ReportOptions,
) -> Result<()> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			tokio::fs::create_dir_all(parent)
				.await
				.with_context(|| format!("Failed to create {:?}", parent))?;
		}
	}
	let page = render_page(records, options);
	tokio::fs::write(path, page)
		.await
		.with_context(|| format!("Failed to write {:?}", path))?;
	info!("Results page written to {}", path.display());
	Ok(())
}
