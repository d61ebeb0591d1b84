// Run the built-in suite against whichever providers have credentials set.
//
// To run from the workspace root:
//   OPENAI_API_KEY=sk-... cargo run -p prefillbench-core --example builtin_suite
//
// Providers without a key still produce records; their rows just carry the
// missing-credential error.

use prefillbench_core::{
    artifact, render_page, ProviderRegistry, ReportOptions, Runner, SuiteConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let suite = SuiteConfig::default();

    let runner = Runner::builder()
        .cases(suite.cases)
        .models(suite.models)
        .registry(ProviderRegistry::from_env())
        .build()?;

    println!("Running {} combinations...\n", runner.combination_count());
    let result = runner.run().await;
    println!("{}", result.summary_table());

    artifact::write_records(artifact::DEFAULT_ARTIFACT_PATH, &result.records).await?;
    println!("Artifact written to {}", artifact::DEFAULT_ARTIFACT_PATH);

    let page = render_page(&result.records, &ReportOptions::default());
    tokio::fs::write("public/index.html", page).await?;
    println!("Results page written to public/index.html");

    Ok(())
}
