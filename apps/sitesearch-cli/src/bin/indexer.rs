use std::env;
use sitesearch_core::config::Config;
use sitesearch_core::logging;
use tracing::error;

fn main() -> anyhow::Result<()> {
    logging::init();
    let settings = Config::load()
        .and_then(|c| c.settings())
        .map_err(|e| { error!(error = %e, "failed to load configuration"); e })?;
    let base = env::current_dir()?;

    println!("sitesearch index builder\n========================");
    println!("Content directory: {}", settings.paths.content_dir);
    println!("Settings directory: {}", settings.paths.settings_dir);

    let report = sitesearch_index::run(&settings, &base, true)
        .map_err(|e| { error!(error = %e, "index build failed"); e })?;

    println!("\n✅ Index built: {}", report.output.display());
    println!("📊 {} files seen, {} unclassified, {} skipped", report.files_seen, report.files_unclassified, report.files_skipped);
    println!("📊 {} documents → {} chunks, {} vocabulary terms", report.documents, report.chunks, report.vocabulary);
    if report.chunks == 0 { println!("⚠️  No documents found; wrote an empty index"); }
    println!("\n💡 To query it, use: cargo run --bin sitesearch-query '<query>'");
    Ok(())
}
