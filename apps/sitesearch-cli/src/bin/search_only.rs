use std::env;
use sitesearch_core::config::Config;
use sitesearch_core::logging;
use sitesearch_core::traits::Retriever;
use sitesearch_query::SnapshotRetriever;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <query>", args[0]);
        eprintln!("Example: {} 'local seo for small business'", args[0]);
        std::process::exit(1);
    }
    logging::init();
    let query_text = &args[1];
    let settings = Config::load()?.settings()?;
    let retriever = SnapshotRetriever::from_settings(&settings, &env::current_dir()?);
    let options = settings.query.search_options().with_k(settings.query.cli_k);

    println!("🔍 sitesearch-query\n==================");
    println!("Query: {}", query_text);
    println!("Index: {}", retriever.path().display());

    let hits = retriever.search(query_text, &options);
    println!("\n🔍 Found {} results for: \"{}\"", hits.len(), query_text);
    for (i, hit) in hits.iter().enumerate() {
        println!("\n  {}. score={:.4}  path={}  title={}", i + 1, hit.score, hit.source_path, hit.title);
        println!("     📝 {}", hit.text);
    }
    Ok(())
}
