//! litscope CLI — run a book analysis from the command line.
//!
//! Usage:
//!   litscope analyze <book-id>      Fetch, analyze, and print the result
//!   litscope status <book-id>       Show which cache tiers hold the book
//!   litscope clear <book-id>        Drop cached text and analysis
//!
//! Environment:
//!   LITSCOPE_API_KEY                Model API key (or OS keyring)
//!   LITSCOPE_MODEL_BASE_URL         OpenAI-compatible endpoint base
//!   LITSCOPE_MODEL                  Model name
//!   RUST_LOG                        Tracing filter (e.g. litscope=debug)

use anyhow::{bail, Result};
use litscope::{
    AnalysisConfig, AnalysisService, CacheConfig, HttpModelProvider, KeyValueCache, MemoryCache,
    TextSource,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (command, book_id) = match (args.get(1), args.get(2)) {
        (Some(command), Some(book_id)) => (command.as_str(), book_id.as_str()),
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };

    let service = build_service()?;
    match command {
        "analyze" => {
            let result = service.get_analysis(book_id).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "status" => {
            let status = service.status(book_id).await;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        "clear" => {
            let cleared = service.clear(book_id).await;
            println!("cleared: {cleared}");
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            bail!("unknown command");
        }
    }
    Ok(())
}

fn build_service() -> Result<AnalysisService> {
    let config = AnalysisConfig::default();
    let cache = Arc::new(KeyValueCache::new(
        CacheConfig::default(),
        Box::new(MemoryCache::new(1024)),
    ));
    let source = TextSource::new(&config, Arc::clone(&cache))?;
    let model = Arc::new(HttpModelProvider::from_env()?);
    Ok(AnalysisService::new(&config, cache, source, model))
}

fn print_usage() {
    println!(
        r#"litscope — literary analysis for public-domain books

USAGE:
    litscope <COMMAND> <BOOK_ID>

COMMANDS:
    analyze <book-id>    Fetch the book, run the analysis, print JSON
    status <book-id>     Show which cache tiers hold entries for the book
    clear <book-id>      Drop cached text and analysis for the book"#
    );
}
