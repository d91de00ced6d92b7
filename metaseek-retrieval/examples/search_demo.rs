//! Run a handful of queries against the bundled job collection.
//!
//! ```sh
//! cargo run --example search_demo
//! RUST_LOG=debug cargo run --example search_demo
//! ```

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use metaseek_core::config::SearchConfig;
use metaseek_core::outcome::OutcomeKind;
use metaseek_embed::HashedTermProvider;
use metaseek_retrieval::{SearchEngine, SearchOptions};
use test_fixtures::{fixed_now, job_mapping, job_store};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = job_store();
    let provider = HashedTermProvider::default();
    let engine = SearchEngine::new(&store, job_mapping(), SearchConfig::default())
        .with_clock(fixed_now)
        .with_embedding_provider(&provider);

    let queries = [
        "status:failed",
        "latest database jobs that failed",
        "how many jobs failed last week",
        "import customer data into the warehouse",
        "id:job-007",
    ];

    for query in queries {
        let outcome = engine.search(query, &SearchOptions::default())?;
        println!("query: {query}");
        println!("  strategy: {:?}  degraded: {}", outcome.strategy, outcome.degraded);
        match &outcome.kind {
            OutcomeKind::Count(n) => println!("  count: {n}"),
            OutcomeKind::Records(matches) => {
                for m in matches {
                    println!(
                        "  {}  combined={:.3}  structured={:.1}  vector={:.3}",
                        m.record_id, m.combined_score, m.structured_score, m.vector_score
                    );
                }
            }
        }
        println!();
    }

    Ok(())
}
