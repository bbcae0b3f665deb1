//! `agentdist route`: print the routing decision as JSON.

use super::{CliResult, load_config, open_catalog, open_provider};
use agentdist_agent::{HierarchicalRouter, Oracle, PlanBuilder};
use std::path::Path;

pub async fn run(query: &str, catalog_file: Option<&Path>) -> CliResult {
    let config = load_config()?;
    let provider = open_provider(&config)?;
    let catalog = open_catalog(&config, catalog_file)?;

    let oracle = Oracle::new(provider, &config.default_model)
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens);
    let router = HierarchicalRouter::new(oracle, catalog).without_cache();

    let decision = router.route(query).await?;
    let plan = PlanBuilder::build(&decision);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
