//! `agentdist catalog`: list what the registry offers.

use super::{CliResult, load_config, open_catalog};
use agentdist_core::catalog::Catalog;
use std::path::Path;

pub async fn run(catalog_file: Option<&Path>) -> CliResult {
    let config = load_config()?;
    let catalog = open_catalog(&config, catalog_file)?;
    print!("{}", render(catalog.as_ref()).await?);
    Ok(())
}

/// Intent groups with their clusters and agents, as an indented tree.
async fn render(catalog: &dyn Catalog) -> CliResult<String> {
    let intents = catalog.list_intents().await?;
    let agents = catalog.list_agents().await?;
    let mut out = String::new();

    for (intent, group) in &intents {
        out.push_str(&format!("{intent}: {}\n", group.description));
        let clusters = catalog.list_capabilities(intent).await.unwrap_or_default();
        for (cluster, description) in &clusters {
            out.push_str(&format!("  {cluster}: {description}\n"));
            for agent in agents
                .iter()
                .filter(|a| &a.intent_group == intent && &a.capability_cluster == cluster)
            {
                let flag = if agent.requires_confirmation {
                    " [confirm]"
                } else {
                    ""
                };
                out.push_str(&format!("    - {}{flag}: {}\n", agent.name, agent.description));
            }
        }
    }

    let orphans: Vec<_> = agents
        .iter()
        .filter(|a| !intents.contains_key(&a.intent_group))
        .collect();
    if !orphans.is_empty() {
        out.push_str("(no intent group)\n");
        for agent in orphans {
            out.push_str(&format!("    - {}: {}\n", agent.name, agent.description));
        }
    }

    Ok(out)
}
