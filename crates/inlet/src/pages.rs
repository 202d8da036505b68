// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `inlet pages` command implementation.
//!
//! Lists the pages an app's access token administers, the same data used
//! when registering an integration's owned page set.

use inlet_config::model::InletConfig;
use inlet_core::InletError;
use inlet_graph::GraphClient;

pub async fn run(config: &InletConfig, app_id: &str) -> Result<(), InletError> {
    let app = config
        .facebook
        .apps
        .iter()
        .find(|app| app.id == app_id)
        .ok_or_else(|| InletError::NotFound {
            kind: "facebook app",
            id: app_id.to_string(),
        })?;

    let client = GraphClient::new(config.facebook.graph_base_url.clone())?;
    let pages = client.get_page_list(&app.access_token).await?;

    if pages.is_empty() {
        println!("no pages found for app {app_id}");
        return Ok(());
    }

    for page in pages {
        println!("{}\t{}", page.id, page.name);
    }
    Ok(())
}
