//! Lists active incidents and bumps the priority of one of them.
//!
//! Run with: cargo run --example list_incidents
//!
//! Requires .env file with:
//! - SNOW_INSTANCE (e.g. `dev12345`)
//! - SNOW_USERNAME
//! - SNOW_PASSWORD
//! - SNOW_INCIDENT (an incident number, e.g. `INC0010001`)

use std::env;

use futures::TryStreamExt;
use serde_json::json;
use snowtable_lib::ClientConfig;
use snowtable_lib::TableClient;
use snowtable_lib::api::query::Filter;
use snowtable_lib::api::query::RequestOptions;
use snowtable_lib::transport::Auth;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let instance = env::var("SNOW_INSTANCE").expect("SNOW_INSTANCE not set");
    let username = env::var("SNOW_USERNAME").expect("SNOW_USERNAME not set");
    let password = env::var("SNOW_PASSWORD").expect("SNOW_PASSWORD not set");
    let number = env::var("SNOW_INCIDENT").expect("SNOW_INCIDENT not set");

    let client = TableClient::builder()
        .instance(&instance)
        .auth(Auth::basic(username, password))
        .config(ClientConfig::default().with_reporting(true))
        .build()?;

    let incidents = client.table("incident");

    let filter = Filter::eq("active", true).and_also(Filter::or([
        Filter::eq("priority", 1),
        Filter::eq("priority", 2),
    ]));
    let options = RequestOptions::new()
        .fields(["number", "short_description", "priority"])
        .order_by(["-sys_created_on"])
        .generator_size(50);

    let response = incidents.get(filter, &options).await?;
    let report = response.report().cloned();

    let mut records = response.stream();
    while let Some(record) = records.try_next().await? {
        println!(
            "{:<12} P{} {}",
            record.get_str("number")?.unwrap_or("-"),
            record.get_str("priority")?.unwrap_or("?"),
            record.get_str("short_description")?.unwrap_or(""),
        );
    }

    if let Some(report) = report {
        let state = report.snapshot();
        println!(
            "\n{} records in {} pages ({:?})",
            state.record_count(),
            state.pages.len(),
            state.total_elapsed()
        );
    }

    let updated = incidents
        .update(format!("number={}", number), &json!({"priority": "1"}))
        .await?;
    println!("\nUpdated {} ({})", number, updated.sys_id()?);

    Ok(())
}
