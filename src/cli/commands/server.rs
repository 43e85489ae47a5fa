use anyhow::anyhow;
use serde_json::{json, Value};

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

pub async fn health(url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let endpoint = format!("{}/health", url.trim_end_matches('/'));
    let response = reqwest::Client::new().get(&endpoint).send().await?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    let database = body
        .pointer("/data/database")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    if status.is_success() {
        output_success(
            output_format,
            &format!("{} is healthy (database: {})", url, database),
            Some(json!({ "url": url, "status": status.as_u16(), "database": database })),
        )
    } else {
        output_error(
            output_format,
            &format!("{} is unhealthy (HTTP {}, database: {})", url, status, database),
            Some("UNHEALTHY"),
        )?;
        Err(anyhow!("health check failed"))
    }
}
