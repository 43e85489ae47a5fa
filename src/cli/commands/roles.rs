use anyhow::anyhow;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::services::UserService;
use crate::types::Role;

use super::database::connect;

pub async fn grant(email: &str, role: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let role: Role = role.parse().map_err(|e: String| anyhow!(e))?;
    let users = UserService::new(connect().await?);
    let user = users
        .find_by_email(email)
        .await?
        .ok_or_else(|| anyhow!("no user with email {}", email))?;

    let changed = users.grant_role(user.id, role).await?;
    let message = if changed {
        format!("Granted {} to {}", role, user.email)
    } else {
        format!("{} already has {}", user.email, role)
    };

    output_success(
        output_format,
        &message,
        Some(json!({ "user_id": user.id, "role": role, "changed": changed })),
    )
}

pub async fn revoke(email: &str, role: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let role: Role = role.parse().map_err(|e: String| anyhow!(e))?;
    let users = UserService::new(connect().await?);
    let user = users
        .find_by_email(email)
        .await?
        .ok_or_else(|| anyhow!("no user with email {}", email))?;

    let changed = users.revoke_role(user.id, role).await?;
    let message = if changed {
        format!("Revoked {} from {}", role, user.email)
    } else {
        format!("{} did not have {}", user.email, role)
    };

    output_success(
        output_format,
        &message,
        Some(json!({ "user_id": user.id, "role": role, "changed": changed })),
    )
}
