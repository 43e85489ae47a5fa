use serde_json::json;

use crate::auth::hash_password;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

pub fn hash(password: &str, cost: u32, output_format: OutputFormat) -> anyhow::Result<()> {
    let hash = hash_password(password, cost)?;

    match output_format {
        OutputFormat::Json => output_success(output_format, "Password hashed", Some(json!({ "hash": hash }))),
        // Bare hash so it can be piped into SQL or an env file
        OutputFormat::Text => {
            println!("{}", hash);
            Ok(())
        }
    }
}
