use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(obj)) = (data, response.as_object_mut()) {
                obj.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Pull `error`/`code` out of an API error envelope
pub fn api_error_parts(body: &Value) -> (String, Option<String>) {
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("request failed")
        .to_string();
    let code = body.get("code").and_then(Value::as_str).map(str::to_string);
    (message, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_error_envelope() {
        let body = json!({"success": false, "error": "Admin role required", "code": "FORBIDDEN"});
        assert_eq!(
            api_error_parts(&body),
            ("Admin role required".to_string(), Some("FORBIDDEN".to_string()))
        );

        assert_eq!(api_error_parts(&json!({})), ("request failed".to_string(), None));
    }
}
