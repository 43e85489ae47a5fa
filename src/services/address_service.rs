use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AddressConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub cep: String,
    pub street: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("Address provider request failed: {0}")]
    Upstream(String),
}

/// Resolves a normalized 8-digit CEP; `Ok(None)` when the CEP does not exist
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup(&self, cep: &str) -> Result<Option<Address>, AddressError>;
}

/// Strip punctuation and require exactly eight digits
pub fn normalize_cep(raw: &str) -> Option<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | '.' | ' '))
        .collect();
    if digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

/// ViaCEP wire format
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    complemento: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    /// ViaCEP answers 200 with `"erro": true` (or `"true"`) for unknown CEPs
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s == "true",
            _ => false,
        }
    }

    fn into_address(self) -> Option<Address> {
        if self.is_error() {
            return None;
        }
        Some(Address {
            cep: self.cep,
            street: self.logradouro,
            complement: self.complemento,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
        })
    }
}

pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(config: &AddressConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.viacep_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Result<Option<Address>, AddressError> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AddressError::Upstream(e.to_string()))?;

        // ViaCEP answers 400 for malformed CEPs; we only send normalized ones
        if response.status() == reqwest::StatusCode::NOT_FOUND
            || response.status() == reqwest::StatusCode::BAD_REQUEST
        {
            return Ok(None);
        }

        let body = response
            .error_for_status()
            .map_err(|e| AddressError::Upstream(e.to_string()))?
            .json::<ViaCepResponse>()
            .await
            .map_err(|e| AddressError::Upstream(e.to_string()))?;

        Ok(body.into_address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cep_normalization() {
        assert_eq!(normalize_cep("01310-100").as_deref(), Some("01310100"));
        assert_eq!(normalize_cep("01.310-100").as_deref(), Some("01310100"));
        assert_eq!(normalize_cep("01310100").as_deref(), Some("01310100"));
        assert_eq!(normalize_cep("0131010"), None);
        assert_eq!(normalize_cep("0131010a"), None);
        assert_eq!(normalize_cep(""), None);
    }

    #[test]
    fn maps_viacep_fields() {
        let body: ViaCepResponse = serde_json::from_value(serde_json::json!({
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308"
        }))
        .unwrap();

        let address = body.into_address().unwrap();
        assert_eq!(address.street, "Avenida Paulista");
        assert_eq!(address.neighborhood, "Bela Vista");
        assert_eq!(address.city, "São Paulo");
        assert_eq!(address.state, "SP");
    }

    #[test]
    fn erro_flag_means_unknown_cep() {
        let body: ViaCepResponse = serde_json::from_value(serde_json::json!({ "erro": true })).unwrap();
        assert!(body.into_address().is_none());

        let body: ViaCepResponse = serde_json::from_value(serde_json::json!({ "erro": "true" })).unwrap();
        assert!(body.into_address().is_none());
    }
}
