//! Request body validation.
//!
//! Handlers take `ValidatedJson<T>` instead of `Json<T>`; the extractor
//! rejects malformed JSON with `INVALID_JSON` and failed rules with
//! `VALIDATION_ERROR` plus one message per offending field. `ApiPath` and
//! `ApiQuery` do the same for path and query parameters (`BAD_REQUEST`).

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::auth::MIN_PASSWORD_LENGTH;
use crate::error::{ApiError, FieldErrors};

pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// JSON body that has passed `Validate`
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::invalid_json(rejection.body_text()))?;

        value
            .validate()
            .map_err(|field_errors| ApiError::validation_error("Validation failed", Some(field_errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// `Path<T>` whose rejection uses the API error envelope
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(ApiPath(value))
    }
}

/// `Query<T>` whose rejection uses the API error envelope
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}

/// Accumulates the first failure per field
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors
                .entry(field.to_string())
                .or_insert_with(|| message.to_string());
        }
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, !value.trim().is_empty(), "This field is required")
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        let ok = value.chars().count() <= max;
        self.check(field, ok, &format!("Must be at most {} characters", max))
    }

    pub fn optional_max_len(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        match value {
            Some(v) => self.max_len(field, v, max),
            None => self,
        }
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, is_valid_email(value), "Invalid email format")
    }

    pub fn optional_email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.is_empty() => self.email(field, v),
            _ => self,
        }
    }

    pub fn password(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(
            field,
            value.chars().count() >= MIN_PASSWORD_LENGTH,
            &format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        )
    }

    /// Accepts absolute http(s) URLs and paths under our own uploads prefix
    pub fn optional_url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.is_empty() => self.check(
                field,
                v.starts_with("https://") || v.starts_with("http://") || v.starts_with("/uploads/"),
                "Must be an http(s) URL or an uploaded file path",
            ),
            _ => self,
        }
    }

    pub fn latitude(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        let ok = value.map_or(true, |v| (-90.0..=90.0).contains(&v));
        self.check(field, ok, "Latitude must be between -90 and 90")
    }

    pub fn longitude(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        let ok = value.map_or(true, |v| (-180.0..=180.0).contains(&v));
        self.check(field, ok, "Longitude must be between -180 and 180")
    }

    pub fn non_negative(&mut self, field: &str, value: i64) -> &mut Self {
        self.check(field, value >= 0, "Must not be negative")
    }

    pub fn finish(&mut self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return false;
    }
    let domain = parts[1];
    domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
