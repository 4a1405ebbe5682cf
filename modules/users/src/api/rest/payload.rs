use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Form,
};
use serde_json::{Map, Value};

use crate::api::rest::dto::SearchQuery;
use crate::api::rest::error::ApiError;

/// Request body as loosely-typed JSON, decoded from either
/// `application/json` or `application/x-www-form-urlencoded`.
///
/// An empty body decodes to `{}` so that schema validation reports the
/// missing fields instead of a parse failure.
#[derive(Debug, Clone)]
pub struct UserPayload(pub Value);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

impl<S> FromRequest<S> for UserPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(fields) = Form::<BTreeMap<String, String>>::from_request(req, state)
                .await
                .map_err(|_| ApiError::invalid_body())?;
            let object: Map<String, Value> = fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            return Ok(Self(Value::Object(object)));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::invalid_body())?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Object(Map::new())));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|_| ApiError::invalid_body())
    }
}

/// Query string of `GET /users/search`; malformed input (a repeated `query`
/// parameter, for one) is rejected with the JSON error body.
#[derive(Debug, Clone, Default)]
pub struct SearchParams(pub SearchQuery);

impl<S> FromRequestParts<S> for SearchParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<SearchQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::invalid_query())?;
        Ok(Self(query))
    }
}
