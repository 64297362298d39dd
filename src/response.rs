//! Handler results and their wire encoding.

use crate::error::AppError;
use crate::service::KvRecord;
use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by a handler.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Written unchanged.
    Bytes(Bytes),
    /// Written verbatim.
    Text(String),
    /// JSON-encoded before writing.
    Json(Value),
}

impl Payload {
    pub fn json<T: Serialize>(data: &T) -> Result<Self, AppError> {
        serde_json::to_value(data)
            .map(Payload::Json)
            .map_err(|e| AppError::Binding(format!("response encoding: {}", e)))
    }

    /// Encoded body plus the content type to advertise.
    pub fn encode(self) -> Result<(Vec<u8>, &'static str), AppError> {
        Ok(match self {
            Payload::Bytes(b) => (b.to_vec(), "application/octet-stream"),
            Payload::Text(s) => (s.into_bytes(), "text/plain; charset=utf-8"),
            Payload::Json(v) => (
                serde_json::to_vec(&v).map_err(|e| AppError::Binding(e.to_string()))?,
                "application/json",
            ),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub payload: Payload,
}

impl ApiResponse {
    pub fn new(status: StatusCode, payload: Payload) -> Self {
        ApiResponse { status, payload }
    }

    pub fn ok_json<T: Serialize>(data: &T) -> Result<Self, AppError> {
        Ok(ApiResponse::new(StatusCode::OK, Payload::json(data)?))
    }

    pub fn created_json<T: Serialize>(data: &T) -> Result<Self, AppError> {
        Ok(ApiResponse::new(StatusCode::CREATED, Payload::json(data)?))
    }

    pub fn text(status: StatusCode, s: impl Into<String>) -> Self {
        ApiResponse::new(status, Payload::Text(s.into()))
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.status;
        match self.payload.encode() {
            Ok((body, content_type)) => {
                let mut res = (status, body).into_response();
                res.headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
                res
            }
            Err(e) => e.into_response(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordsResponse {
    pub records: Vec<KvRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdsResponse {
    pub ids: Vec<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NumChangedResponse {
    pub num_changed: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableNamesResponse {
    pub names: Vec<String>,
}
