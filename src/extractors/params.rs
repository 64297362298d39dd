//! Merge path and query parameters and validate the ones a handler asks for.

use crate::error::AppError;
use crate::service::ValidatorRegistry;
use axum::body::Bytes;
use axum::http::Method;
use std::collections::HashMap;
use std::sync::Arc;

/// Validated parameters by name.
pub type ParamMap = HashMap<String, String>;

/// What a handler sees of one inbound request.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    /// Registered route pattern the request matched, e.g. `/apid/db/_table/:table_name`.
    pub route: String,
    pub path_params: HashMap<String, String>,
    /// Query pairs in the order they appeared.
    pub query: Vec<(String, String)>,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: Method, route: impl Into<String>) -> Self {
        ApiRequest {
            method,
            route: route.into(),
            path_params: HashMap::new(),
            query: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_query(mut self, query: &[(&str, &str)]) -> Self {
        self.query = query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self
    }

    pub fn with_path_params(mut self, params: &[(&str, &str)]) -> Self {
        self.path_params = params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// First query value for `name`.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// Where path-derived parameters come from.
pub trait PathParamSource: Send + Sync {
    fn path_params(&self, req: &ApiRequest) -> HashMap<String, String>;
}

/// Parameters the router captured from the matched route.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchedPathParams;

impl PathParamSource for MatchedPathParams {
    fn path_params(&self, req: &ApiRequest) -> HashMap<String, String> {
        req.path_params.clone()
    }
}

#[derive(Clone)]
pub struct ParamExtractor {
    validators: ValidatorRegistry,
    path_source: Arc<dyn PathParamSource>,
}

impl ParamExtractor {
    pub fn new(validators: ValidatorRegistry, path_source: Arc<dyn PathParamSource>) -> Self {
        ParamExtractor { validators, path_source }
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// Validate each named parameter. Path values win over query values, a missing
    /// parameter is validated as `""`, and the first failure is returned.
    pub fn fetch_params(&self, req: &ApiRequest, names: &[&str]) -> Result<ParamMap, AppError> {
        self.collect(req, names, true)
    }

    /// Like `fetch_params`, but names the request does not carry at all are left out
    /// instead of being validated as `""`.
    pub fn fetch_optional_params(&self, req: &ApiRequest, names: &[&str]) -> Result<ParamMap, AppError> {
        self.collect(req, names, false)
    }

    fn collect(&self, req: &ApiRequest, names: &[&str], fill_missing: bool) -> Result<ParamMap, AppError> {
        let path = self.path_source.path_params(req);
        let mut out = ParamMap::with_capacity(names.len());
        for name in names {
            let raw = match path.get(*name).map(String::as_str).or_else(|| req.query_value(name)) {
                Some(raw) => raw,
                None if fill_missing => "",
                None => continue,
            };
            let value = self.validators.validate(name, raw)?;
            out.insert(name.to_string(), value);
        }
        Ok(out)
    }

    pub fn get_param(&self, req: &ApiRequest, name: &str) -> Result<String, AppError> {
        let mut params = self.fetch_params(req, &[name])?;
        Ok(params.remove(name).unwrap_or_default())
    }
}

impl std::fmt::Debug for ParamExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamExtractor")
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}
