//! Path/verb routing table and the dispatcher every route funnels through.

use crate::error::AppError;
use crate::extractors::{ApiRequest, ParamMap};
use crate::response::ApiResponse;
use crate::state::AppState;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Path, Query};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub type HandlerResult = Result<ApiResponse, AppError>;

/// Everything a handler gets: the request and the shared state.
#[derive(Clone)]
pub struct HandlerContext {
    pub req: ApiRequest,
    pub state: AppState,
}

impl HandlerContext {
    pub fn new(req: ApiRequest, state: AppState) -> Self {
        HandlerContext { req, state }
    }

    /// Validated path/query parameters by name.
    pub fn fetch_params(&self, names: &[&str]) -> Result<ParamMap, AppError> {
        self.state.params.fetch_params(&self.req, names)
    }

    /// `required` as in `fetch_params`, plus any of `optional` the request supplies.
    pub fn fetch_params_with(&self, required: &[&str], optional: &[&str]) -> Result<ParamMap, AppError> {
        let mut params = self.fetch_params(required)?;
        params.extend(self.state.params.fetch_optional_params(&self.req, optional)?);
        Ok(params)
    }
}

#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, ctx: HandlerContext) -> HandlerResult;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(HandlerContext) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn call(&self, ctx: HandlerContext) -> HandlerResult {
        (self)(ctx).await
    }
}

/// One row of the static API table.
#[derive(Clone)]
pub struct ApiDesc {
    pub path: &'static str,
    pub verb: Method,
    pub handler: Arc<dyn Handler>,
}

impl ApiDesc {
    pub fn new<H: Handler + 'static>(path: &'static str, verb: Method, handler: H) -> Self {
        ApiDesc {
            path,
            verb,
            handler: Arc::new(handler),
        }
    }
}

/// Handlers for each verb wired on one path.
#[derive(Clone)]
pub struct VerbMap {
    pub path: String,
    pub methods: HashMap<Method, Arc<dyn Handler>>,
}

impl VerbMap {
    fn new(path: String) -> Self {
        VerbMap {
            path,
            methods: HashMap::new(),
        }
    }

    pub fn verbs(&self) -> Vec<&Method> {
        let mut verbs: Vec<_> = self.methods.keys().collect();
        verbs.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        verbs
    }
}

/// Full path -> verb map. Built once; read-only while serving.
#[derive(Clone, Default)]
pub struct RoutingTable {
    paths: BTreeMap<String, VerbMap>,
}

impl RoutingTable {
    /// `base_path` is prefixed to every table path.
    pub fn new(base_path: &str, table: Vec<ApiDesc>) -> Self {
        let base = base_path.trim_end_matches('/');
        let mut rt = RoutingTable::default();
        for d in table {
            rt.add_api(format!("{}{}", base, d.path), d.verb, d.handler);
        }
        rt
    }

    /// Wire one path and verb. A later registration of the same pair replaces the earlier one.
    pub fn add_api(&mut self, path: String, verb: Method, handler: Arc<dyn Handler>) {
        self.paths
            .entry(path.clone())
            .or_insert_with(|| VerbMap::new(path))
            .methods
            .insert(verb, handler);
    }

    pub fn maps(&self) -> &BTreeMap<String, VerbMap> {
        &self.paths
    }

    pub fn verb_map(&self, path: &str) -> Option<&VerbMap> {
        self.paths.get(path)
    }

    /// Host-facing registration: one route per path, any verb, each dispatching
    /// through its own verb map. Extractor rejections are answered as `AppError`s.
    pub fn into_router(self, state: AppState) -> Router {
        let body_limit = state.config.body_limit;
        let mut router = Router::new();
        for (path, vmap) in self.paths {
            let vmap = Arc::new(vmap);
            let state = state.clone();
            router = router.route(
                &path,
                any(
                    move |method: Method,
                          path_params: Result<Path<HashMap<String, String>>, PathRejection>,
                          query: Result<Query<Vec<(String, String)>>, QueryRejection>,
                          body: Result<Bytes, BytesRejection>| {
                        let vmap = Arc::clone(&vmap);
                        let state = state.clone();
                        async move {
                            let req = match request_parts(method, &vmap.path, path_params, query, body) {
                                Ok(req) => req,
                                Err(e) => return e.into_response(),
                            };
                            dispatch(&vmap, HandlerContext::new(req, state)).await
                        }
                    },
                ),
            );
        }
        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
    }
}

fn request_parts(
    method: Method,
    route: &str,
    path_params: Result<Path<HashMap<String, String>>, PathRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiRequest, AppError> {
    let path_params = match path_params {
        Ok(Path(p)) => p,
        Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
        Err(e) => return Err(AppError::rejected(e.status(), e.body_text())),
    };
    let Query(query) = query.map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
    let body = body.map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
    Ok(ApiRequest {
        method,
        route: route.to_string(),
        path_params,
        query,
        body,
    })
}

/// Run the handler wired for the request's verb, or fail with 405.
pub async fn call_api_method(vmap: &VerbMap, ctx: HandlerContext) -> HandlerResult {
    let verb = &ctx.req.method;
    let handler = vmap
        .methods
        .get(verb)
        .cloned()
        .ok_or_else(|| AppError::MethodNotAllowed {
            verb: verb.to_string(),
            path: vmap.path.clone(),
        })?;
    handler.call(ctx).await
}

/// Invoke, encode and write. Errors become an `ErrorResponse` body and are logged.
pub async fn dispatch(vmap: &VerbMap, ctx: HandlerContext) -> Response {
    tracing::debug!(method = %ctx.req.method, path = %vmap.path, "dispatch");
    match call_api_method(vmap, ctx).await {
        Ok(res) => {
            tracing::debug!(code = res.status.as_u16(), path = %vmap.path, "dispatch done");
            res.into_response()
        }
        Err(e) => e.into_response(),
    }
}
