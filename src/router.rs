use axum::{extract::DefaultBodyLimit, http::Method, Router};
use log::info;

use crate::handlers::dispatch;
use crate::types::{AppState, Operation};

/// Largest save form accepted, matching the 10 MB form limit wiki clients expect
pub const MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

/// How one operation is reached and answered
#[derive(Debug, Clone)]
pub struct Route {
    pub operation: Operation,
    pub prefix: &'static str,
    pub method: Method,
    /// Template used to answer, `None` for operations that always redirect
    pub template: Option<&'static str>,
}

impl Route {
    /// Path of this operation applied to `title`, e.g. `/edit/Home`
    pub fn path_for(&self, title: &str) -> String {
        format!("{}{}", self.prefix, title)
    }

    /// Whether `method` may be used for this route. HEAD rides along with GET.
    pub fn accepts(&self, method: &Method) -> bool {
        *method == self.method || (self.method == Method::GET && *method == Method::HEAD)
    }

    pub fn allow_header(&self) -> &'static str {
        if self.method == Method::GET { "GET, HEAD" } else { "POST" }
    }
}

/// Every operation the wiki serves, built once at startup.
/// Indexed by `Operation`, in `Operation::ALL` order.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: [Route; 3],
}

impl RouteTable {
    pub fn standard() -> Self {
        Self {
            routes: [
                Route {
                    operation: Operation::View,
                    prefix: "/view/",
                    method: Method::GET,
                    template: Some("view"),
                },
                Route {
                    operation: Operation::Edit,
                    prefix: "/edit/",
                    method: Method::GET,
                    template: Some("edit"),
                },
                Route {
                    operation: Operation::Save,
                    prefix: "/save/",
                    method: Method::POST,
                    template: None,
                },
            ],
        }
    }

    pub fn get(&self, operation: Operation) -> &Route {
        &self.routes[operation as usize]
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Build the axum router. Every request goes through the dispatcher, which
/// validates the full path itself, so no path patterns are registered here.
pub fn build_router(state: AppState) -> Router {
    for route in state.routes.routes() {
        info!(
            "Registering route: {} -> {} ({})",
            route.operation.name(),
            route.prefix,
            route.method
        );
    }
    Router::new()
        .fallback(dispatch)
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES))
        .with_state(state)
}
