use axum::{
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use log::{debug, info, warn};
use serde::Deserialize;

use crate::errors::WikiError;
use crate::router::Route;
use crate::services::validate_path;
use crate::types::{AppState, Operation, Page};

#[derive(Debug, Deserialize)]
struct SaveForm {
    body: Option<String>,
}

/// Entry point for every request: validate the path, then run the operation it names
pub async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    info!("{} {}", method, path);

    let valid = match validate_path(&path) {
        Ok(valid) => valid,
        Err(e) => {
            warn!("No page at '{}'", path);
            return e.into_response();
        }
    };

    let route = state.routes.get(valid.operation);
    if !route.accepts(&method) {
        warn!("{} not allowed on '{}'", method, path);
        return WikiError::MethodNotAllowed { allow: route.allow_header() }.into_response();
    }

    match valid.operation {
        Operation::View => view_page(&state, route, &valid.title).await,
        Operation::Edit => edit_page(&state, route, &valid.title).await,
        Operation::Save => save_page(&state, valid.title, req).await,
    }
}

/// Render a stored page, or send the client to the edit form if it does not exist yet
async fn view_page(state: &AppState, route: &Route, title: &str) -> Response {
    match state.store.load(title).await {
        Ok(page) => render(state, &page, route),
        Err(_) => {
            let location = state.routes.get(Operation::Edit).path_for(title);
            info!("Page '{}' not found, redirecting to {}", title, location);
            found(&location)
        }
    }
}

/// Render the edit form, empty when the page was never saved
async fn edit_page(state: &AppState, route: &Route, title: &str) -> Response {
    let page = match state.store.load(title).await {
        Ok(page) => page,
        Err(_) => {
            debug!("Page '{}' not found, editing empty page", title);
            Page::empty(title)
        }
    };
    render(state, &page, route)
}

/// Store the submitted body and go back to the view page.
///
/// The redirect happens whether or not the write succeeded; failures only go
/// to the write-failure reporter. A form that cannot be read leaves the stored
/// page untouched.
async fn save_page(state: &AppState, title: String, req: Request) -> Response {
    let location = state.routes.get(Operation::View).path_for(&title);
    match read_body_field(req, state).await {
        Ok(body) => {
            let page = Page::new(title, body);
            if let Err(e) = state.store.save(&page).await {
                state.write_failures.report(&page.title, &e);
            }
        }
        Err(e) => state.write_failures.report(&title, &e),
    }
    found(&location)
}

/// Pull the `body` field from a urlencoded or multipart form, then from the
/// query string. A field missing from both counts as an empty body.
async fn read_body_field(req: Request, state: &AppState) -> Result<Vec<u8>, WikiError> {
    let query = match Query::<SaveForm>::try_from_uri(req.uri()) {
        Ok(Query(form)) => form.body,
        Err(rejection) => {
            debug!("Ignoring unreadable query string: {}", rejection.body_text());
            None
        }
    };

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let posted = if content_type.starts_with("multipart/form-data") {
        read_multipart_body(req, state).await?
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(form) = Form::<SaveForm>::from_request(req, state)
            .await
            .map_err(|rejection| WikiError::BadForm(rejection.body_text()))?;
        form.body.map(String::into_bytes)
    } else {
        None
    };

    Ok(posted.or_else(|| query.map(String::into_bytes)).unwrap_or_default())
}

async fn read_multipart_body(
    req: Request,
    state: &AppState,
) -> Result<Option<Vec<u8>>, WikiError> {
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|rejection| WikiError::BadForm(rejection.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WikiError::BadForm(e.body_text()))?
    {
        if field.name() == Some("body") {
            let bytes = field.bytes().await.map_err(|e| WikiError::BadForm(e.body_text()))?;
            return Ok(Some(bytes.to_vec()));
        }
    }
    Ok(None)
}

fn render(state: &AppState, page: &Page, route: &Route) -> Response {
    let result = match route.template {
        Some(name) => state.templates.render(page, name),
        None => Err(WikiError::RenderError(format!(
            "operation '{}' has no template",
            route.operation.name()
        ))),
    };
    match result {
        Ok(html) => html.into_response(),
        Err(e) => {
            warn!("Failed to render page '{}': {}", page.title, e);
            e.into_response()
        }
    }
}

/// 302 Found pointing at `location`
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
