//! helpdesk-api: REST API server for the helpdesk ticket tracker
//!
//! Exposes the ticket service over HTTP. Enumerations travel as small
//! integers on the wire (see `codec`); the core only ever sees named
//! variants.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use helpdesk_core::{
    Comment, Error, NewTicket, SortOrder, StatusChange, Ticket, TicketDetails, TicketFilter,
    TicketService, TicketSummary,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod codec;

/// Shared application state
struct AppState {
    service: RwLock<TicketService>,
}

/// Request to create a new ticket
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTicketRequest {
    title: String,
    description: String,
    created_by: String,
    category: u8,
    priority: u8,
}

/// Request to add a comment
#[derive(Debug, Deserialize)]
struct CreateCommentRequest {
    author: String,
    message: String,
}

/// Request to change a ticket's status
#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: u8,
}

/// Query parameters for listing tickets
#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    status: Option<u8>,
    #[serde(default)]
    priority: Option<u8>,
    #[serde(default)]
    category: Option<u8>,
    #[serde(default)]
    search: Option<String>,
    /// "newest" (default) or "oldest"
    #[serde(default)]
    sort: Option<String>,
}

/// Full ticket representation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TicketDto {
    id: String,
    title: String,
    description: String,
    created_by: String,
    category: u8,
    priority: u8,
    status: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Ticket> for TicketDto {
    fn from(t: &Ticket) -> Self {
        Self {
            id: t.id.clone(),
            title: t.title.clone(),
            description: t.description.clone(),
            created_by: t.created_by.clone(),
            category: codec::category_to_wire(t.category),
            priority: codec::priority_to_wire(t.priority),
            status: codec::status_to_wire(t.status),
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// List row: comment count instead of bodies
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TicketListItemDto {
    id: String,
    title: String,
    created_by: String,
    category: u8,
    priority: u8,
    status: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    comment_count: usize,
}

impl From<&TicketSummary> for TicketListItemDto {
    fn from(s: &TicketSummary) -> Self {
        Self {
            id: s.id.clone(),
            title: s.title.clone(),
            created_by: s.created_by.clone(),
            category: codec::category_to_wire(s.category),
            priority: codec::priority_to_wire(s.priority),
            status: codec::status_to_wire(s.status),
            created_at: s.created_at,
            updated_at: s.updated_at,
            comment_count: s.comment_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CommentDto {
    id: String,
    ticket_id: String,
    author: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentDto {
    fn from(c: &Comment) -> Self {
        Self {
            id: c.id.clone(),
            ticket_id: c.ticket_id.clone(),
            author: c.author.clone(),
            message: c.message.clone(),
            created_at: c.created_at,
        }
    }
}

/// Ticket plus its comments in creation order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TicketDetailsDto {
    #[serde(flatten)]
    ticket: TicketDto,
    comments: Vec<CommentDto>,
}

impl From<&TicketDetails> for TicketDetailsDto {
    fn from(d: &TicketDetails) -> Self {
        Self {
            ticket: TicketDto::from(&d.ticket),
            comments: d.comments.iter().map(CommentDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusChangeDto {
    message: String,
    status: u8,
    updated_at: DateTime<Utc>,
}

impl From<&StatusChange> for StatusChangeDto {
    fn from(c: &StatusChange) -> Self {
        Self {
            message: c.message.clone(),
            status: codec::status_to_wire(c.status),
            updated_at: c.updated_at,
        }
    }
}

/// API response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map a domain failure onto the transport
fn domain_error<T>(err: &Error) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidTransition { .. } | Error::ClosedWithoutComment | Error::ClosedTicket(_) => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::err(err.to_string())))
}

fn bad_wire_value<T>(field: &str, value: u8) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::err(format!(
            "Invalid {} value: {}",
            field, value
        ))),
    )
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// List tickets with optional filters
async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let mut filter = TicketFilter {
        search: query.search,
        ..Default::default()
    };

    if let Some(v) = query.status {
        match codec::status_from_wire(v) {
            Some(status) => filter.status = Some(status),
            None => return bad_wire_value::<Vec<TicketListItemDto>>("status", v),
        }
    }
    if let Some(v) = query.priority {
        match codec::priority_from_wire(v) {
            Some(priority) => filter.priority = Some(priority),
            None => return bad_wire_value::<Vec<TicketListItemDto>>("priority", v),
        }
    }
    if let Some(v) = query.category {
        match codec::category_from_wire(v) {
            Some(category) => filter.category = Some(category),
            None => return bad_wire_value::<Vec<TicketListItemDto>>("category", v),
        }
    }
    if let Some(sort) = query.sort.as_deref() {
        if sort.eq_ignore_ascii_case("oldest") {
            filter.sort = SortOrder::Oldest;
        }
    }

    let service = state.service.read().unwrap();
    let tickets: Vec<TicketListItemDto> = service
        .list_tickets(&filter)
        .iter()
        .map(TicketListItemDto::from)
        .collect();

    (StatusCode::OK, Json(ApiResponse::ok(tickets)))
}

/// Get a single ticket with its comments
async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let service = state.service.read().unwrap();
    match service.get_ticket(&id) {
        Ok(details) => (
            StatusCode::OK,
            Json(ApiResponse::ok(TicketDetailsDto::from(&details))),
        ),
        Err(e) => domain_error::<TicketDetailsDto>(&e),
    }
}

/// Create a new ticket
async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTicketRequest>,
) -> impl IntoResponse {
    let Some(category) = codec::category_from_wire(req.category) else {
        return bad_wire_value::<TicketDto>("category", req.category);
    };
    let Some(priority) = codec::priority_from_wire(req.priority) else {
        return bad_wire_value::<TicketDto>("priority", req.priority);
    };

    let new = NewTicket {
        title: req.title,
        description: req.description,
        created_by: req.created_by,
        category,
        priority,
    };

    let mut service = state.service.write().unwrap();
    match service.create_ticket(new) {
        Ok(ticket) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok(TicketDto::from(&ticket))),
        ),
        Err(e) => domain_error::<TicketDto>(&e),
    }
}

/// List a ticket's comments
async fn get_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let service = state.service.read().unwrap();
    match service.list_comments(&id) {
        Ok(comments) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                comments.iter().map(CommentDto::from).collect::<Vec<_>>(),
            )),
        ),
        Err(e) => domain_error::<Vec<CommentDto>>(&e),
    }
}

/// Add a comment to a ticket
async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> impl IntoResponse {
    let mut service = state.service.write().unwrap();
    match service.add_comment(&id, &req.author, &req.message) {
        Ok(comment) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok(CommentDto::from(&comment))),
        ),
        Err(e) => domain_error::<CommentDto>(&e),
    }
}

/// Request a status change
async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    let Some(requested) = codec::status_from_wire(req.status) else {
        return bad_wire_value::<StatusChangeDto>("status", req.status);
    };

    let mut service = state.service.write().unwrap();
    match service.update_status(&id, requested) {
        Ok(change) => (
            StatusCode::OK,
            Json(ApiResponse::ok(StatusChangeDto::from(&change))),
        ),
        Err(e) => domain_error::<StatusChangeDto>(&e),
    }
}

/// Delete a ticket and its comments
async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut service = state.service.write().unwrap();
    match service.delete_ticket(&id) {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "deleted": id }))),
        ),
        Err(e) => domain_error::<serde_json::Value>(&e),
    }
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tickets", get(list_tickets).post(create_ticket))
        .route(
            "/api/tickets/{id}",
            get(get_ticket).delete(delete_ticket),
        )
        .route(
            "/api/tickets/{id}/comments",
            get(get_comments).post(add_comment),
        )
        .route("/api/tickets/{id}/status", patch(update_status))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let service =
        TicketService::open().map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;

    let port: u16 = match std::env::var("HELPDESK_API_PORT") {
        Ok(p) => p.parse()?,
        Err(_) => service.config()?.api.port,
    };

    let state = Arc::new(AppState {
        service: RwLock::new(service),
    });

    let app = router(state);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("Starting helpdesk-api on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
