// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod reference;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use fulfillment::CommandContext;
use fulfillment_api::{
    ApiError, AssignPickerRequest, BulkCreateOrdersCsvRequest, BulkCreateOrdersRequest,
    BulkCreateOrdersResponse, CompleteQcRequest, ComplaintInfo, CreateOrderRequest,
    CreateOutboundRequest, FileComplaintRequest, GetAuditTimelineResponse,
    ListExpeditionsResponse, ListPickedOrdersResponse, OperationResponse, ShipmentInfo,
    StartQcRequest, ValidateProductRequest,
};
use fulfillment_audit::{Actor, Cause};
use fulfillment_domain::QcLane;
use fulfillment_persistence::Persistence;

/// Fulfillment Server - HTTP server for the warehouse fulfillment backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "FULFILLMENT_DATABASE", conflicts_with = "mysql_url")]
    database: Option<PathBuf>,

    /// `MySQL`/`MariaDB` connection URL.
    #[arg(long, env = "FULFILLMENT_MYSQL_URL")]
    mysql_url: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "FULFILLMENT_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "FULFILLMENT_PORT", default_value_t = 3000)]
    port: u16,

    /// Tracing filter directive. Falls back to `RUST_LOG`, then `info`.
    #[arg(long)]
    log_filter: Option<String>,

    /// JSON file with users, packing boxes and expeditions to load at startup.
    #[arg(long, env = "FULFILLMENT_REFERENCE_DATA")]
    reference_data: Option<PathBuf>,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
}

/// Who is acting and why; sent with every write request.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorFields {
    /// The acting user id, recorded in `*_by` fields.
    actor_id: i64,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

impl ActorFields {
    fn context(&self, actor_type: &str) -> CommandContext {
        CommandContext::new(
            Actor::new(self.actor_id, actor_type.to_string()),
            Cause::new(self.cause_id.clone(), self.cause_description.clone()),
            OffsetDateTime::now_utc(),
        )
    }

    fn user_context(&self) -> CommandContext {
        self.context("user")
    }
}

/// A write request: actor fields plus the operation payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ApiRequest<T> {
    #[serde(flatten)]
    actor: ActorFields,
    #[serde(flatten)]
    body: T,
}

/// Generic error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Always true for error bodies.
    error: bool,
    /// The error message.
    message: String,
}

/// HTTP error wrapper.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidState { .. }
            | ApiError::Incomplete { .. }
            | ApiError::ExternalLookupFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "Request failed");
        } else {
            debug!(error = %err, status = status.as_u16(), "Request rejected");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

type OperationResult = Result<Json<OperationResponse>, HttpError>;

// ========================================================================
// Orders
// ========================================================================

/// Handler for POST `/orders` endpoint.
async fn handle_create_order(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ApiRequest<CreateOrderRequest>>,
) -> OperationResult {
    info!(
        actor_id = req.actor.actor_id,
        order_ginee_id = %req.body.order_ginee_id,
        "Handling create_order request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse = fulfillment_api::create_order(
        &mut persistence,
        &req.body,
        &req.actor.user_context(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/orders/assign` endpoint.
async fn handle_assign_picker(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ApiRequest<AssignPickerRequest>>,
) -> OperationResult {
    info!(
        actor_id = req.actor.actor_id,
        tracking_number = %req.body.tracking_number,
        picker_id = req.body.picker_id,
        "Handling assign_picker request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse = fulfillment_api::assign_picker(
        &mut persistence,
        &req.body,
        &req.actor.user_context(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/orders/{order_id}/pending` endpoint.
async fn handle_mark_pending_picking(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<i64>,
    Json(actor): Json<ActorFields>,
) -> OperationResult {
    info!(actor_id = actor.actor_id, order_id, "Handling mark_pending_picking request");
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse =
        fulfillment_api::mark_pending_picking(&mut persistence, order_id, &actor.user_context())?;
    Ok(Json(response))
}

/// Handler for POST `/orders/{order_id}/complete-picking` endpoint.
async fn handle_complete_picking(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<i64>,
    Json(actor): Json<ActorFields>,
) -> OperationResult {
    info!(actor_id = actor.actor_id, order_id, "Handling complete_picking request");
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse =
        fulfillment_api::complete_picking(&mut persistence, order_id, &actor.user_context())?;
    Ok(Json(response))
}

/// Handler for POST `/orders/{order_id}/cancel` endpoint.
async fn handle_cancel_order(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<i64>,
    Json(actor): Json<ActorFields>,
) -> OperationResult {
    info!(actor_id = actor.actor_id, order_id, "Handling cancel_order request");
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse =
        fulfillment_api::cancel_order(&mut persistence, order_id, &actor.user_context())?;
    Ok(Json(response))
}

/// Handler for POST `/orders/{order_id}/duplicate` endpoint.
async fn handle_duplicate_order(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<i64>,
    Json(actor): Json<ActorFields>,
) -> OperationResult {
    info!(actor_id = actor.actor_id, order_id, "Handling duplicate_order request");
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse =
        fulfillment_api::duplicate_order(&mut persistence, order_id, &actor.user_context())?;
    Ok(Json(response))
}

/// Handler for POST `/orders/bulk` endpoint.
///
/// Responds 409 only when every order of a non-empty batch already existed.
async fn handle_bulk_create_orders(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ApiRequest<BulkCreateOrdersRequest>>,
) -> Result<(StatusCode, Json<BulkCreateOrdersResponse>), HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        orders = req.body.orders.len(),
        "Handling bulk_create_orders request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: BulkCreateOrdersResponse = fulfillment_api::bulk_create_orders(
        &mut persistence,
        &req.body,
        &req.actor.context("ingest"),
    )?;
    Ok((bulk_status(&response), Json(response)))
}

/// Handler for POST `/orders/bulk/csv` endpoint.
async fn handle_bulk_create_orders_csv(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ApiRequest<BulkCreateOrdersCsvRequest>>,
) -> Result<(StatusCode, Json<BulkCreateOrdersResponse>), HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        bytes = req.body.csv_content.len(),
        "Handling bulk_create_orders_csv request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: BulkCreateOrdersResponse = fulfillment_api::bulk_create_orders_from_csv(
        &mut persistence,
        &req.body,
        &req.actor.context("ingest"),
    )?;
    Ok((bulk_status(&response), Json(response)))
}

fn bulk_status(response: &BulkCreateOrdersResponse) -> StatusCode {
    if response.all_skipped() {
        StatusCode::CONFLICT
    } else {
        StatusCode::OK
    }
}

// ========================================================================
// Quality control
// ========================================================================

/// Handler for POST `/qc/{lane}/start` endpoint.
async fn handle_start_qc(
    AxumState(app_state): AxumState<AppState>,
    Path(lane): Path<String>,
    Json(req): Json<ApiRequest<StartQcRequest>>,
) -> OperationResult {
    let lane: QcLane = fulfillment_api::parse_lane(&lane)?;
    info!(
        actor_id = req.actor.actor_id,
        %lane,
        tracking_number = %req.body.tracking_number,
        "Handling start_qc request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse = fulfillment_api::start_qc(
        &mut persistence,
        lane,
        &req.body,
        &req.actor.user_context(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/qc/{lane}/{qc_id}/validate` endpoint.
async fn handle_validate_product(
    AxumState(app_state): AxumState<AppState>,
    Path((lane, qc_id)): Path<(String, i64)>,
    Json(req): Json<ApiRequest<ValidateProductRequest>>,
) -> OperationResult {
    let lane: QcLane = fulfillment_api::parse_lane(&lane)?;
    info!(
        actor_id = req.actor.actor_id,
        %lane,
        qc_id,
        sku = %req.body.sku,
        "Handling validate_product request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse = fulfillment_api::validate_product(
        &mut persistence,
        lane,
        qc_id,
        &req.body,
        &req.actor.user_context(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/qc/{lane}/{qc_id}/pending` endpoint.
async fn handle_mark_qc_pending(
    AxumState(app_state): AxumState<AppState>,
    Path((lane, qc_id)): Path<(String, i64)>,
    Json(actor): Json<ActorFields>,
) -> OperationResult {
    let lane: QcLane = fulfillment_api::parse_lane(&lane)?;
    info!(actor_id = actor.actor_id, %lane, qc_id, "Handling mark_qc_pending request");
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse =
        fulfillment_api::mark_qc_pending(&mut persistence, lane, qc_id, &actor.user_context())?;
    Ok(Json(response))
}

/// Handler for POST `/qc/{lane}/{qc_id}/resume` endpoint.
async fn handle_resume_qc(
    AxumState(app_state): AxumState<AppState>,
    Path((lane, qc_id)): Path<(String, i64)>,
    Json(actor): Json<ActorFields>,
) -> OperationResult {
    let lane: QcLane = fulfillment_api::parse_lane(&lane)?;
    info!(actor_id = actor.actor_id, %lane, qc_id, "Handling resume_qc request");
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse =
        fulfillment_api::resume_qc(&mut persistence, lane, qc_id, &actor.user_context())?;
    Ok(Json(response))
}

/// Handler for POST `/qc/{lane}/{qc_id}/complete` endpoint.
async fn handle_complete_qc(
    AxumState(app_state): AxumState<AppState>,
    Path((lane, qc_id)): Path<(String, i64)>,
    Json(req): Json<ApiRequest<CompleteQcRequest>>,
) -> OperationResult {
    let lane: QcLane = fulfillment_api::parse_lane(&lane)?;
    info!(
        actor_id = req.actor.actor_id,
        %lane,
        qc_id,
        boxes = req.body.boxes.len(),
        "Handling complete_qc request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse = fulfillment_api::complete_qc(
        &mut persistence,
        lane,
        qc_id,
        &req.body,
        &req.actor.user_context(),
    )?;
    Ok(Json(response))
}

// ========================================================================
// Outbound and complaints
// ========================================================================

/// Handler for POST `/outbound` endpoint.
async fn handle_create_outbound(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ApiRequest<CreateOutboundRequest>>,
) -> OperationResult {
    info!(
        actor_id = req.actor.actor_id,
        tracking_number = %req.body.tracking_number,
        "Handling create_outbound request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse = fulfillment_api::create_outbound(
        &mut persistence,
        &req.body,
        &req.actor.user_context(),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/complaints` endpoint.
async fn handle_file_complaint(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ApiRequest<FileComplaintRequest>>,
) -> OperationResult {
    info!(
        actor_id = req.actor.actor_id,
        tracking_number = %req.body.tracking_number,
        "Handling file_complaint request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: OperationResponse = fulfillment_api::file_complaint(
        &mut persistence,
        &req.body,
        &req.actor.user_context(),
    )?;
    Ok(Json(response))
}

// ========================================================================
// Reads
// ========================================================================

/// Handler for GET `/shipments/{tracking_number}` endpoint.
async fn handle_get_shipment(
    AxumState(app_state): AxumState<AppState>,
    Path(tracking_number): Path<String>,
) -> Result<Json<ShipmentInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fulfillment_api::get_shipment(
        &mut persistence,
        &tracking_number,
    )?))
}

/// Handler for GET `/shipments/{tracking_number}/picked` endpoint.
async fn handle_list_picked_orders(
    AxumState(app_state): AxumState<AppState>,
    Path(tracking_number): Path<String>,
) -> Result<Json<ListPickedOrdersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fulfillment_api::list_picked_orders(
        &mut persistence,
        &tracking_number,
    )?))
}

/// Handler for GET `/shipments/{tracking_number}/audit` endpoint.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Path(tracking_number): Path<String>,
) -> Result<Json<GetAuditTimelineResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fulfillment_api::get_audit_timeline(
        &mut persistence,
        &tracking_number,
    )?))
}

/// Handler for GET `/complaints/{tracking_number}` endpoint.
async fn handle_get_complaint(
    AxumState(app_state): AxumState<AppState>,
    Path(tracking_number): Path<String>,
) -> Result<Json<ComplaintInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fulfillment_api::get_complaint(
        &mut persistence,
        &tracking_number,
    )?))
}

/// Handler for GET `/expeditions` endpoint.
async fn handle_list_expeditions(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListExpeditionsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fulfillment_api::list_expeditions(&mut persistence)?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/orders", post(handle_create_order))
        .route("/orders/assign", post(handle_assign_picker))
        .route("/orders/bulk", post(handle_bulk_create_orders))
        .route("/orders/bulk/csv", post(handle_bulk_create_orders_csv))
        .route("/orders/{order_id}/pending", post(handle_mark_pending_picking))
        .route(
            "/orders/{order_id}/complete-picking",
            post(handle_complete_picking),
        )
        .route("/orders/{order_id}/cancel", post(handle_cancel_order))
        .route("/orders/{order_id}/duplicate", post(handle_duplicate_order))
        .route("/qc/{lane}/start", post(handle_start_qc))
        .route("/qc/{lane}/{qc_id}/validate", post(handle_validate_product))
        .route("/qc/{lane}/{qc_id}/pending", post(handle_mark_qc_pending))
        .route("/qc/{lane}/{qc_id}/resume", post(handle_resume_qc))
        .route("/qc/{lane}/{qc_id}/complete", post(handle_complete_qc))
        .route("/outbound", post(handle_create_outbound))
        .route("/complaints", post(handle_file_complaint))
        .route("/complaints/{tracking_number}", get(handle_get_complaint))
        .route("/shipments/{tracking_number}", get(handle_get_shipment))
        .route(
            "/shipments/{tracking_number}/picked",
            get(handle_list_picked_orders),
        )
        .route(
            "/shipments/{tracking_number}/audit",
            get(handle_get_audit_timeline),
        )
        .route("/expeditions", get(handle_list_expeditions))
        .with_state(app_state)
}

fn open_persistence(args: &Args) -> Result<Persistence, Box<dyn std::error::Error>> {
    let persistence: Persistence = if let Some(url) = &args.mysql_url {
        info!("Using MySQL/MariaDB database");
        Persistence::new_with_mysql(url)?
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path.display());
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    Ok(persistence)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    let filter: tracing_subscriber::EnvFilter = match &args.log_filter {
        Some(directive) => tracing_subscriber::EnvFilter::try_new(directive)?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Initializing Fulfillment Server");

    let mut persistence: Persistence = open_persistence(&args)?;
    persistence.verify_foreign_key_enforcement()?;

    if let Some(path) = &args.reference_data {
        let loaded = reference::load_reference_data(&mut persistence, path)?;
        info!(
            users = loaded.users,
            boxes = loaded.boxes,
            expeditions = loaded.expeditions,
            "Loaded reference data from {}",
            path.display()
        );
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
