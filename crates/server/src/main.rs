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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use rinkside_api::{
    ApiError, InvoiceIssuer, LogMailer, Mailer, RecordOnlyInvoiceIssuer, handlers,
    request_response::{
        AdminBookingRequest, ApproveRequestRequest, BookingPayload, CalendarResponse,
        ConflictCheckResponse, DeclineRequestRequest, GenerateInvoicesResponse,
        ListAdminEventsResponse, ListInvoicesResponse, ListRentersResponse, ListRequestsResponse,
        LoginRequest, LoginResponse, PaymentNotificationRequest, ProfileResponse,
        RegisterRenterRequest, RegisterRenterResponse, SearchRentersRequest,
        SetRenterAccessRequest, SubmitEventResponse, SubmitRequestResponse, UpdateAmountRequest,
        UpdateProfileRequest,
    },
};
use rinkside_persistence::Persistence;
use session::SessionRenter;

/// Rinkside Server - HTTP server for the Rinkside scheduling system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex; the external
/// collaborators are stateless trait objects.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Outbound email delivery.
    mailer: Arc<dyn Mailer>,
    /// Outbound invoice issuance.
    invoices: Arc<dyn InvoiceIssuer>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// Response for mutations with no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatusResponse {
    /// Success indicator.
    success: bool,
}

const OK: StatusResponse = StatusResponse { success: true };

/// HTTP error wrapper that implements `IntoResponse`.
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
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ScheduleConflict { .. } => StatusCode::CONFLICT,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Accounts & auth
// ============================================================================

/// Handler for POST `/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterRenterRequest>,
) -> Result<Json<RegisterRenterResponse>, HttpError> {
    info!(email = %req.email, "Handling register request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterRenterResponse = handlers::register_renter(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = handlers::login(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/logout`.
///
/// Deletes the presented session without requiring it to validate, so
/// an expired token can still be discarded.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, HttpError> {
    let token: &str = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing bearer token"),
        })?;

    let mut persistence = app_state.persistence.lock().await;
    handlers::logout(&mut persistence, token)?;
    drop(persistence);

    Ok(Json(OK))
}

/// Handler for GET `/me`.
async fn handle_me(SessionRenter(_actor, renter): SessionRenter) -> Json<ProfileResponse> {
    Json(handlers::whoami(&renter))
}

/// Handler for PUT `/me`.
async fn handle_update_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ProfileResponse = handlers::update_profile(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/renters`.
async fn handle_list_renters(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
) -> Result<Json<ListRentersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListRentersResponse = handlers::list_renters(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/renters/search`.
async fn handle_search_renters(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Query(params): Query<SearchRentersRequest>,
) -> Result<Json<ListRentersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListRentersResponse =
        handlers::search_renters(&mut persistence, &actor, &params)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/renters/{renter_id}/access`.
async fn handle_set_renter_access(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Path(renter_id): Path<i64>,
    Json(req): Json<SetRenterAccessRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(renter_id, req.is_disabled, "Handling renter access request");

    let mut persistence = app_state.persistence.lock().await;
    handlers::set_renter_access(&mut persistence, &actor, renter_id, &req)?;
    drop(persistence);

    Ok(Json(OK))
}

// ============================================================================
// Calendar & conflict pre-check
// ============================================================================

/// Handler for GET `/calendar`.
///
/// The calendar is public; it exposes only active bookings.
async fn handle_calendar(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<CalendarResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CalendarResponse = handlers::calendar_events(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/check-conflicts`.
async fn handle_check_conflicts(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(_actor, _renter): SessionRenter,
    Json(req): Json<BookingPayload>,
) -> Result<Json<ConflictCheckResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ConflictCheckResponse = handlers::check_conflicts(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Booking workflow
// ============================================================================

/// Handler for POST `/requests`.
async fn handle_submit_request(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Json(req): Json<BookingPayload>,
) -> Result<Json<SubmitRequestResponse>, HttpError> {
    info!(renter_id = actor.renter_id, "Handling rental request submission");

    let mut persistence = app_state.persistence.lock().await;
    let response: SubmitRequestResponse = handlers::submit_request(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/requests`.
async fn handle_list_all_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
) -> Result<Json<ListRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListRequestsResponse = handlers::list_all_requests(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/my-requests`.
async fn handle_list_my_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
) -> Result<Json<ListRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListRequestsResponse = handlers::list_my_requests(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/requests/{request_id}/approve`.
async fn handle_approve_request(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Path(request_id): Path<i64>,
    Json(req): Json<ApproveRequestRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(request_id, req.amount, "Handling approve request");

    let mut persistence = app_state.persistence.lock().await;
    handlers::approve_request(
        &mut persistence,
        app_state.mailer.as_ref(),
        &actor,
        request_id,
        &req,
    )?;
    drop(persistence);

    Ok(Json(OK))
}

/// Handler for POST `/requests/{request_id}/decline`.
async fn handle_decline_request(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Path(request_id): Path<i64>,
    Json(req): Json<DeclineRequestRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(request_id, "Handling decline request");

    let mut persistence = app_state.persistence.lock().await;
    handlers::decline_request(
        &mut persistence,
        app_state.mailer.as_ref(),
        &actor,
        request_id,
        &req,
    )?;
    drop(persistence);

    Ok(Json(OK))
}

/// Handler for PUT `/requests/{request_id}/amount`.
async fn handle_update_amount(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Path(request_id): Path<i64>,
    Json(req): Json<UpdateAmountRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    handlers::update_request_amount(&mut persistence, &actor, request_id, &req)?;
    drop(persistence);

    Ok(Json(OK))
}

/// Handler for POST `/requests/{request_id}/paid`.
async fn handle_mark_paid(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Path(request_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    handlers::mark_request_paid(&mut persistence, &actor, request_id)?;
    drop(persistence);

    Ok(Json(OK))
}

/// Handler for DELETE `/requests/{request_id}`.
async fn handle_delete_request(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Path(request_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(request_id, "Handling delete request");

    let mut persistence = app_state.persistence.lock().await;
    handlers::delete_request(&mut persistence, &actor, request_id)?;
    drop(persistence);

    Ok(Json(OK))
}

/// Handler for POST `/admin/events`.
async fn handle_submit_admin_event(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Json(req): Json<BookingPayload>,
) -> Result<Json<SubmitEventResponse>, HttpError> {
    info!("Handling admin event submission");

    let mut persistence = app_state.persistence.lock().await;
    let response: SubmitEventResponse =
        handlers::submit_admin_event(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/admin/events`.
async fn handle_list_admin_events(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
) -> Result<Json<ListAdminEventsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListAdminEventsResponse =
        handlers::list_admin_events(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/admin/events/{event_id}`.
async fn handle_update_admin_event(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Path(event_id): Path<i64>,
    Json(req): Json<BookingPayload>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(event_id, "Handling admin event update");

    let mut persistence = app_state.persistence.lock().await;
    handlers::update_admin_event(&mut persistence, &actor, event_id, &req)?;
    drop(persistence);

    Ok(Json(OK))
}

/// Handler for DELETE `/admin/events/{event_id}`.
async fn handle_delete_admin_event(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Path(event_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(event_id, "Handling admin event delete");

    let mut persistence = app_state.persistence.lock().await;
    handlers::delete_admin_event(&mut persistence, &actor, event_id)?;
    drop(persistence);

    Ok(Json(OK))
}

/// Handler for POST `/admin/bookings`.
async fn handle_submit_admin_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
    Json(req): Json<AdminBookingRequest>,
) -> Result<Json<SubmitRequestResponse>, HttpError> {
    info!(renter_id = req.renter_id, "Handling admin booking submission");

    let mut persistence = app_state.persistence.lock().await;
    let response: SubmitRequestResponse = handlers::submit_admin_booking(
        &mut persistence,
        app_state.mailer.as_ref(),
        &actor,
        &req,
    )?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Monthly invoicing
// ============================================================================

/// Handler for POST `/invoices/generate`.
async fn handle_generate_invoices(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
) -> Result<Json<GenerateInvoicesResponse>, HttpError> {
    info!("Handling invoice generation");

    let mut persistence = app_state.persistence.lock().await;
    let response: GenerateInvoicesResponse = handlers::generate_monthly_invoices(
        &mut persistence,
        app_state.invoices.as_ref(),
        app_state.mailer.as_ref(),
        &actor,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/invoices`.
async fn handle_list_invoices(
    AxumState(app_state): AxumState<AppState>,
    SessionRenter(actor, _renter): SessionRenter,
) -> Result<Json<ListInvoicesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListInvoicesResponse = handlers::list_invoices(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/payments/notify`.
///
/// Unauthenticated webhook surface; the external id is the only
/// credential, matching the payment provider's callback contract.
async fn handle_payment_notification(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<PaymentNotificationRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(external_id = %req.external_id, "Handling payment notification");

    let mut persistence = app_state.persistence.lock().await;
    handlers::payment_notification(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(OK))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/me", get(handle_me))
        .route("/me", put(handle_update_profile))
        .route("/renters", get(handle_list_renters))
        .route("/renters/search", get(handle_search_renters))
        .route("/renters/{renter_id}/access", put(handle_set_renter_access))
        .route("/calendar", get(handle_calendar))
        .route("/check-conflicts", post(handle_check_conflicts))
        .route("/requests", post(handle_submit_request))
        .route("/requests", get(handle_list_all_requests))
        .route("/my-requests", get(handle_list_my_requests))
        .route("/requests/{request_id}/approve", post(handle_approve_request))
        .route("/requests/{request_id}/decline", post(handle_decline_request))
        .route("/requests/{request_id}/amount", put(handle_update_amount))
        .route("/requests/{request_id}/paid", post(handle_mark_paid))
        .route("/requests/{request_id}", delete(handle_delete_request))
        .route("/admin/events", post(handle_submit_admin_event))
        .route("/admin/events", get(handle_list_admin_events))
        .route("/admin/events/{event_id}", put(handle_update_admin_event))
        .route("/admin/events/{event_id}", delete(handle_delete_admin_event))
        .route("/admin/bookings", post(handle_submit_admin_booking))
        .route("/invoices/generate", post(handle_generate_invoices))
        .route("/invoices", get(handle_list_invoices))
        .route("/payments/notify", post(handle_payment_notification))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Rinkside Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        mailer: Arc::new(LogMailer),
        invoices: Arc::new(RecordOnlyInvoiceIssuer),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode as HttpStatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            mailer: Arc::new(LogMailer),
            invoices: Arc::new(RecordOnlyInvoiceIssuer),
        }
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request: Request<Body> = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status: HttpStatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn register_and_login(app: &Router, email: &str) -> String {
        let (status, _body) = send(
            app,
            Method::POST,
            "/register",
            None,
            Some(json!({
                "email": email,
                "name": "Test Renter",
                "password": "hunter2!!",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        login(app, email).await
    }

    async fn login(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": email, "password": "hunter2!!" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        body["session_token"].as_str().unwrap().to_string()
    }

    async fn create_admin(app_state: &AppState, email: &str) {
        let mut persistence = app_state.persistence.lock().await;
        persistence
            .create_renter(email, "Test Admin", None, "hunter2!!", true)
            .expect("admin should be created");
    }

    fn booking_body(date: &str, start_time: &str, end_time: &str) -> Value {
        json!({
            "rental_name": "Test Rental",
            "start_date": date,
            "end_date": date,
            "start_time": start_time,
            "end_time": end_time,
        })
    }

    #[tokio::test]
    async fn test_register_login_and_me() {
        let app: Router = build_router(create_test_app_state());

        let token: String = register_and_login(&app, "skater@example.com").await;

        let (status, body) = send(&app, Method::GET, "/me", Some(&token), None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["email"], "skater@example.com");
        assert_eq!(body["is_admin"], false);

        let (status, _body) = send(&app, Method::GET, "/me", None, None).await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);

        let (status, _body) = send(&app, Method::POST, "/logout", Some(&token), None).await;
        assert_eq!(status, HttpStatusCode::OK);
        let (status, _body) = send(&app, Method::GET, "/me", Some(&token), None).await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_conflicting_submission_returns_409() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        create_admin(&app_state, "admin@example.com").await;

        let renter_token: String = register_and_login(&app, "skater@example.com").await;
        let admin_token: String = login(&app, "admin@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/requests",
            Some(&renter_token),
            Some(booking_body("2024-06-10", "14:00:00", "16:00:00")),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["status"], "pending");
        let request_id: i64 = body["request_id"].as_i64().unwrap();

        let (status, _body) = send(
            &app,
            Method::POST,
            &format!("/requests/{request_id}/approve"),
            Some(&admin_token),
            Some(json!({ "amount": 150.0 })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send(
            &app,
            Method::POST,
            "/requests",
            Some(&renter_token),
            Some(booking_body("2024-06-10", "15:00:00", "17:00:00")),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_role() {
        let app: Router = build_router(create_test_app_state());
        let renter_token: String = register_and_login(&app, "skater@example.com").await;

        let (status, _body) = send(
            &app,
            Method::POST,
            "/admin/events",
            Some(&renter_token),
            Some(booking_body("2024-06-10", "08:00:00", "09:00:00")),
        )
        .await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);

        let (status, _body) = send(&app, Method::GET, "/requests", Some(&renter_token), None).await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);

        let (status, _body) = send(&app, Method::GET, "/renters", Some(&renter_token), None).await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);

        let (status, _body) = send(
            &app,
            Method::GET,
            "/renters/search?query=anderson",
            Some(&renter_token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_malformed_booking_returns_400() {
        let app: Router = build_router(create_test_app_state());
        let token: String = register_and_login(&app, "skater@example.com").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/requests",
            Some(&token),
            Some(booking_body("June 10th", "14:00:00", "16:00:00")),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_check_conflicts_reports_admin_event() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        create_admin(&app_state, "admin@example.com").await;

        let admin_token: String = login(&app, "admin@example.com").await;
        let renter_token: String = register_and_login(&app, "skater@example.com").await;

        let (status, _body) = send(
            &app,
            Method::POST,
            "/admin/events",
            Some(&admin_token),
            Some(booking_body("2024-06-10", "08:00:00", "09:00:00")),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send(
            &app,
            Method::POST,
            "/check-conflicts",
            Some(&renter_token),
            Some(booking_body("2024-06-10", "8:30 AM", "10:00 AM")),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["has_conflicts"], true);
        assert_eq!(body["admin_conflicts"].as_array().unwrap().len(), 1);
        assert_eq!(body["rental_conflicts"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_calendar_is_public_and_reflects_approvals() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        create_admin(&app_state, "admin@example.com").await;

        let (status, body) = send(&app, Method::GET, "/calendar", None, None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["events"].as_array().unwrap().len(), 0);

        let renter_token: String = register_and_login(&app, "skater@example.com").await;
        let admin_token: String = login(&app, "admin@example.com").await;

        // Submission dated today so it falls inside the calendar window.
        let date: time::Date = time::OffsetDateTime::now_utc().date();
        let today: String = format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        );

        let (status, body) = send(
            &app,
            Method::POST,
            "/requests",
            Some(&renter_token),
            Some(booking_body(&today, "14:00:00", "16:00:00")),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let request_id: i64 = body["request_id"].as_i64().unwrap();

        let (status, _body) = send(
            &app,
            Method::POST,
            &format!("/requests/{request_id}/approve"),
            Some(&admin_token),
            Some(json!({ "amount": 100.0 })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/calendar", None, None).await;
        assert_eq!(status, HttpStatusCode::OK);
        let events = body["events"].as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["date"], today.as_str());
        assert_eq!(events[0]["status"], "approved");
        assert_eq!(events[0]["name"], "Test Rental");
    }

    #[tokio::test]
    async fn test_unknown_payment_notification_returns_404() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            Method::POST,
            "/payments/notify",
            None,
            Some(json!({ "external_id": "ext_missing" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["error"], true);
    }
}
