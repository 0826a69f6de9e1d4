use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::service::{ComplianceIntakeService, IntakeError, Navigation, SessionId};
use crate::auth::{AuthUser, ProfileDirectory};
use crate::wizard::{
    ActionOutcome, FieldEdit, Notice, SectionData, SectionId, SubmissionAdapter, SubmissionId,
    SubmittedForm, WizardError,
};

/// Header carrying the user id resolved by the upstream auth gateway.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the signed-in user's email, alongside [`USER_ID_HEADER`].
pub const USER_EMAIL_HEADER: &str = "x-user-email";

type SharedService<A, P> = Arc<ComplianceIntakeService<A, P>>;

/// Router builder exposing the intake wizard, auth landing, and admin reads.
pub fn compliance_router<A, P>(service: SharedService<A, P>) -> Router
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/compliance/sections",
            get(sections_handler::<A, P>),
        )
        .route(
            "/api/v1/compliance/sessions",
            post(open_session_handler::<A, P>),
        )
        .route(
            "/api/v1/compliance/sessions/:session_id",
            get(session_handler::<A, P>).delete(close_session_handler::<A, P>),
        )
        .route(
            "/api/v1/compliance/sessions/:session_id/sections/:section_id",
            put(replace_section_handler::<A, P>),
        )
        .route(
            "/api/v1/compliance/sessions/:session_id/edits",
            post(edit_handler::<A, P>),
        )
        .route(
            "/api/v1/compliance/sessions/:session_id/advance",
            post(advance_handler::<A, P>),
        )
        .route(
            "/api/v1/compliance/sessions/:session_id/retreat",
            post(retreat_handler::<A, P>),
        )
        .route(
            "/api/v1/compliance/sessions/:session_id/jump",
            post(jump_handler::<A, P>),
        )
        .route(
            "/api/v1/compliance/sessions/:session_id/save",
            post(save_handler::<A, P>),
        )
        .route(
            "/api/v1/compliance/sessions/:session_id/submit",
            post(submit_handler::<A, P>),
        )
        .route("/api/v1/auth/landing", post(landing_handler::<A, P>))
        .route(
            "/api/v1/compliance/submissions",
            get(submissions_handler::<A, P>),
        )
        .route(
            "/api/v1/compliance/submissions.csv",
            get(export_handler::<A, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct JumpRequest {
    pub(crate) index: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LandingRequest {
    pub(crate) user_id: String,
    #[serde(default)]
    pub(crate) email: Option<String>,
}

/// Body returned by save and submit, successful or not.
#[derive(Debug, Serialize)]
pub(crate) struct ActionResponse {
    pub(crate) notice: Notice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) redirect_to: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) submission_id: Option<SubmissionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn user_id(headers: &HeaderMap) -> Option<String> {
    header_text(headers, USER_ID_HEADER)
}

fn auth_user(headers: &HeaderMap) -> Option<AuthUser> {
    let email = header_text(headers, USER_EMAIL_HEADER).unwrap_or_default();
    user_id(headers).map(|id| AuthUser::new(id, email))
}

pub(crate) async fn sections_handler<A, P>(State(service): State<SharedService<A, P>>) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    (StatusCode::OK, Json(service.sections())).into_response()
}

pub(crate) async fn open_session_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    headers: HeaderMap,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    match service.open_session(auth_user(&headers)) {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(session_id): Path<String>,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    snapshot_response(service.snapshot(&SessionId(session_id)))
}

pub(crate) async fn close_session_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(session_id): Path<String>,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    match service.close_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn replace_section_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path((session_id, section_id)): Path<(String, String)>,
    Json(data): Json<SectionData>,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    snapshot_response(service.replace_section(
        &SessionId(session_id),
        SectionId(section_id),
        data,
    ))
}

pub(crate) async fn edit_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(session_id): Path<String>,
    Json(edit): Json<FieldEdit>,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    snapshot_response(service.edit(&SessionId(session_id), edit))
}

pub(crate) async fn advance_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(session_id): Path<String>,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    snapshot_response(service.navigate(&SessionId(session_id), Navigation::Advance))
}

pub(crate) async fn retreat_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(session_id): Path<String>,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    snapshot_response(service.navigate(&SessionId(session_id), Navigation::Retreat))
}

pub(crate) async fn jump_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(session_id): Path<String>,
    Json(request): Json<JumpRequest>,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    snapshot_response(service.navigate(&SessionId(session_id), Navigation::Jump(request.index)))
}

pub(crate) async fn save_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(session_id): Path<String>,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    match service.save(&SessionId(session_id)).await {
        Ok(ActionOutcome::Completed { notice, .. }) => (
            StatusCode::OK,
            Json(ActionResponse {
                notice,
                redirect_to: None,
                submission_id: None,
                error: None,
            }),
        )
            .into_response(),
        Ok(ActionOutcome::Failed { error, notice }) => failed_action_response(error, notice),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(session_id): Path<String>,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    match service.submit(&SessionId(session_id)).await {
        Ok(ActionOutcome::Completed {
            value: SubmittedForm {
                receipt,
                redirect_to,
            },
            notice,
        }) => (
            StatusCode::OK,
            Json(ActionResponse {
                notice,
                redirect_to: Some(redirect_to),
                submission_id: Some(receipt.submission_id),
                error: None,
            }),
        )
            .into_response(),
        Ok(ActionOutcome::Failed { error, notice }) => failed_action_response(error, notice),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn landing_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Json(request): Json<LandingRequest>,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    let landing = service
        .landing(&request.user_id, request.email.as_deref())
        .await;
    (StatusCode::OK, Json(landing)).into_response()
}

pub(crate) async fn submissions_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    headers: HeaderMap,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    let user_id = user_id(&headers);
    match service.submissions(user_id.as_deref()).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    headers: HeaderMap,
) -> Response
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    let user_id = user_id(&headers);
    match service.export_csv(user_id.as_deref()).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn snapshot_response<T: Serialize>(result: Result<T, IntakeError>) -> Response {
    match result {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

fn failed_action_response(error: WizardError, notice: Notice) -> Response {
    let status = match &error {
        WizardError::ActionUnavailable { .. } | WizardError::SubmitInFlight => {
            StatusCode::CONFLICT
        }
        WizardError::IdentityUnavailable => StatusCode::UNAUTHORIZED,
        WizardError::Identity(_) | WizardError::Submission(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let body = ActionResponse {
        notice,
        redirect_to: None,
        submission_id: None,
        error: Some(error.to_string()),
    };
    (status, Json(body)).into_response()
}

fn error_response(error: IntakeError) -> Response {
    let status = match &error {
        IntakeError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        IntakeError::Unauthenticated => StatusCode::UNAUTHORIZED,
        IntakeError::Forbidden { .. } => StatusCode::FORBIDDEN,
        IntakeError::Wizard(
            WizardError::NavigationBounds { .. } | WizardError::UnknownSection(_),
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        IntakeError::Identity(_) | IntakeError::Submission(_) => StatusCode::BAD_GATEWAY,
        IntakeError::Wizard(_) | IntakeError::Export(_) | IntakeError::Unavailable(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
