use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use finch_domain::{Candidate, Profile};
use finch_engine::{Error as EngineError, RecommendRequest};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/profiles/parse", post(parse_profile))
		.route("/v1/profiles/{user_id}", get(get_profile).delete(delete_profile))
		.route("/v1/recommendations/{user_id}", get(recommendations))
		.route("/v1/cache/invalidate/{user_id}", post(invalidate_cache))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
	pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
	pub message: String,
	pub profile: Profile,
}

async fn parse_profile(
	State(state): State<AppState>,
	Json(payload): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, ApiError> {
	let profile = state.engine.parse_profile(&payload.query).await?;

	Ok(Json(ParseResponse { message: "User profile saved.".to_string(), profile }))
}

async fn get_profile(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
	match state.engine.profile(&user_id).await {
		Some(profile) => Ok(Json(profile)),
		None => Err(ApiError::not_found("User not found.")),
	}
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
	pub deleted: bool,
}

async fn delete_profile(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let deleted = state.engine.delete_profile(&user_id).await?;

	Ok(Json(DeleteResponse { deleted }))
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
	pub limit: Option<usize>,
	pub query: Option<String>,
	pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
	pub user_id: String,
	pub recommendations: Vec<Candidate>,
}

/// An unknown user or an empty pipeline result is a 200 with an empty list;
/// "no recommendations" is data, not an error.
async fn recommendations(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
	Query(params): Query<RecommendationsQuery>,
) -> Json<RecommendationsResponse> {
	let request = RecommendRequest {
		user_id: user_id.clone(),
		limit: params.limit,
		query: params.query,
		location: params.location,
	};
	let recommendations = state.engine.recommend(&request).await;

	Json(RecommendationsResponse { user_id, recommendations })
}

async fn invalidate_cache(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> StatusCode {
	state.engine.invalidate_user(&user_id);

	StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}

	fn not_found(message: impl Into<String>) -> Self {
		Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
	}
}
impl From<EngineError> for ApiError {
	fn from(err: EngineError) -> Self {
		match err {
			EngineError::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			EngineError::Provider { message } =>
				Self::new(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message),
			EngineError::Store { message } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", message),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
