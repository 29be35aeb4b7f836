//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use agora_types::error::{RepositoryError, RoomError, SimulationError};
use agora_types::llm::LlmError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Room and agent management errors.
    Room(RoomError),
    /// Turn and judge errors.
    Simulation(SimulationError),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<RoomError> for AppError {
    fn from(e: RoomError) -> Self {
        AppError::Room(e)
    }
}

impl From<SimulationError> for AppError {
    fn from(e: SimulationError) -> Self {
        AppError::Simulation(e)
    }
}

impl AppError {
    /// Status code, machine-readable code, message and optional details.
    fn parts(&self) -> (StatusCode, &'static str, String, Option<serde_json::Value>) {
        match self {
            AppError::Room(RoomError::NotFound) => {
                (StatusCode::NOT_FOUND, "ROOM_NOT_FOUND", "Room not found".to_string(), None)
            }
            AppError::Room(RoomError::AgentNotFound) => {
                (StatusCode::NOT_FOUND, "AGENT_NOT_FOUND", "Agent not found".to_string(), None)
            }
            AppError::Room(RoomError::InvalidName(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Room(RoomError::UnknownScenario(key)) => (
                StatusCode::BAD_REQUEST,
                "UNKNOWN_SCENARIO",
                format!("Unknown scenario '{key}'"),
                None,
            ),
            AppError::Room(RoomError::EmptyMessage) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Message content is empty".to_string(),
                None,
            ),
            AppError::Room(RoomError::Storage(RepositoryError::Conflict(msg))) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None)
            }
            AppError::Room(e) => (StatusCode::INTERNAL_SERVER_ERROR, "ROOM_ERROR", e.to_string(), None),
            AppError::Simulation(SimulationError::RoomNotFound(_)) => {
                (StatusCode::NOT_FOUND, "ROOM_NOT_FOUND", "Room not found".to_string(), None)
            }
            AppError::Simulation(e @ SimulationError::NoAgents(_)) => {
                (StatusCode::CONFLICT, "NO_AGENTS", e.to_string(), None)
            }
            AppError::Simulation(e @ SimulationError::NoMessages(_)) => {
                (StatusCode::CONFLICT, "NO_MESSAGES", e.to_string(), None)
            }
            AppError::Simulation(SimulationError::Generation(llm)) => {
                let details = match llm {
                    LlmError::Http { status, .. } => Some(json!({ "backend_status": status })),
                    LlmError::Timeout { timeout_secs } => Some(json!({ "timeout_secs": timeout_secs })),
                    _ => None,
                };
                (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", llm.to_string(), details)
            }
            AppError::Simulation(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string(), None)
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone(), None)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        } else {
            tracing::debug!(code, %message, "request rejected");
        }

        (status, Json(ApiResponse::error(code, message, details))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::id::RoomId;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_simulation_errors_map_to_status() {
        let room = RoomId::new();
        assert_eq!(status_of(SimulationError::RoomNotFound(room).into()), StatusCode::NOT_FOUND);
        assert_eq!(status_of(SimulationError::NoAgents(room).into()), StatusCode::CONFLICT);
        assert_eq!(status_of(SimulationError::NoMessages(room).into()), StatusCode::CONFLICT);
        assert_eq!(
            status_of(SimulationError::Generation(LlmError::Timeout { timeout_secs: 60 }).into()),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_room_errors_map_to_status() {
        assert_eq!(status_of(RoomError::NotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(status_of(RoomError::AgentNotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(status_of(RoomError::EmptyMessage.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(RoomError::UnknownScenario("chess".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(RoomError::Storage(RepositoryError::Conflict("dup".to_string())).into()),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_generation_http_error_carries_backend_status() {
        let err = AppError::from(SimulationError::Generation(LlmError::Http {
            status: 404,
            body: "model not found".to_string(),
        }));
        let (_, code, _, details) = err.parts();
        assert_eq!(code, "GENERATION_FAILED");
        assert_eq!(details, Some(json!({ "backend_status": 404 })));
    }
}
