use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Model with ID {0} not found")]
    ModelNotFound(String),

    #[error("Piper TTS is not installed or not found in PATH. Please install Piper TTS first.")]
    EngineNotAvailable,

    #[error("Piper TTS failed: {0}")]
    EngineFailure(String),

    #[error("Output file was not created")]
    OutputMissing,

    #[error("An error occurred during speech generation: {0}")]
    Unknown(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ModelNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EngineNotAvailable
            | AppError::EngineFailure(_)
            | AppError::OutputMissing
            | AppError::Unknown(_)
            | AppError::Io(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        tracing::error!("Request failed: {} - {}", status, detail);

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::ModelNotFound("female_x.onnx".into());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Model with ID female_x.onnx not found");
    }

    #[test]
    fn test_engine_errors_map_to_500() {
        assert_eq!(
            AppError::EngineNotAvailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::OutputMissing.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let err = AppError::EngineFailure("bad model".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Piper TTS failed: bad model");
    }
}
