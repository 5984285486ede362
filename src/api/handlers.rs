use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::{HealthResponse, SynthesisRequest};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::tts::{SynthesisResult, VoiceModel};

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Voice Model API Server",
        "endpoints": {
            "GET /models": "Get list of available voice models",
            "GET /models/{model_id}": "Get details of a specific model",
            "POST /tts": "Generate speech using a model"
        }
    }))
}

pub async fn list_models(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VoiceModel>>, AppError> {
    let models = state.tts.list_models().await?;
    Ok(Json(models))
}

pub async fn get_model(
    State(state): State<Arc<AppState>>,
    Path(model_id): Path<String>,
) -> Result<Json<VoiceModel>, AppError> {
    let model = state.tts.find_model(&model_id).await?;
    Ok(Json(model))
}

pub async fn generate_speech(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SynthesisRequest>,
) -> Result<Json<SynthesisResult>, AppError> {
    // Unknown models never reach the engine
    let model = state.tts.find_model(&request.model_id).await?;

    let result = state
        .tts
        .synthesize(&model, &request.text, request.output_filename.as_deref())
        .await?;

    Ok(Json(result))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
