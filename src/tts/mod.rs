pub mod piper;
pub mod voice;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::AppError;

pub use piper::{PiperEngine, SynthesisEngine};
pub use voice::VoiceModel;

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisResult {
    pub success: bool,
    pub message: String,
    pub output_file: Option<String>,
}

/// Model discovery plus synthesis. Holds no model state: every call rescans
/// the models directory.
pub struct TtsService {
    models_dir: PathBuf,
    output_dir: PathBuf,
    engine: Arc<dyn SynthesisEngine>,
}

impl TtsService {
    pub fn new(models_dir: PathBuf, output_dir: PathBuf, engine: Arc<dyn SynthesisEngine>) -> Self {
        Self {
            models_dir,
            output_dir,
            engine,
        }
    }

    /// Scan the models directory on the blocking pool.
    pub async fn list_models(&self) -> Result<Vec<VoiceModel>, AppError> {
        let models_dir = self.models_dir.clone();
        tokio::task::spawn_blocking(move || voice::scan(&models_dir))
            .await
            .map_err(|e| AppError::Unknown(format!("model scan aborted: {}", e)))
    }

    pub async fn find_model(&self, model_id: &str) -> Result<VoiceModel, AppError> {
        let models = self.list_models().await?;
        voice::find_by_id(&models, model_id)
            .cloned()
            .ok_or_else(|| AppError::ModelNotFound(model_id.to_string()))
    }

    pub async fn synthesize(
        &self,
        model: &VoiceModel,
        text: &str,
        output_filename: Option<&str>,
    ) -> Result<SynthesisResult, AppError> {
        let filename = piper::resolve_output_filename(output_filename);
        let output_path = self.output_dir.join(&filename);

        tracing::info!(
            "Synthesizing {} bytes of text with {} into {}",
            text.len(),
            model.id,
            output_path.display()
        );

        self.engine
            .synthesize(Path::new(&model.path), text, &output_path)
            .await?;

        if !tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            return Err(AppError::OutputMissing);
        }

        let output_file = tokio::fs::canonicalize(&output_path)
            .await
            .map_err(|e| AppError::Unknown(e.to_string()))?;

        Ok(SynthesisResult {
            success: true,
            message: "Speech generated successfully".to_string(),
            output_file: Some(output_file.to_string_lossy().into_owned()),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    pub enum MockBehavior {
        WriteOutput,
        WriteNothing,
        Fail(&'static str),
    }

    /// What the engine was handed for one synthesis.
    #[derive(Debug, Clone, PartialEq)]
    pub struct EngineCall {
        pub model_path: PathBuf,
        pub text: String,
        pub output: PathBuf,
    }

    /// Engine double that records every request it receives.
    pub struct MockEngine {
        received: Mutex<Vec<EngineCall>>,
        behavior: MockBehavior,
    }

    impl MockEngine {
        pub fn new(behavior: MockBehavior) -> Arc<Self> {
            Arc::new(Self {
                received: Mutex::new(Vec::new()),
                behavior,
            })
        }

        pub fn calls(&self) -> usize {
            self.received.lock().unwrap().len()
        }

        pub fn received(&self) -> Vec<EngineCall> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SynthesisEngine for MockEngine {
        async fn synthesize(
            &self,
            model_path: &Path,
            text: &str,
            output: &Path,
        ) -> Result<(), AppError> {
            self.received.lock().unwrap().push(EngineCall {
                model_path: model_path.to_path_buf(),
                text: text.to_string(),
                output: output.to_path_buf(),
            });
            match self.behavior {
                MockBehavior::WriteOutput => {
                    tokio::fs::write(output, b"RIFF").await?;
                    Ok(())
                }
                MockBehavior::WriteNothing => Ok(()),
                MockBehavior::Fail(stderr) => Err(AppError::EngineFailure(stderr.to_string())),
            }
        }
    }

    pub const FRENCH_MODEL_ID: &str = "female_france_fr_FR-upmc-medium.onnx";

    /// A models tree holding a single French voice.
    pub fn model_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let country = dir.path().join("female").join("france");
        std::fs::create_dir_all(&country).unwrap();
        std::fs::write(country.join("fr_FR-upmc-medium.onnx"), b"").unwrap();
        std::fs::write(
            country.join("fr_FR-upmc-medium.json"),
            r#"{"description": "UPMC French voice"}"#,
        )
        .unwrap();
        dir
    }
}
