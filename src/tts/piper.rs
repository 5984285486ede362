use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use uuid::Uuid;

use crate::error::AppError;

/// Extension every synthesized file ends with.
pub const AUDIO_EXTENSION: &str = ".wav";

const OUTPUT_PREFIX: &str = "output_";

/// Something that turns text into an audio file using a model artifact.
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    async fn synthesize(&self, model_path: &Path, text: &str, output: &Path)
        -> Result<(), AppError>;
}

/// Runs the `piper` executable, feeding text on stdin.
pub struct PiperEngine {
    binary: PathBuf,
}

impl PiperEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl SynthesisEngine for PiperEngine {
    async fn synthesize(
        &self,
        model_path: &Path,
        text: &str,
        output: &Path,
    ) -> Result<(), AppError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-m").arg(model_path);
        cmd.arg("-f").arg(output);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(command = ?cmd, "Running piper");
        let mut child = cmd.spawn().map_err(|e| {
            tracing::warn!("Failed to start {}: {}", self.binary.display(), e);
            AppError::EngineNotAvailable
        })?;

        // Feed stdin while draining stdout/stderr, or a chatty engine fills
        // its pipes and both sides block.
        let stdin = child.stdin.take();
        let feed = async move {
            match stdin {
                // Dropped at the end of this block: EOF for piper
                Some(mut stdin) => stdin.write_all(text.as_bytes()).await,
                None => Ok(()),
            }
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output =
            output.map_err(|e| AppError::Unknown(format!("failed to wait for piper: {}", e)))?;

        match fed {
            Ok(()) => {}
            // The exit status below tells what happened.
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::debug!("piper closed stdin before reading all text");
            }
            Err(e) => {
                return Err(AppError::Unknown(format!(
                    "failed to send text to piper: {}",
                    e
                )));
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = if stderr.trim().is_empty() {
                format!("process exited with {}", output.status)
            } else {
                stderr.into_owned()
            };
            return Err(AppError::EngineFailure(diagnostic));
        }

        Ok(())
    }
}

/// Pick the output filename: the requested one, or `output_<8 hex>.wav`,
/// always ending in `.wav`.
pub fn resolve_output_filename(requested: Option<&str>) -> String {
    let mut filename = match requested.filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            let suffix = Uuid::new_v4().simple().to_string();
            format!("{}{}", OUTPUT_PREFIX, &suffix[..8])
        }
    };

    if !filename.ends_with(AUDIO_EXTENSION) {
        filename.push_str(AUDIO_EXTENSION);
    }

    filename
}
