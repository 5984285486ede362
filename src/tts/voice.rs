use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of a Piper model artifact.
pub const MODEL_EXTENSION: &str = "onnx";

/// Country reported when the locale token carries no region.
pub const UNKNOWN_COUNTRY: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    /// Name of the top-level directory holding models of this gender.
    pub fn dir_name(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceModel {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub language: String,
    pub country: String,
    pub path: String,
    pub quality: String,
    pub description: Option<String>,
}

/// Fields carried by a model filename such as `en_GB-alba-medium`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName {
    pub language: String,
    pub country: String,
    pub quality: String,
}

#[derive(Debug, Deserialize)]
struct ModelMetadata {
    #[serde(default)]
    description: Option<String>,
}

/// Parse `<locale>-<name>-<quality>`. Returns `None` for anything with fewer
/// than three hyphen-separated tokens.
pub fn parse_model_filename(stem: &str) -> Option<ModelName> {
    let parts: Vec<&str> = stem.split('-').collect();
    if parts.len() < 3 {
        return None;
    }

    let locale = parts[0];
    let (language, country) = locale.split_once('_').unwrap_or((locale, UNKNOWN_COUNTRY));

    Some(ModelName {
        language: language.to_string(),
        country: country.to_string(),
        quality: parts[parts.len() - 1].to_string(),
    })
}

/// Walk `{base}/female|male/{country}/*.onnx` and describe every model found.
///
/// Never fails: missing directories, malformed filenames and broken sidecar
/// files are skipped or defaulted.
pub fn scan(base_dir: &Path) -> Vec<VoiceModel> {
    let mut models = Vec::new();

    let base = match fs::canonicalize(base_dir) {
        Ok(base) => base,
        Err(e) => {
            tracing::debug!("Models directory {} unavailable: {}", base_dir.display(), e);
            return models;
        }
    };

    for gender in Gender::ALL {
        let gender_dir = base.join(gender.dir_name());
        if !gender_dir.is_dir() {
            continue;
        }

        for country_dir in sorted_entries(&gender_dir) {
            if !country_dir.is_dir() {
                continue;
            }

            for model_path in sorted_entries(&country_dir) {
                if !is_model_artifact(&model_path) {
                    continue;
                }

                if let Some(model) = describe(&base, gender, &model_path) {
                    models.push(model);
                }
            }
        }
    }

    models
}

/// Linear lookup over a freshly scanned list.
pub fn find_by_id<'a>(models: &'a [VoiceModel], id: &str) -> Option<&'a VoiceModel> {
    models.iter().find(|model| model.id == id)
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot read {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();
    paths
}

fn is_model_artifact(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|e| e == MODEL_EXTENSION)
            .unwrap_or(false)
}

fn describe(base: &Path, gender: Gender, model_path: &Path) -> Option<VoiceModel> {
    let name = model_path.file_stem()?.to_string_lossy().into_owned();

    let Some(parsed) = parse_model_filename(&name) else {
        tracing::debug!(
            "Skipping {}: expected <locale>-<name>-<quality>",
            model_path.display()
        );
        return None;
    };

    let id = model_id(base, model_path)?;

    Some(VoiceModel {
        id,
        name,
        gender,
        language: parsed.language,
        country: parsed.country,
        path: model_path.to_string_lossy().into_owned(),
        quality: parsed.quality,
        description: read_description(model_path),
    })
}

/// Path relative to the models directory, flattened with `_`.
fn model_id(base: &Path, model_path: &Path) -> Option<String> {
    let relative = model_path.strip_prefix(base).ok()?;
    Some(relative.to_string_lossy().replace(&['/', '\\'][..], "_"))
}

fn read_description(model_path: &Path) -> Option<String> {
    // `voice.json` first, then Piper's own `voice.onnx.json`
    let mut piper_sidecar = OsString::from(model_path.as_os_str());
    piper_sidecar.push(".json");

    let sidecar = [model_path.with_extension("json"), PathBuf::from(piper_sidecar)]
        .into_iter()
        .find(|p| p.is_file())?;

    let contents = match fs::read_to_string(&sidecar) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!("Ignoring unreadable sidecar {}: {}", sidecar.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<ModelMetadata>(&contents) {
        Ok(metadata) => metadata.description,
        Err(e) => {
            tracing::debug!("Ignoring malformed sidecar {}: {}", sidecar.display(), e);
            None
        }
    }
}
