//! Character dictionary extraction from `inference.yml`.
//!
//! PaddleOCR recognition models ship their dictionary inside the
//! post-processing section of the inference config. The runtime expects it
//! as a plain text file with one entry per line.

use async_trait::async_trait;
use serde_yaml::Value;

use super::stage::{ConversionStage, StageContext};
use super::types::{ModelDirectory, StageKind, StageOutcome};
use crate::config::ArtifactNames;
use crate::error::StageFailure;

const POST_PROCESS_KEY: &str = "PostProcess";
const CHARACTER_DICT_KEY: &str = "character_dict";

/// Writes `ppocr_keys.txt` from `inference.yml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryExtraction;

#[async_trait]
impl ConversionStage for DictionaryExtraction {
    fn kind(&self) -> StageKind {
        StageKind::ExtractDict
    }

    fn inputs(&self) -> Vec<&str> {
        vec![ArtifactNames::PADDLE_CONFIG]
    }

    fn output(&self) -> &str {
        ArtifactNames::CHARACTER_DICT
    }

    async fn execute(&self, dir: &ModelDirectory, ctx: &StageContext<'_>) -> StageOutcome {
        match extract_to_file(dir, ctx) {
            Ok(count) => StageOutcome::converted(format!("{count} chars")),
            Err(failure) => StageOutcome::failed(failure),
        }
    }
}

fn extract_to_file(dir: &ModelDirectory, ctx: &StageContext<'_>) -> Result<usize, StageFailure> {
    let config_path = dir.join(ArtifactNames::PADDLE_CONFIG);
    let yaml = ctx
        .fs
        .read_to_string(&config_path)
        .map_err(|e| StageFailure::Parse {
            file: ArtifactNames::PADDLE_CONFIG.to_string(),
            message: e.to_string(),
        })?;

    let entries = parse_character_dict(&yaml)?;
    let contents = render_dictionary(&entries);

    ctx.fs
        .write(&dir.join(ArtifactNames::CHARACTER_DICT), &contents)
        .map_err(|e| StageFailure::Write {
            file: ArtifactNames::CHARACTER_DICT.to_string(),
            message: e.to_string(),
        })?;

    Ok(entries.len())
}

/// Pull `PostProcess.character_dict` out of an inference config.
///
/// `PostProcess` is either a single mapping or a list of mappings; in the
/// list form the first element that has the field wins. Null entries become
/// empty strings.
pub fn parse_character_dict(yaml: &str) -> Result<Vec<String>, StageFailure> {
    let data: Value = serde_yaml::from_str(yaml).map_err(|e| StageFailure::Parse {
        file: ArtifactNames::PADDLE_CONFIG.to_string(),
        message: e.to_string(),
    })?;

    let not_found = || StageFailure::DictionaryNotFound(ArtifactNames::PADDLE_CONFIG.to_string());

    let dict = match data.get(POST_PROCESS_KEY) {
        Some(Value::Mapping(section)) => section.get(CHARACTER_DICT_KEY),
        Some(Value::Sequence(sections)) => sections
            .iter()
            .filter_map(Value::as_mapping)
            .find_map(|section| section.get(CHARACTER_DICT_KEY)),
        _ => None,
    };

    match dict {
        Some(Value::Sequence(items)) if !items.is_empty() => {
            Ok(items.iter().map(entry_text).collect())
        }
        _ => Err(not_found()),
    }
}

fn entry_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// One entry per line, every line newline-terminated.
pub fn render_dictionary(entries: &[String]) -> String {
    let mut out = String::with_capacity(entries.iter().map(|e| e.len() + 1).sum());
    for entry in entries {
        out.push_str(entry);
        out.push('\n');
    }
    out
}
