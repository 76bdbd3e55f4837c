use derive_more::Display;
use metaed_schema::data::PluginId;
use serde::Serialize;
use std::time::Duration;

///
/// OutputContent
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum OutputContent {
    Text(String),
    Binary(Vec<u8>),
}

impl OutputContent {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }
}

///
/// GeneratedOutput
///
/// One artifact. Writing it anywhere is the caller's concern.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GeneratedOutput {
    pub name: String,
    pub namespace: String,
    pub folder_name: String,
    pub file_name: String,
    pub content: OutputContent,
}

impl GeneratedOutput {
    /// Folder and file name joined with `/`.
    #[must_use]
    pub fn relative_path(&self) -> String {
        if self.folder_name.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}/{}", self.folder_name, self.file_name)
        }
    }
}

///
/// GeneratorResult
///

#[derive(Clone, Debug, Serialize)]
pub struct GeneratorResult {
    pub generator_name: &'static str,
    pub plugin: PluginId,
    pub outputs: Vec<GeneratedOutput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

///
/// EnhancerResult
///

#[derive(Clone, Debug, Serialize)]
pub struct EnhancerResult {
    pub enhancer_name: &'static str,
    pub plugin: PluginId,
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

///
/// BuildWarning
///
/// Non-fatal problems surfaced to the caller alongside validation
/// failures.
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum BuildWarning {
    #[display("{plugin} enhancer {enhancer} failed: {message}")]
    EnhancerFailed {
        plugin: PluginId,
        enhancer: &'static str,
        message: String,
    },

    #[display("{plugin} generator {generator} failed: {message}")]
    GeneratorFailed {
        plugin: PluginId,
        generator: &'static str,
        message: String,
    },

    #[display("{plugin} generator {generator} took {elapsed:?}, over its {budget:?} budget")]
    GeneratorOverBudget {
        plugin: PluginId,
        generator: &'static str,
        elapsed: Duration,
        budget: Duration,
    },
}
