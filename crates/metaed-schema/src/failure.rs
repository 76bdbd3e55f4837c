use crate::{
    source::{FileIndex, FileMap, SourceMap},
    version::{SemVer, satisfies},
};
use derive_more::Display;
use serde::Serialize;

///
/// FailureCategory
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum FailureCategory {
    #[display("error")]
    Error,
    #[display("warning")]
    Warning,
}

///
/// ValidationFailure
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ValidationFailure {
    pub validator_name: &'static str,
    pub category: FailureCategory,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<SourceMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_map: Option<FileMap>,
}

impl ValidationFailure {
    #[must_use]
    pub fn error(
        validator_name: &'static str,
        message: impl Into<String>,
        source_map: Option<&SourceMap>,
    ) -> Self {
        Self::new(validator_name, FailureCategory::Error, message, source_map)
    }

    #[must_use]
    pub fn warning(
        validator_name: &'static str,
        message: impl Into<String>,
        source_map: Option<&SourceMap>,
    ) -> Self {
        Self::new(validator_name, FailureCategory::Warning, message, source_map)
    }

    #[must_use]
    pub fn new(
        validator_name: &'static str,
        category: FailureCategory,
        message: impl Into<String>,
        source_map: Option<&SourceMap>,
    ) -> Self {
        Self {
            validator_name,
            category,
            message: message.into(),
            source_map: source_map.cloned(),
            file_map: None,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.category, FailureCategory::Error)
    }

    /// Fill in `file_map` from the source line, if any.
    pub fn stamp_file_map(&mut self, index: &FileIndex) {
        if let Some(source_map) = &self.source_map {
            self.file_map = index.lookup(source_map.line);
        }
    }
}

///
/// SeverityByVersion
///
/// A failure category that depends on the target version.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SeverityByVersion {
    pub range: &'static str,
    pub within: FailureCategory,
    pub otherwise: FailureCategory,
}

impl SeverityByVersion {
    #[must_use]
    pub const fn new(range: &'static str, within: FailureCategory, otherwise: FailureCategory) -> Self {
        Self {
            range,
            within,
            otherwise,
        }
    }

    #[must_use]
    pub fn category(&self, target: &SemVer) -> FailureCategory {
        if satisfies(target, self.range) {
            self.within
        } else {
            self.otherwise
        }
    }
}

///
/// TESTS
///
