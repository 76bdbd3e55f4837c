//! Build configuration: the projects (namespaces) taking part in a build,
//! their dependencies, the plugins to run and pipeline policy.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("project namespace '{0}' is declared more than once")]
    DuplicateNamespace(String),

    #[error("plugin '{0}' is declared more than once")]
    DuplicatePlugin(String),

    #[error("project '{0}' has an empty namespace name")]
    EmptyNamespaceName(String),

    #[error("project '{namespace}' depends on undeclared project '{dependency}'")]
    UnknownDependency {
        namespace: String,
        dependency: String,
    },
}

///
/// ProjectConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub namespace_name: String,
    pub project_name: String,
    pub project_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_extension: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl ProjectConfig {
    #[must_use]
    pub fn core(namespace_name: impl Into<String>, project_version: impl Into<String>) -> Self {
        let namespace_name = namespace_name.into();

        Self {
            project_name: namespace_name.clone(),
            namespace_name,
            project_version: project_version.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn extension(
        namespace_name: impl Into<String>,
        project_extension: impl Into<String>,
        project_version: impl Into<String>,
    ) -> Self {
        Self {
            project_extension: project_extension.into(),
            ..Self::core(namespace_name, project_version)
        }
    }

    #[must_use]
    pub fn depends_on(mut self, namespace_name: impl Into<String>) -> Self {
        self.dependencies.push(namespace_name.into());
        self
    }

    #[must_use]
    pub const fn is_extension(&self) -> bool {
        !self.project_extension.is_empty()
    }
}

///
/// PluginConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfig {
    pub short_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_version: Option<String>,
}

impl PluginConfig {
    #[must_use]
    pub fn new(short_name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            target_version: None,
        }
    }

    #[must_use]
    pub fn target_version(mut self, version: impl Into<String>) -> Self {
        self.target_version = Some(version.into());
        self
    }
}

///
/// BuildConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_plugin_version: Option<String>,

    #[serde(default = "default_stop_on_validation_error")]
    pub stop_on_validation_error: bool,

    #[serde(default)]
    pub projects: Vec<ProjectConfig>,

    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

const fn default_stop_on_validation_error() -> bool {
    true
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            default_plugin_version: None,
            stop_on_validation_error: default_stop_on_validation_error(),
            projects: Vec::new(),
            plugins: Vec::new(),
        }
    }
}

impl BuildConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and check a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.check()?;

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn with_project(mut self, project: ProjectConfig) -> Self {
        self.projects.push(project);
        self
    }

    #[must_use]
    pub fn with_plugin(mut self, plugin: PluginConfig) -> Self {
        self.plugins.push(plugin);
        self
    }

    #[must_use]
    pub fn with_default_plugin_version(mut self, version: impl Into<String>) -> Self {
        self.default_plugin_version = Some(version.into());
        self
    }

    #[must_use]
    pub const fn with_stop_on_validation_error(mut self, stop: bool) -> Self {
        self.stop_on_validation_error = stop;
        self
    }

    #[must_use]
    pub fn project(&self, namespace_name: &str) -> Option<&ProjectConfig> {
        self.projects
            .iter()
            .find(|p| p.namespace_name == namespace_name)
    }

    /// Project version of the first core project, the last-resort plugin
    /// target version.
    #[must_use]
    pub fn core_project_version(&self) -> Option<&str> {
        self.projects
            .iter()
            .find(|p| !p.is_extension())
            .map(|p| p.project_version.as_str())
    }

    /// Structural checks that need no schema.
    pub fn check(&self) -> Result<(), ConfigError> {
        let mut namespaces = BTreeSet::new();
        for project in &self.projects {
            if project.namespace_name.trim().is_empty() {
                return Err(ConfigError::EmptyNamespaceName(project.project_name.clone()));
            }
            if !namespaces.insert(project.namespace_name.as_str()) {
                return Err(ConfigError::DuplicateNamespace(project.namespace_name.clone()));
            }
        }

        for project in &self.projects {
            if let Some(missing) = project
                .dependencies
                .iter()
                .find(|d| !namespaces.contains(d.as_str()))
            {
                return Err(ConfigError::UnknownDependency {
                    namespace: project.namespace_name.clone(),
                    dependency: missing.clone(),
                });
            }
        }

        let mut plugins = BTreeSet::new();
        for plugin in &self.plugins {
            if !plugins.insert(plugin.short_name.as_str()) {
                return Err(ConfigError::DuplicatePlugin(plugin.short_name.clone()));
            }
        }

        Ok(())
    }
}

///
/// TESTS
///
