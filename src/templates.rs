//! Template and component lookup.
//!
//! Each project in a theme keeps its markup under a fixed layout:
//!
//! ```text
//! {root}/src/{project}/Static/templates/{template}.{ext}
//! {root}/src/{project}/Static/templates/components/{component}.{ext}
//! ```
//!
//! Template names may contain `/` to reach sub-directories. A missing file
//! is not an error: `load*` return `Ok(None)` so the caller can fall back.

use crate::config::TemplatesConfig;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid template name: {0}")]
    InvalidName(String),
}

/// Resolves template names to files under a theme root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLocator {
    pub root: PathBuf,
    pub extension: String,
}

impl From<&TemplatesConfig> for TemplateLocator {
    fn from(config: &TemplatesConfig) -> Self {
        Self {
            root: config.root.clone(),
            extension: config.extension.clone(),
        }
    }
}

impl TemplateLocator {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    fn templates_dir(&self, project: &str) -> PathBuf {
        self.root
            .join("src")
            .join(project)
            .join("Static")
            .join("templates")
    }

    /// Path of `template` in `project`. The file need not exist.
    pub fn locate(&self, project: &str, template: &str) -> PathBuf {
        self.templates_dir(project)
            .join(format!("{template}.{}", self.extension))
    }

    /// Path of a component in `project`. The file need not exist.
    pub fn locate_component(&self, project: &str, component: &str) -> PathBuf {
        self.templates_dir(project)
            .join("components")
            .join(format!("{component}.{}", self.extension))
    }

    /// Read a template. `Ok(None)` when it does not exist.
    pub fn load(&self, project: &str, template: &str) -> Result<Option<String>, TemplateError> {
        check_name(project)?;
        check_name(template)?;
        include_if_exists(&self.locate(project, template))
    }

    /// Read a component. `Ok(None)` when it does not exist.
    pub fn load_component(
        &self,
        project: &str,
        component: &str,
    ) -> Result<Option<String>, TemplateError> {
        check_name(project)?;
        check_name(component)?;
        include_if_exists(&self.locate_component(project, component))
    }
}

/// Names are relative paths without `..` segments.
fn check_name(name: &str) -> Result<(), TemplateError> {
    let bad = name.is_empty()
        || name.starts_with('/')
        || name.split(['/', '\\']).any(|segment| segment == "..");
    if bad {
        return Err(TemplateError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Read `path` if it exists.
pub fn include_if_exists(path: &Path) -> Result<Option<String>, TemplateError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "template not found");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
