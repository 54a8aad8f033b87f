//! The structured project the generation model returns.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{Result, StudioError};

/// Prompts offered to first-time users.
pub const SUGGESTIONS: &[&str] = &[
    "Aplikasi web Flask untuk To-Do List sederhana",
    "Script Python untuk scraping judul berita dari web",
    "REST API Kalkulator dengan history log",
    "Bot Discord sederhana untuk menyapa user",
];

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub filename: String,
    pub content: String,
    pub language: String,
}

/// A complete generated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProject {
    pub project_name: String,
    pub description: String,
    pub files: Vec<ProjectFile>,
    pub setup_instructions: String,
}

impl GeneratedProject {
    /// Parse and validate the model's JSON text.
    ///
    /// Empty text, invalid JSON, a missing field or an empty file list are
    /// all contract violations.
    pub fn from_model_text(text: &str) -> Result<Self> {
        let body = strip_code_fence(text.trim());
        if body.is_empty() {
            return Err(StudioError::ContractViolation("model returned no text".to_string()));
        }

        let project: GeneratedProject = serde_json::from_str(body)
            .map_err(|e| StudioError::ContractViolation(format!("invalid project JSON: {e}")))?;

        if project.files.is_empty() {
            return Err(StudioError::ContractViolation("project has no files".to_string()));
        }
        if let Some(file) = project.files.iter().find(|f| f.filename.trim().is_empty()) {
            return Err(StudioError::ContractViolation(format!(
                "a {} file has no filename",
                file.language
            )));
        }
        debug!(files = project.files.len(), name = %project.project_name, "parsed project");
        Ok(project)
    }

    /// Write every file under `root`, creating directories as needed.
    ///
    /// Filenames must be relative and stay inside `root`; the whole project
    /// is rejected before anything is written otherwise.
    pub fn write_to(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let targets = self
            .files
            .iter()
            .map(|file| safe_join(root, &file.filename).map(|path| (path, &file.content)))
            .collect::<Result<Vec<_>>>()?;

        let mut written = Vec::with_capacity(targets.len());
        for (path, content) in targets {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, content)?;
            written.push(path);
        }
        Ok(written)
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn safe_join(root: &Path, filename: &str) -> Result<PathBuf> {
    let relative = Path::new(filename);
    let mut clean = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(StudioError::ContractViolation(format!(
                    "refusing to write '{filename}' outside the output directory"
                )));
            }
        }
    }
    if clean.as_os_str().is_empty() {
        return Err(StudioError::ContractViolation(format!("'{filename}' is not a file path")));
    }
    Ok(root.join(clean))
}

/// Response schema sent with every generation request.
pub fn project_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "projectName": {
                "type": "STRING",
                "description": "A short, creative name for the python project."
            },
            "description": {
                "type": "STRING",
                "description": "A brief summary of what the application does."
            },
            "files": {
                "type": "ARRAY",
                "description": "List of files required for the project.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "filename": {
                            "type": "STRING",
                            "description": "Name of the file (e.g., app.py, requirements.txt)"
                        },
                        "content": {
                            "type": "STRING",
                            "description": "The full source code or content of the file."
                        },
                        "language": {
                            "type": "STRING",
                            "description": "The programming language (python, text, json, html)."
                        }
                    },
                    "required": ["filename", "content", "language"]
                }
            },
            "setupInstructions": {
                "type": "STRING",
                "description": "Step-by-step instructions on how to run the application (in Indonesian/English based on prompt)."
            }
        },
        "required": ["projectName", "files", "setupInstructions", "description"]
    })
}
