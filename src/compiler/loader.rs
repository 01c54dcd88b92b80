use crate::compiler::validator::{ValidationIssue, Validator};
use crate::dsl::{GraphEdge, GraphNode, Workflow};
use crate::error::ImportError;
use anyhow::{Context as AnyhowContext, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Description written into every exported document.
pub const EXPORT_DESCRIPTION: &str = "Workflow Matrix créé avec le builder";

/// Outcome of a successful import, ready for `GraphStore::load_workflow`.
#[derive(Debug)]
pub struct Imported {
    pub workflow: Workflow,
    pub issues: Vec<ValidationIssue>,
}

/// Builds the export document. Both timestamps are set to `now`; edges are
/// reduced to id, source and target.
pub fn export_workflow(
    id: String,
    name: &str,
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    now: DateTime<Utc>,
) -> Workflow {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    Workflow {
        id,
        name: name.to_string(),
        description: Some(EXPORT_DESCRIPTION.to_string()),
        nodes: nodes.to_vec(),
        edges: edges
            .iter()
            .map(|e| GraphEdge {
                extra: Map::new(),
                ..e.clone()
            })
            .collect(),
        created_at: Some(stamp.clone()),
        updated_at: Some(stamp),
    }
}

pub fn to_json(workflow: &Workflow) -> serde_json::Result<String> {
    serde_json::to_string_pretty(workflow)
}

/// `"Mon Workflow  Matrix"` becomes `"mon-workflow-matrix.json"`.
pub fn export_file_name(name: &str) -> String {
    let slug = name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();
    format!("{}.json", slug)
}

/// Writes the document into `dir` under its export file name.
pub fn write_workflow(dir: &Path, workflow: &Workflow) -> Result<PathBuf> {
    let path = dir.join(export_file_name(&workflow.name));
    let json = to_json(workflow).context("Failed to serialize workflow")?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write workflow to {}", path.display()))?;
    info!(path = %path.display(), nodes = workflow.nodes.len(), edges = workflow.edges.len(), "Exported workflow");
    Ok(path)
}

/// Extension gate, applied before any content is read.
pub fn check_file_name(file_name: &str) -> Result<(), ImportError> {
    if file_name.ends_with(".json") {
        Ok(())
    } else {
        Err(ImportError::WrongFileType {
            file_name: file_name.to_string(),
        })
    }
}

/// Parses and validates document text.
pub fn parse_workflow(content: &str) -> Result<Imported, ImportError> {
    // 1. Syntax
    let value: Value = serde_json::from_str(content).map_err(ImportError::ParseError)?;

    // 2. Required fields
    for field in ["nodes", "edges"] {
        if !value.get(field).is_some_and(Value::is_array) {
            return Err(ImportError::InvalidSchema {
                reason: format!("missing `{}` array", field),
            });
        }
    }

    // 3. Typed decode
    let workflow: Workflow = serde_json::from_value(value).map_err(|e| ImportError::InvalidSchema {
        reason: e.to_string(),
    })?;

    // 4. Validation
    let validated = Validator::new().validate(workflow);
    debug!(
        name = %validated.workflow.name,
        nodes = validated.workflow.nodes.len(),
        edges = validated.workflow.edges.len(),
        issues = validated.issues.len(),
        "Parsed workflow"
    );

    Ok(Imported {
        workflow: validated.workflow,
        issues: validated.issues,
    })
}

/// Import of an in-memory file, e.g. one handed over by a file picker.
pub fn import_workflow(file_name: &str, content: &str) -> Result<Imported, ImportError> {
    check_file_name(file_name)?;
    parse_workflow(content)
}

pub fn load_workflow_from_json(path: &Path) -> Result<Imported, ImportError> {
    check_file_name(&file_name_of(path))?;
    let content = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_workflow(&content)
}

/// Async import. The file read is the only suspend point; concurrent calls
/// do not coordinate, so the caller that loads its result last wins.
pub async fn read_workflow_file(path: &Path) -> Result<Imported, ImportError> {
    check_file_name(&file_name_of(path))?;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_workflow(&content)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
