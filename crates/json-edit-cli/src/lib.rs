//! Command-line front end for [`json_edit`].
//!
//! Loads the document, turns the subcommand into a core call, writes the
//! result back to the source file if there was one, and reports everything
//! as a single JSON envelope.

pub mod cli;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use json_edit::{Document, Edit, EditError};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::cli::{Cli, Commands, SourceArgs};

/// Request-level failures, plus whatever the core reports.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{what} is not valid JSON: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Edit(#[from] EditError),
}

impl CliError {
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Io { .. } => "IO",
            CliError::Json { .. } => "INVALID_JSON",
            CliError::InvalidRequest(_) => "INVALID_REQUEST",
            CliError::Edit(e) => e.kind().as_str(),
        }
    }

    pub fn pointer(&self) -> Option<&str> {
        match self {
            CliError::Edit(e) => e.pointer(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
    /// JSON Pointer to the node the edit failed on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
}

/// `{"ok":true,"result":...}` or `{"ok":false,"error":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(err: &CliError) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(ErrorBody {
                kind: err.code(),
                message: err.to_string(),
                pointer: err.pointer().map(str::to_string),
            }),
        }
    }

    pub fn render(&self, pretty: bool) -> String {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        rendered.unwrap_or_else(|e| {
            let error = json!({"kind": "INTERNAL", "message": e.to_string()});
            json!({"ok": false, "error": error}).to_string()
        })
    }
}

impl From<Result<Value, CliError>> for Response {
    fn from(result: Result<Value, CliError>) -> Self {
        match result {
            Ok(value) => Response::success(value),
            Err(err) => Response::failure(&err),
        }
    }
}

/// Run one command and wrap the outcome in an envelope. Never panics on a
/// malformed request.
pub fn execute(cli: &Cli, stdin: &mut dyn Read) -> Response {
    let result = run(cli, stdin);
    match &result {
        Ok(_) => tracing::debug!(command = cli.command.name(), "command succeeded"),
        Err(e) => tracing::warn!(command = cli.command.name(), kind = e.code(), "{e}"),
    }
    result.into()
}

/// Run one command: its result value, or the first error.
///
/// Arguments are checked before the document is loaded, so a bad request
/// never touches it.
pub fn run(cli: &Cli, stdin: &mut dyn Read) -> Result<Value, CliError> {
    let edit = match &cli.command {
        Commands::Search { needle } => {
            if needle.is_empty() {
                return Err(CliError::InvalidRequest("search needle must not be empty".into()));
            }
            let (value, _) = load(&cli.source, stdin)?;
            return Ok(search_hits(&Document::new(value), needle));
        }
        Commands::Query { path } => {
            let (value, _) = load(&cli.source, stdin)?;
            return Ok(Value::Array(Document::new(value).query(path)?));
        }
        Commands::Replace { path, value } => Edit::Replace {
            path: path.clone(),
            value: parse_value(value)?,
        },
        Commands::Append { path, value } => Edit::Append {
            path: path.clone(),
            value: parse_value(value)?,
        },
        Commands::Set { path, value, all } => Edit::Set {
            path: path.clone(),
            value: parse_value(value)?,
            apply_to_all: *all,
        },
        Commands::Delete { path } => Edit::Delete { path: path.clone() },
    };

    let (value, origin) = load(&cli.source, stdin)?;
    let mut doc = Document::new(value);
    tracing::debug!(op = edit.name(), path = edit.path(), "applying edit");
    doc.apply(&edit)?;
    let updated = doc.into_value();

    match origin {
        Some(path) if !cli.dry_run => {
            persist(&path, &updated)?;
            tracing::info!(file = %path.display(), "document written");
        }
        Some(path) => tracing::info!(file = %path.display(), "dry run, not writing"),
        None => {}
    }
    Ok(updated)
}

fn search_hits(doc: &Document, needle: &str) -> Value {
    let hits = doc
        .search(needle)
        .into_iter()
        .map(|hit| json!({"path": hit.path, "value": hit.value}))
        .collect();
    Value::Array(hits)
}

fn parse_value(text: &str) -> Result<Value, CliError> {
    serde_json::from_str(text).map_err(|source| CliError::Json {
        what: "value",
        source,
    })
}

/// The document and, when it came from a file, that file's path.
fn load(source: &SourceArgs, stdin: &mut dyn Read) -> Result<(Value, Option<PathBuf>), CliError> {
    if let Some(text) = &source.json {
        if source.file.is_some() {
            tracing::debug!("--json given, ignoring --file");
        }
        let value = serde_json::from_str(text).map_err(|source| CliError::Json {
            what: "document",
            source,
        })?;
        return Ok((value, None));
    }

    if let Some(path) = &source.file {
        tracing::debug!(file = %path.display(), "reading document");
        let text = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        let value = serde_json::from_str(&text).map_err(|source| CliError::Json {
            what: "document",
            source,
        })?;
        return Ok((value, Some(path.clone())));
    }

    let mut text = String::new();
    stdin.read_to_string(&mut text).map_err(|source| CliError::Io {
        path: PathBuf::from("<stdin>"),
        source,
    })?;
    if text.trim().is_empty() {
        return Err(CliError::InvalidRequest(
            "no document: pass --json, --file, or pipe JSON on stdin".into(),
        ));
    }
    let value = serde_json::from_str(&text).map_err(|source| CliError::Json {
        what: "document",
        source,
    })?;
    Ok((value, None))
}

fn persist(path: &Path, value: &Value) -> Result<(), CliError> {
    let mut text = serde_json::to_string_pretty(value).map_err(|source| CliError::Json {
        what: "result",
        source,
    })?;
    text.push('\n');
    fs::write(path, text).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
