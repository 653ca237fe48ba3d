//! Flow description file loader.
//!
//! A description file holds one flow, or a list of flows, in the model's own
//! underscore form. YAML and JSON are both accepted:
//!
//! ```yaml
//! - id: "11"
//!   table_id: 0
//!   priority: 1000
//!   match:
//!     ethernet_match:
//!       ethernet_type:
//!         type: 2048
//!     ipv4_destination: 10.11.12.13/24
//!   instructions:
//!     instruction:
//!       - order: 0
//!         apply_actions:
//!           action:
//!             - order: 0
//!               drop_action: {}
//! ```

use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::info;

use crate::error::{FlowError, FlowResult};
use crate::flow::FlowEntry;

/// Source name that reads from standard input.
pub const STDIN: &str = "-";

/// Description file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    pub fn from_path(path: impl AsRef<Path>) -> FlowResult<Self> {
        let path = path.as_ref();
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(FileFormat::Json),
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            _ => Err(FlowError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Parses flow descriptions from text.
pub fn parse_flows(content: &str, format: FileFormat) -> FlowResult<Vec<FlowEntry>> {
    let value: Value = match format {
        FileFormat::Json => serde_json::from_str(content)?,
        FileFormat::Yaml => serde_yaml::from_str(content)?,
    };

    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(FlowError::from))
            .collect(),
        Value::Null => Ok(Vec::new()),
        single => Ok(vec![serde_json::from_value(single)?]),
    }
}

/// Loads every flow of a description file.
pub fn load_flows(path: impl AsRef<Path>) -> FlowResult<Vec<FlowEntry>> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| FlowError::io(path, e))?;

    let flows = parse_flows(&content, format)?;
    info!("Loaded {} flow(s) from {}", flows.len(), path.display());
    Ok(flows)
}

/// Reads a JSON wire document from a file, or from stdin for `-`.
pub fn read_wire_document(source: &str) -> FlowResult<Value> {
    let content = if source == STDIN {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| FlowError::io("<stdin>", e))?;
        buf
    } else {
        fs::read_to_string(source).map_err(|e| FlowError::io(source, e))?
    };
    Ok(serde_json::from_str(&content)?)
}
