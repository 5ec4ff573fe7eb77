use serde::Serialize;
use serde_json::{Map, Value};

/// A report content block handed to the external doc-site generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedContent {
    /// A text template with `$name` placeholders and their parameters
    Text {
        template: String,
        params: Map<String, Value>,
        styling: Option<Value>,
    },
    Table {
        header_row: Vec<String>,
        rows: Vec<Vec<Value>>,
        styling: Option<Value>,
    },
}
