// =============================================================================
// GOOGLE DOCS API STRUCTURES
// =============================================================================
//
// Response side: just enough of `documents.get` to find the body's trailing
// boundary and to pull plain text out of paragraphs and tables.
// Request side: the two `batchUpdate` operations a full-body replace needs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<Body>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    /// Kept untyped so a malformed index degrades to the empty-body fallback
    /// instead of failing the whole parse.
    #[serde(default)]
    pub end_index: Option<Value>,
    pub paragraph: Option<Paragraph>,
    pub table: Option<Table>,
}

impl StructuralElement {
    pub fn end_index(&self) -> Option<i64> {
        self.end_index.as_ref().and_then(Value::as_i64)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

// =============================================================================
// BATCH UPDATE REQUESTS
// =============================================================================

/// One entry of a `documents.batchUpdate` request list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DocsRequest {
    DeleteContentRange { range: DocRange },
    InsertText { location: Location, text: String },
}

/// Half-open `[start_index, end_index)` span of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocRange {
    pub start_index: i64,
    pub end_index: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub index: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchUpdateDocumentRequest {
    pub requests: Vec<DocsRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_serialize_to_docs_api_shape() {
        let batch = BatchUpdateDocumentRequest {
            requests: vec![
                DocsRequest::DeleteContentRange {
                    range: DocRange {
                        start_index: 1,
                        end_index: 41,
                    },
                },
                DocsRequest::InsertText {
                    location: Location { index: 1 },
                    text: "hi".into(),
                },
            ],
        };

        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            json!({
                "requests": [
                    {"deleteContentRange": {"range": {"startIndex": 1, "endIndex": 41}}},
                    {"insertText": {"location": {"index": 1}, "text": "hi"}}
                ]
            })
        );
    }

    #[test]
    fn non_numeric_end_index_reads_as_none() {
        let element: StructuralElement =
            serde_json::from_value(json!({"endIndex": "forty-two"})).unwrap();
        assert_eq!(element.end_index(), None);

        let element: StructuralElement = serde_json::from_value(json!({"endIndex": 42})).unwrap();
        assert_eq!(element.end_index(), Some(42));
    }
}
