// Pure helpers over a fetched document: where the body ends, what to send to
// replace it, and what plain text it holds.

use super::docs_models::{Body, DocRange, DocsRequest, Document, Location, StructuralElement};
use crate::core::errors::WorkspaceError;

/// Index where body text starts. Index 0 is the implicit section break.
pub const BODY_START_INDEX: i64 = 1;

/// Reads the exclusive end boundary of the body from its last block.
///
/// A document without a `body` object is a structure error; a body whose last
/// block has no usable index is treated as empty.
pub fn body_end_index(document: &Document) -> Result<i64, WorkspaceError> {
    let body = document
        .body
        .as_ref()
        .ok_or_else(|| WorkspaceError::Structure("document has no body".to_string()))?;

    match body.content.last().and_then(StructuralElement::end_index) {
        Some(end) => Ok(end),
        None => {
            tracing::warn!(
                "Document {} has no trailing end index, treating body as empty",
                document.document_id.as_deref().unwrap_or("<unknown>")
            );
            Ok(BODY_START_INDEX)
        }
    }
}

/// Builds the batch that swaps the whole body for `new_text`.
///
/// The body always ends with one newline that cannot be deleted, so the last
/// deletable position is `end_index - 1`. Delete comes first so the insert
/// lands at the start of an empty body.
pub fn plan_body_replace(end_index: i64, new_text: &str) -> Vec<DocsRequest> {
    let delete_end = (end_index - 1).max(BODY_START_INDEX);
    let mut requests = Vec::with_capacity(2);

    if delete_end > BODY_START_INDEX {
        requests.push(DocsRequest::DeleteContentRange {
            range: DocRange {
                start_index: BODY_START_INDEX,
                end_index: delete_end,
            },
        });
    }

    requests.push(DocsRequest::InsertText {
        location: Location {
            index: BODY_START_INDEX,
        },
        text: new_text.to_string(),
    });

    requests
}

/// Insert position that places text just before the trailing newline.
pub fn append_index(end_index: i64) -> i64 {
    (end_index - 1).max(BODY_START_INDEX)
}

/// Concatenates every text run in the body. Table cells are tab-separated and
/// each table row ends with a newline.
pub fn extract_plain_text(document: &Document) -> String {
    let mut output = String::new();
    if let Some(body) = &document.body {
        extract_body_text(body, &mut output);
    }
    output
}

fn extract_body_text(body: &Body, output: &mut String) {
    for element in &body.content {
        extract_element_text(element, output);
    }
}

fn extract_element_text(element: &StructuralElement, output: &mut String) {
    if let Some(paragraph) = &element.paragraph {
        for para_element in &paragraph.elements {
            if let Some(content) = para_element
                .text_run
                .as_ref()
                .and_then(|run| run.content.as_ref())
            {
                output.push_str(content);
            }
        }
    }

    if let Some(table) = &element.table {
        for row in &table.table_rows {
            let cells: Vec<String> = row
                .table_cells
                .iter()
                .map(|cell| {
                    let mut cell_text = String::new();
                    for cell_element in &cell.content {
                        extract_element_text(cell_element, &mut cell_text);
                    }
                    cell_text.trim().to_string()
                })
                .collect();
            output.push_str(&cells.join("\t"));
            output.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn end_index_42_deletes_1_to_41() {
        let requests = plan_body_replace(42, "new");

        assert_eq!(
            requests,
            vec![
                DocsRequest::DeleteContentRange {
                    range: DocRange {
                        start_index: 1,
                        end_index: 41
                    }
                },
                DocsRequest::InsertText {
                    location: Location { index: 1 },
                    text: "new".into()
                },
            ]
        );
    }

    #[test]
    fn empty_body_only_inserts() {
        for end in [1, 2, 0, -5] {
            let requests = plan_body_replace(end, "x");
            assert_eq!(requests.len(), 1, "end index {}", end);
            assert!(matches!(requests[0], DocsRequest::InsertText { .. }));
        }
    }

    #[test]
    fn end_index_3_deletes_the_single_character() {
        let requests = plan_body_replace(3, "x");
        assert_eq!(
            requests[0],
            DocsRequest::DeleteContentRange {
                range: DocRange {
                    start_index: 1,
                    end_index: 2
                }
            }
        );
    }

    #[test]
    fn end_index_comes_from_last_block() {
        let document = doc(json!({
            "documentId": "d",
            "body": {"content": [
                {"endIndex": 1, "sectionBreak": {}},
                {"startIndex": 1, "endIndex": 12, "paragraph": {"elements": []}},
                {"startIndex": 12, "endIndex": 42, "paragraph": {"elements": []}}
            ]}
        }));
        assert_eq!(body_end_index(&document).unwrap(), 42);
    }

    #[test]
    fn missing_end_index_falls_back_to_empty_body() {
        let document = doc(json!({"body": {"content": [{"paragraph": {"elements": []}}]}}));
        assert_eq!(body_end_index(&document).unwrap(), 1);

        let document = doc(json!({"body": {"content": []}}));
        assert_eq!(body_end_index(&document).unwrap(), 1);

        let document = doc(json!({"body": {"content": [{"endIndex": "12"}]}}));
        assert_eq!(body_end_index(&document).unwrap(), 1);
    }

    #[test]
    fn missing_body_is_a_structure_error() {
        let document = doc(json!({"documentId": "d", "title": "No body"}));
        assert!(matches!(
            body_end_index(&document),
            Err(WorkspaceError::Structure(_))
        ));
    }

    #[test]
    fn append_goes_before_trailing_newline() {
        assert_eq!(append_index(42), 41);
        assert_eq!(append_index(1), 1);
    }

    #[test]
    fn extracts_paragraphs_and_tables() {
        let document = doc(json!({
            "body": {"content": [
                {"paragraph": {"elements": [
                    {"textRun": {"content": "Hello "}},
                    {"textRun": {"content": "world\n"}},
                    {"inlineObjectElement": {}}
                ]}},
                {"table": {"tableRows": [
                    {"tableCells": [
                        {"content": [{"paragraph": {"elements": [{"textRun": {"content": "a\n"}}]}}]},
                        {"content": [{"paragraph": {"elements": [{"textRun": {"content": "b\n"}}]}}]}
                    ]}
                ]}}
            ]}
        }));

        assert_eq!(extract_plain_text(&document), "Hello world\na\tb\n");
    }
}
