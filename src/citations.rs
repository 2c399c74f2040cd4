//! Rewrites a reply's inline citation annotations into numbered `[n]`
//! markers and a deduplicated references footer.

use crate::assistants::messages::{Annotation, Text};
use crate::client::ApiClient;
use crate::ApiResult;

/// One cited source: a stored file and its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationEntry {
    pub file_id: String,
    pub filename: String,
}

/// Distinct cited sources for one reply. The position of an entry is its
/// citation index, so insertion order is preserved by construction.
#[derive(Debug, Clone, Default)]
pub struct CitationTable {
    entries: Vec<CitationEntry>,
}

impl CitationTable {
    /// Builds the table from `(file_id, filename)` pairs, keeping the first
    /// occurrence of each file id.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut table = Self::default();
        for (file_id, filename) in pairs {
            if table.index_of(&file_id).is_none() {
                table.entries.push(CitationEntry { file_id, filename });
            }
        }
        table
    }

    pub fn index_of(&self, file_id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.file_id == file_id)
    }

    pub fn entries(&self) -> &[CitationEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File ids cited by `annotations`, deduplicated, in order of first
/// appearance.
pub fn cited_file_ids(annotations: &[Annotation]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for annotation in annotations {
        if let Some(citation) = &annotation.file_citation {
            if !ids.iter().any(|id| id == &citation.file_id) {
                ids.push(citation.file_id.clone());
            }
        }
    }
    ids
}

/// Replaces each annotated span with its `[index]` marker and appends the
/// references footer.
///
/// Spans are rewritten by their byte offsets and the string is rebuilt in one
/// pass. An annotation is skipped when its offsets are out of range,
/// inverted, off a char boundary, or overlap a span already claimed by an
/// earlier annotation; the first annotation to claim a span wins.
pub fn render(text: &Text, table: &CitationTable) -> String {
    let value = text.value.as_str();

    let mut spans: Vec<(usize, usize, usize)> = Vec::new();
    for annotation in &text.annotations {
        let Some(citation) = &annotation.file_citation else {
            continue;
        };
        let Some(index) = table.index_of(&citation.file_id) else {
            continue;
        };
        let (start, end) = (
            annotation.start_index as usize,
            annotation.end_index as usize,
        );
        if start >= end || end > value.len() {
            continue;
        }
        if !value.is_char_boundary(start) || !value.is_char_boundary(end) {
            continue;
        }
        if spans.iter().any(|&(s, e, _)| start < e && s < end) {
            continue;
        }
        spans.push((start, end, index));
    }
    spans.sort_unstable_by_key(|&(start, _, _)| start);

    let mut rendered = String::with_capacity(value.len());
    let mut cursor = 0;
    for (start, end, index) in spans {
        rendered.push_str(&value[cursor..start]);
        rendered.push_str(&format!("[{index}]"));
        cursor = end;
    }
    rendered.push_str(&value[cursor..]);

    if !table.is_empty() {
        rendered.push_str("\n\nReferences:\n");
        for (index, entry) in table.entries().iter().enumerate() {
            rendered.push_str(&format!("• [{index}] {}\n", entry.filename));
        }
    }
    rendered
}

impl ApiClient {
    /// Resolves display names for every distinct source cited by `text`, one
    /// lookup per source, and returns the rewritten reply.
    pub async fn render_citations(&self, text: &Text) -> ApiResult<String> {
        let mut pairs = Vec::new();
        for file_id in cited_file_ids(&text.annotations) {
            let file = self.get_file(&file_id).await?;
            pairs.push((file_id, file.filename));
        }
        Ok(render(text, &CitationTable::from_pairs(pairs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistants::messages::FileCitation;

    fn annotation(value: &str, span: &str, occurrence: usize, file_id: &str) -> Annotation {
        let start = value
            .match_indices(span)
            .nth(occurrence)
            .map(|(index, _)| index)
            .unwrap();
        Annotation {
            kind: "file_citation".to_string(),
            text: span.to_string(),
            start_index: start as u32,
            end_index: (start + span.len()) as u32,
            file_citation: Some(FileCitation {
                file_id: file_id.to_string(),
            }),
        }
    }

    fn table(pairs: &[(&str, &str)]) -> CitationTable {
        CitationTable::from_pairs(
            pairs
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string())),
        )
    }

    #[test]
    fn indices_follow_first_appearance_order() {
        let value = "Alpha【0†a】 beta【1†b】 alpha again【2†a】.";
        let annotations = vec![
            annotation(value, "【0†a】", 0, "file-a"),
            annotation(value, "【1†b】", 0, "file-b"),
            annotation(value, "【2†a】", 0, "file-a"),
        ];
        assert_eq!(cited_file_ids(&annotations), vec!["file-a", "file-b"]);

        let text = Text {
            value: value.to_string(),
            annotations,
        };
        let rendered = render(&text, &table(&[("file-a", "a.pdf"), ("file-b", "b.pdf")]));
        assert_eq!(
            rendered,
            "Alpha[0] beta[1] alpha again[0].\n\nReferences:\n• [0] a.pdf\n• [1] b.pdf\n"
        );
    }

    #[test]
    fn footer_lists_each_source_exactly_once() {
        let value = "One【a】 two【b】 three【c】 one again【a2】.";
        let annotations = vec![
            annotation(value, "【a】", 0, "file-1"),
            annotation(value, "【b】", 0, "file-2"),
            annotation(value, "【c】", 0, "file-3"),
            annotation(value, "【a2】", 0, "file-1"),
        ];
        let text = Text {
            value: value.to_string(),
            annotations,
        };
        let rendered = render(
            &text,
            &table(&[
                ("file-1", "one.md"),
                ("file-2", "two.md"),
                ("file-3", "three.md"),
            ]),
        );

        let footer_lines: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with('•'))
            .collect();
        assert_eq!(
            footer_lines,
            vec!["• [0] one.md", "• [1] two.md", "• [2] three.md"]
        );
        assert_eq!(rendered.matches("one.md").count(), 1);
    }

    #[test]
    fn re_citing_a_source_reuses_its_index() {
        let duplicated = vec![
            ("file-a".to_string(), "a.pdf".to_string()),
            ("file-a".to_string(), "a.pdf".to_string()),
        ];
        let table = CitationTable::from_pairs(duplicated);
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.index_of("file-a"), Some(0));
    }

    #[test]
    fn no_annotations_leaves_text_unchanged() {
        let text = Text {
            value: "No citations here.".to_string(),
            annotations: vec![],
        };
        assert_eq!(render(&text, &CitationTable::default()), "No citations here.");
    }

    #[test]
    fn invalid_offsets_leave_the_body_untouched() {
        let value = "Short body.";
        let mut bad = annotation(value, "body", 0, "file-a");
        bad.end_index = 100;
        let text = Text {
            value: value.to_string(),
            annotations: vec![bad],
        };
        let rendered = render(&text, &table(&[("file-a", "a.pdf")]));
        assert!(rendered.starts_with("Short body."));
        assert!(rendered.contains("• [0] a.pdf"));
    }

    #[test]
    fn duplicate_spans_are_replaced_once_first_wins() {
        let value = "Claim【x】 end.";
        let first = annotation(value, "【x】", 0, "file-a");
        let second = annotation(value, "【x】", 0, "file-b");
        let text = Text {
            value: value.to_string(),
            annotations: vec![first, second],
        };
        let rendered = render(&text, &table(&[("file-a", "a.pdf"), ("file-b", "b.pdf")]));
        assert!(rendered.starts_with("Claim[0] end."));
        assert_eq!(rendered.matches("[0]").count(), 2); // marker + footer line
        assert_eq!(rendered.matches("[1]").count(), 1); // footer line only
    }
}
