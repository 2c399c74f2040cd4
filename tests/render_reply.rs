//! Formatting pass over a realistic annotated reply, through the public API.

use askdocs::assistants::messages::{Annotation, FileCitation, Text};
use askdocs::citations::{cited_file_ids, render, CitationTable};

fn annotation(value: &str, span: &str, file_id: &str) -> Annotation {
    let start = value.find(span).unwrap();
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

#[test]
fn rewrites_markers_and_appends_references() {
    let value = "Revenue grew 12% year over year【4:0†annual_report.pdf】, driven by \
                 subscriptions【4:1†annual_report.pdf】 and hardware【7:0†q4_update.pdf】.";
    let annotations = vec![
        annotation(value, "【4:0†annual_report.pdf】", "file-annual"),
        annotation(value, "【4:1†annual_report.pdf】", "file-annual"),
        annotation(value, "【7:0†q4_update.pdf】", "file-q4"),
    ];
    let text = Text {
        value: value.to_string(),
        annotations,
    };

    let table = CitationTable::from_pairs(cited_file_ids(&text.annotations).into_iter().map(
        |file_id| {
            let filename = match file_id.as_str() {
                "file-annual" => "annual_report.pdf",
                _ => "q4_update.pdf",
            };
            (file_id, filename.to_string())
        },
    ));

    let rendered = render(&text, &table);
    assert_eq!(
        rendered,
        "Revenue grew 12% year over year[0], driven by subscriptions[0] and hardware[1].\
         \n\nReferences:\n• [0] annual_report.pdf\n• [1] q4_update.pdf\n"
    );
}

#[test]
fn footer_indices_cover_zero_to_n_for_any_citation_sequence() {
    // Sources cited in a scrambled, repetitive order still index 0..N by
    // first appearance.
    let order = ["c", "a", "c", "b", "a", "d", "b", "c"];
    let mut value = String::new();
    for (position, source) in order.iter().enumerate() {
        value.push_str(&format!("claim {position}【{position}†{source}】 "));
    }
    let annotations: Vec<Annotation> = order
        .iter()
        .enumerate()
        .map(|(position, source)| {
            annotation(
                &value,
                &format!("【{position}†{source}】"),
                &format!("file-{source}"),
            )
        })
        .collect();

    let ids = cited_file_ids(&annotations);
    assert_eq!(ids, vec!["file-c", "file-a", "file-b", "file-d"]);

    let text = Text {
        value: value.clone(),
        annotations,
    };
    let table = CitationTable::from_pairs(
        ids.iter().map(|id| (id.clone(), format!("{id}.txt"))),
    );
    let rendered = render(&text, &table);

    let footer: Vec<&str> = rendered
        .lines()
        .filter(|line| line.starts_with('•'))
        .collect();
    assert_eq!(footer.len(), 4);
    for (index, line) in footer.iter().enumerate() {
        assert!(
            line.starts_with(&format!("• [{index}] ")),
            "footer out of order: {line}"
        );
    }
}
