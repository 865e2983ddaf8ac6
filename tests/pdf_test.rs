//! Integration tests for the page-description (PDF) output.

use lopdf::Document;
use quire::{
    export, export_with_stats, DocumentSource, DocumentType, ExportFormat, ExportOptions, Margins,
    PageSize,
};

fn long_document(paragraphs: usize) -> DocumentSource {
    let content: String = (1..=paragraphs)
        .map(|i| {
            format!(
                "<p>Paragraph {} carries enough ordinary words to wrap across a line or two of body text.</p>",
                i
            )
        })
        .collect();
    DocumentSource::flat("Long Draft", content)
}

fn footer_options() -> ExportOptions {
    let mut options = ExportOptions::default().with_page_numbers(true);
    options.include_footer = true;
    options
}

fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|id| String::from_utf8_lossy(&doc.get_page_content(*id).unwrap()).into_owned())
        .collect()
}

#[test]
fn test_long_document_paginates_with_page_x_of_n() {
    let output = export(DocumentType::Draft, &long_document(220), &footer_options()).unwrap();
    let pages = page_texts(output.as_bytes());
    let total = pages.len();

    assert!(total > 1);
    assert!(pages[0].contains(&format!("Page 1 of {}", total)));
    assert!(pages[total - 1].contains(&format!("Page {} of {}", total, total)));
}

#[test]
fn test_every_footer_counts_up_to_the_page_total() {
    let result = export_with_stats(DocumentType::Draft, &long_document(120), &footer_options()).unwrap();
    let pages = page_texts(result.output.as_bytes());

    assert_eq!(result.stats.page_count as usize, pages.len());
    for (i, text) in pages.iter().enumerate() {
        assert!(
            text.contains(&format!("Page {} of {}", i + 1, pages.len())),
            "page {} footer is wrong",
            i + 1
        );
    }
}

#[test]
fn test_footer_text_joins_page_numbers() {
    let options = ExportOptions::default().with_footer("Confidential");
    let output = export(DocumentType::Draft, &long_document(3), &options).unwrap();
    let pages = page_texts(output.as_bytes());
    assert!(pages[0].contains("Confidential | Page 1 of 1"));
}

#[test]
fn test_no_page_numbers_no_footer() {
    let options = ExportOptions::default().with_page_numbers(false);
    let output = export(DocumentType::Draft, &long_document(3), &options).unwrap();
    let pages = page_texts(output.as_bytes());
    assert!(!pages[0].contains("Page 1 of"));
}

#[test]
fn test_page_size_sets_media_box() {
    for (size, width, height) in [(PageSize::A4, 595.28, 841.89), (PageSize::Letter, 612.0, 792.0)] {
        let options = ExportOptions::default().with_page_size(size);
        let output = export(DocumentType::Draft, &long_document(1), &options).unwrap();
        let doc = Document::load_mem(output.as_bytes()).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page
            .get(b"MediaBox")
            .or_else(|_| {
                let parent = page.get(b"Parent")?.as_reference()?;
                doc.get_dictionary(parent)?.get(b"MediaBox")
            })
            .unwrap()
            .as_array()
            .unwrap();
        let dims: Vec<f32> = media_box.iter().map(|o| o.as_float().unwrap()).collect();
        assert!((dims[2] - width).abs() < 0.01);
        assert!((dims[3] - height).abs() < 0.01);
    }
}

#[test]
fn test_wider_margins_need_more_pages() {
    let narrow = export_with_stats(
        DocumentType::Draft,
        &long_document(80),
        &ExportOptions::default().with_margins(Margins::uniform(10.0)),
    )
    .unwrap();
    let wide = export_with_stats(
        DocumentType::Draft,
        &long_document(80),
        &ExportOptions::default().with_margins(Margins::uniform(50.0)),
    )
    .unwrap();
    assert!(wide.stats.page_count > narrow.stats.page_count);
}

#[test]
fn test_escaped_text_is_drawn_verbatim() {
    let source = DocumentSource::flat("T", "<p>Fish &amp; chips (large)</p>");
    let options = ExportOptions::default().with_format(ExportFormat::Pdf);
    let output = export(DocumentType::Draft, &source, &options).unwrap();
    let doc = Document::load_mem(output.as_bytes()).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    let content = doc.get_and_decode_page_content(page_id).unwrap();

    let drawn: Vec<u8> = content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first()?.as_str().ok())
        .flat_map(|s| s.iter().copied().chain(std::iter::once(b' ')))
        .collect();
    let drawn = String::from_utf8_lossy(&drawn);
    assert!(drawn.contains("Fish"));
    assert!(drawn.contains("&"));
    assert!(drawn.contains("(large)"));
}
