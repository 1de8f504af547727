//! PDF 검색 전체 흐름 테스트 (메모리 문서 + lopdf로 만든 PDF)

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use meditech_advisor::extractor::pdf::load_pdf_from_mem;
use meditech_advisor::{DocumentMetadata, LoadedDocument, PdfSearchTool, NO_RESULTS};

fn filler(words: usize) -> String {
    vec!["lorem"; words].join(" ")
}

/// 200 단어, 원점수 5 → 관련도 5.00
fn qualifying_page() -> String {
    format!("Ventilators require calibration.\n\n{}", filler(197))
}

#[test]
fn test_end_to_end_single_matching_document() {
    let doc_a = LoadedDocument::from_pages("a.pdf", [qualifying_page()]).with_metadata(
        DocumentMetadata {
            title: Some("Ventilator Service Manual".to_string()),
            author: Some("Acme Medical".to_string()),
        },
    );
    let doc_b = LoadedDocument::from_pages("b.pdf", ["lorem ipsum dolor", "sit amet"]);

    let out = PdfSearchTool::new().search_documents("ventilator calibration", &[doc_a, doc_b]);

    assert!(out.starts_with("\n\nDocument: a.pdf"));
    assert!(out.contains("Title: Ventilator Service Manual\nAuthor: Acme Medical"));
    assert!(out.contains("Page 1 (Relevance: 5.00):\nVentilators require calibration.\n"));
    assert!(!out.contains("b.pdf"));
    assert!(!out.contains("lorem"));
}

#[test]
fn test_no_match_returns_sentinel() {
    let doc = LoadedDocument::from_pages("c.pdf", ["lorem ipsum dolor sit amet"]);
    let out = PdfSearchTool::new().search_documents("xyz_nonexistent_term", &[doc]);
    assert_eq!(out, NO_RESULTS);
}

#[test]
fn test_at_most_three_pages_per_document() {
    let pages: Vec<String> = (1..=5)
        .map(|i| format!("pump alarm test {}\n\n{}", i, filler(i * 10)))
        .collect();
    let doc = LoadedDocument::from_pages("pumps.pdf", pages);

    let out = PdfSearchTool::new().search_documents("pump alarm", &[doc]);

    assert_eq!(out.matches("(Relevance: ").count(), 3);
    // 짧은 페이지일수록 정규화 점수가 높음
    let p1 = out.find("Page 1 (").expect("page 1");
    let p2 = out.find("Page 2 (").expect("page 2");
    let p3 = out.find("Page 3 (").expect("page 3");
    assert!(p1 < p2 && p2 < p3);
    assert!(!out.contains("Page 4 ("));
}

#[test]
fn test_documents_separated() {
    let docs = vec![
        LoadedDocument::from_pages("one.pdf", ["pump manual"]),
        LoadedDocument::from_pages("two.pdf", ["pump datasheet"]),
    ];
    let out = PdfSearchTool::new().search_documents("pump", &docs);
    let separator = "=".repeat(50);
    assert_eq!(out.matches(separator.as_str()).count(), 1);
    assert!(out.find("one.pdf") < out.find(separator.as_str()));
    assert!(out.find(separator.as_str()) < out.find("two.pdf"));
}

#[test]
fn test_search_is_idempotent() {
    let make = || {
        vec![
            LoadedDocument::from_pages("a.pdf", [qualifying_page(), "CALIBRATION: yearly".to_string()]),
            LoadedDocument::from_pages("b.pdf", ["ventilator alarms\n\ncalibration drift"]),
        ]
    };
    let tool = PdfSearchTool::new();
    let first = tool.search_documents("ventilator calibration", &make());
    let second = tool.search_documents("ventilator calibration", &make());
    assert_eq!(first, second);
}

// ============================================================================
// Generated PDF
// ============================================================================

fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![0.into(), 0.into(), 612.into(), 792.into()];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    // 작성자는 UTF-16BE (BOM 포함)
    let author: Vec<u8> = [0xFE, 0xFF]
        .into_iter()
        .chain("Acme".encode_utf16().flat_map(|u| u.to_be_bytes()))
        .collect();
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Infusion Pump Guide"),
        "Author" => Object::String(author, StringFormat::Hexadecimal),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

#[test]
fn test_load_generated_pdf_metadata() {
    let bytes = build_pdf(&["Infusion pump setup", "Alarm handling"]);
    let doc = load_pdf_from_mem("guide.pdf".to_string(), &bytes).expect("load");

    assert_eq!(doc.filename, "guide.pdf");
    assert_eq!(doc.metadata.title.as_deref(), Some("Infusion Pump Guide"));
    assert_eq!(doc.metadata.author.as_deref(), Some("Acme"));
    assert!(!doc.pages.is_empty());
}

#[test]
fn test_search_reports_unreadable_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let broken = dir.path().join("broken.pdf");
    std::fs::write(&broken, b"%PDF-1.4 truncated").expect("write");

    let out = PdfSearchTool::new().search("pump", &[broken]);
    assert!(out.starts_with("\n\nError processing broken.pdf: "));
}

/// 텍스트도 MediaBox도 없는 단일 페이지 PDF
fn build_blank_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
    });
    let kids: Vec<Object> = vec![page_id.into()];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

#[test]
fn test_extraction_panic_becomes_document_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blank = dir.path().join("blank.pdf");
    std::fs::write(&blank, build_blank_pdf()).expect("write");
    let missing = dir.path().join("missing.pdf");

    let out = PdfSearchTool::new().search("pump", &[blank, missing]);

    assert!(out.contains("Error processing blank.pdf: "));
    assert!(out.contains("Error processing missing.pdf: "));
}

#[test]
fn test_missing_collected_file_reported() {
    use meditech_advisor::collector::PdfCollector;

    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("gone.pdf");
    let files = PdfCollector::with_defaults()
        .collect(&[missing], None)
        .expect("collect");

    let out = PdfSearchTool::new().search("pump", &files);
    assert!(out.starts_with("\n\nError processing gone.pdf: "));
}
