//! End-to-end catalog properties: extraction through to the finished PDF.

mod common;

use std::path::PathBuf;
use std::time::Duration;

use artcat::config::{LogoPlacement, LogoPosition, Orientation, PageFormat};
use artcat::layout::geometry::center_offset;
use artcat::layout::text::string_width_mm;
use artcat::layout::{DEMO_NOTICE, NO_TEXT_PLACEHOLDER};
use artcat::{
    build_document, extract_batch, generate_catalog, AssetOutcome, BatchError, BatchExtractor,
    CatalogError, LayoutConfig, OcrError,
};
use tempfile::TempDir;

use common::*;

const EPS: f64 = 0.05;

fn config_with_logo(path: PathBuf) -> LayoutConfig {
    LayoutConfig {
        logo: Some(LogoPlacement::at_preset(
            path,
            LogoPosition::TopLeft,
            PageFormat::A4,
            Orientation::Portrait,
            25.0,
        )),
        ..LayoutConfig::default()
    }
}

#[test]
fn test_page_count_matches_results() {
    let results: Vec<_> = (0..7)
        .map(|i| result(&format!("art-{}.png", i), "Untitled", png(8, 8)))
        .collect();

    let doc = build_document(&results, &LayoutConfig::default()).unwrap();

    assert_eq!(doc.page_count(), 7);
    assert_eq!(PdfInspector::load(&doc.bytes).page_count(), 7);
}

#[test]
fn test_pages_follow_name_order_not_completion_order() {
    // z finishes first, a last
    let engine = ScriptedEngine::new()
        .text(10, "Alpha")
        .text(20, "Mu")
        .text(30, "Zeta")
        .delay(10, Duration::from_millis(60))
        .delay(20, Duration::from_millis(30));
    let batch = BatchExtractor::new(engine.into_extractor());

    let images = vec![
        record("z.jpg", png(30, 10)),
        record("a.jpg", png(10, 10)),
        record("m.jpg", png(20, 10)),
    ];
    let doc = generate_catalog(&batch, images, &LayoutConfig::default()).unwrap();

    let names: Vec<_> = doc.pages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "m.jpg", "z.jpg"]);

    let pdf = PdfInspector::load(&doc.bytes);
    assert!(pdf.page_text(0).contains(&"Alpha".to_string()));
    assert!(pdf.page_text(1).contains(&"Mu".to_string()));
    assert!(pdf.page_text(2).contains(&"Zeta".to_string()));
}

#[test]
fn test_empty_batch_produces_no_pages() {
    let extractor = ScriptedEngine::new().into_extractor();
    let results = extract_batch(&extractor, vec![]).unwrap();
    assert!(results.is_empty());

    let doc = build_document(&results, &LayoutConfig::default()).unwrap();
    assert_eq!(doc.page_count(), 0);
    assert_eq!(PdfInspector::load(&doc.bytes).page_count(), 0);
}

#[test]
fn test_empty_text_renders_placeholder() {
    let doc = build_document(
        &[
            result("blank.png", "", png(8, 8)),
            result("named.png", "Water Lilies, 1906", png(8, 8)),
        ],
        &LayoutConfig::default(),
    )
    .unwrap();

    let pdf = PdfInspector::load(&doc.bytes);
    assert_eq!(pdf.page_text(0), vec![DEMO_NOTICE, NO_TEXT_PLACEHOLDER]);
    assert_eq!(pdf.page_text(1), vec![DEMO_NOTICE, "Water Lilies, 1906"]);
}

#[test]
fn test_unencodable_text_is_substituted() {
    let doc = build_document(
        &[result("a.png", "Café “Nuit” 星", vec![])],
        &LayoutConfig::default(),
    )
    .unwrap();

    let pdf = PdfInspector::load(&doc.bytes);
    assert_eq!(pdf.page_text(0)[1], "Café ?Nuit? ?");
}

#[test]
fn test_artwork_keeps_aspect_ratio_and_is_centered() {
    let doc = build_document(&[result("wide.png", "Wide", png(400, 200))], &LayoutConfig::default())
        .unwrap();

    let pdf = PdfInspector::load(&doc.bytes);
    let images = pdf.images(0);
    assert_eq!(images.len(), 1);

    let art = images[0];
    assert!((mm(art.width) - 120.0).abs() < EPS);
    assert!((mm(art.height) - 60.0).abs() < EPS);
    assert!((mm(art.x) - center_offset(210.0, 120.0)).abs() < EPS);
}

#[test]
fn test_artwork_sits_below_notice() {
    let doc = build_document(&[result("tall.jpg", "Tall", jpeg(100, 300))], &LayoutConfig::default())
        .unwrap();

    let pdf = PdfInspector::load(&doc.bytes);
    let art = pdf.images(0)[0];

    // no logo: notice at 20, one 6 mm line and a 2 mm gap
    let top = 297.0 - mm(art.y) - mm(art.height);
    assert!((top - 28.0).abs() < EPS);
    assert!((mm(art.height) - 360.0).abs() < EPS);
}

#[test]
fn test_text_is_centered_in_text_width() {
    let doc = build_document(&[result("a.png", "", vec![])], &LayoutConfig::default()).unwrap();

    let pdf = PdfInspector::load(&doc.bytes);
    let config = LayoutConfig::default();
    let notice = &pdf.text_runs(0)[0];

    let width = string_width_mm(config.body_font.family, config.body_font.size, DEMO_NOTICE);
    let expected = config.margins.left + center_offset(config.text_width(), width);
    assert!((mm(notice.x) - expected).abs() < EPS);
}

#[test]
fn test_layout_is_byte_identical_across_runs() {
    let dir = TempDir::new().unwrap();
    let logo = dir.path().join("logo.png");
    std::fs::write(&logo, png(12, 12)).unwrap();
    let config = config_with_logo(logo);

    let results = vec![
        result("b.png", "Second", png(40, 20)),
        result("a.jpg", "First", jpeg(20, 40)),
        result("c.png", "", vec![]),
    ];

    let first = build_document(&results, &config).unwrap();
    let second = build_document(&results, &config).unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_missing_logo_only_omits_logo() {
    let config = config_with_logo(PathBuf::from("/nonexistent/logo.png"));
    let doc = build_document(&[result("a.png", "Alpha", png(40, 20))], &config).unwrap();

    assert_eq!(doc.page_count(), 1);
    assert!(doc.pages[0].logo.is_skipped());
    assert_eq!(doc.pages[0].artwork, AssetOutcome::Drawn);

    let pdf = PdfInspector::load(&doc.bytes);
    assert_eq!(pdf.images(0).len(), 1);
    assert_eq!(pdf.page_text(0), vec![DEMO_NOTICE, "Alpha"]);

    // missing logo anchors the notice like no logo at all
    let notice = &pdf.text_runs(0)[0];
    assert!(297.0 - mm(notice.y) > 20.0 && 297.0 - mm(notice.y) < 26.0);
}

#[test]
fn test_logo_shifts_content_below_it() {
    let dir = TempDir::new().unwrap();
    let logo = dir.path().join("logo.png");
    std::fs::write(&logo, png(50, 50)).unwrap();

    let doc = build_document(
        &[result("a.png", "Alpha", png(40, 20))],
        &config_with_logo(logo),
    )
    .unwrap();

    assert_eq!(doc.pages[0].logo, AssetOutcome::Drawn);
    let pdf = PdfInspector::load(&doc.bytes);
    let images = pdf.images(0);
    assert_eq!(images.len(), 2);

    let logo = images[0];
    assert!((mm(logo.x) - 10.0).abs() < EPS);
    assert!((mm(logo.width) - 25.0).abs() < EPS);

    // notice at 10 + 25 + 2, artwork after one line and the gap
    let art = images[1];
    let art_top = 297.0 - mm(art.y) - mm(art.height);
    assert!((art_top - 45.0).abs() < EPS);
}

#[test]
fn test_one_failure_fails_batch_of_five() {
    let engine = ScriptedEngine::new()
        .text(1, "one")
        .text(2, "two")
        .fail(3)
        .text(4, "four")
        .text(5, "five");
    let batch = BatchExtractor::new(engine.into_extractor());

    let images: Vec<_> = (1..=5)
        .map(|w| record(&format!("{}.png", w), png(w, 4)))
        .collect();

    match batch.extract_batch(images.clone()) {
        Err(BatchError::Extraction { name, source }) => {
            assert_eq!(name, "3.png");
            assert!(matches!(source, OcrError::Engine(_)));
        }
        other => panic!("Expected extraction failure, got {:?}", other.map(|r| r.len())),
    }

    let outcome = generate_catalog(&batch, images, &LayoutConfig::default());
    assert!(matches!(outcome, Err(CatalogError::Extraction(_))));
}

#[test]
fn test_document_metadata() {
    let doc = build_document(&[result("a.png", "Alpha", vec![])], &LayoutConfig::default()).unwrap();
    let pdf = PdfInspector::load(&doc.bytes);

    assert_eq!(pdf.info("Title").as_deref(), Some("Artwork Catalog"));
    let producer = pdf.info("Producer").unwrap();
    assert!(producer.starts_with("artcat "));
}
