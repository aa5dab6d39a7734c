//! End-to-end tests: build with the facade, render or save, read back.

use super::*;
use crate::common::xml::{XmlElement, parse_xml};
use crate::common::{Error, Length};
use crate::docx::{Document, InlinePicture, Orientation, RunContent, SectionStart, StyleType, Table};
use image::RgbImage;
use proptest::prelude::*;
use std::cell::Cell;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    RgbImage::new(width, height).save(dir.join(name)).unwrap();
}

fn options_with_images(dir: &TempDir) -> DocxOptions {
    let config = FacadeConfig {
        image_root: dir.path().to_path_buf(),
        ..FacadeConfig::default()
    };
    DocxOptions::new().config(config)
}

fn read_document_xml(path: &Path) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

/// Body paragraphs of a saved document.
fn body_paragraphs(xml: &str) -> Vec<XmlElement> {
    let root = parse_xml(xml).unwrap();
    root.child("w:body")
        .unwrap()
        .children_named("w:p")
        .cloned()
        .collect()
}

fn paragraph_style(p: &XmlElement) -> Option<String> {
    p.child("w:pPr")?.child("w:pStyle")?.attr("w:val")
}

fn pictures(doc: &Document) -> Vec<InlinePicture> {
    doc.paragraphs()
        .flat_map(|p| p.runs())
        .flat_map(|r| r.content())
        .filter_map(|c| match c {
            RunContent::Drawing(picture) => Some(picture.clone()),
            _ => None,
        })
        .collect()
}

fn texts(doc: &Document) -> Vec<String> {
    doc.paragraphs().map(|p| p.text()).collect()
}

#[test]
fn test_title_then_mixed_paragraph() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.docx");

    let mut docx = Docx::default();
    docx.title("Intro");
    docx.paragraph("Hello").bold("World");
    let written = docx.save(Some(target.as_path())).unwrap();
    assert_eq!(written, target);

    let paragraphs = body_paragraphs(&read_document_xml(&target));
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraph_style(&paragraphs[0]).as_deref(), Some("Title"));
    assert_eq!(paragraphs[0].text(), "Intro");

    let runs: Vec<_> = paragraphs[1].children_named("w:r").collect();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text(), "Hello");
    assert!(runs[0].child("w:rPr").is_none());
    assert_eq!(runs[1].text(), "World");
    assert!(runs[1].child("w:rPr").unwrap().child("w:b").is_some());
}

#[test]
fn test_bold_paragraph_has_empty_lead() {
    let mut docx = Docx::default();
    docx.bold("Warning").normal(": read first");
    let doc = docx.render().unwrap();
    let paragraph = doc.paragraphs().next().unwrap();
    assert_eq!(paragraph.runs().len(), 2);
    assert_eq!(paragraph.runs()[0].is_bold(), Some(true));
    assert_eq!(paragraph.text(), "Warning: read first");
}

#[test]
fn test_headings_by_level() {
    let mut docx = Docx::default();
    docx.section_title("One");
    docx.subsection_title("Two");
    docx.subsubsection_title("Three");
    docx.heading("Styled", 1).set_style("Caption");
    let doc = docx.render().unwrap();
    let styles: Vec<_> = doc.paragraphs().map(|p| p.style_id()).collect();
    assert_eq!(
        styles,
        [Some("Heading1"), Some("Heading2"), Some("Heading3"), Some("Caption")]
    );
}

#[test]
fn test_landscape_picture_bounded_by_ceiling() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "wide.png", 300, 200);

    let mut docx = Docx::new(options_with_images(&dir));
    docx.section_break(SectionStart::NewPage, Orientation::Landscape);
    docx.picture("wide.png");
    let doc = docx.render().unwrap();

    // 25.5cm / 1.5 = 17cm exceeds 13cm: height binds, width follows the ratio
    let picture = &pictures(&doc)[0];
    assert_eq!(picture.height(), Length::cm(13.0));
    assert_eq!(picture.width(), Length::cm(19.5));
}

#[test]
fn test_landscape_picture_within_ceiling() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "wide.png", 200, 100);

    let mut docx = Docx::new(options_with_images(&dir));
    docx.section_break(SectionStart::NewPage, Orientation::Landscape);
    docx.picture("wide.png").set_width(Length::cm(4.0));
    let doc = docx.render().unwrap();

    let picture = &pictures(&doc)[0];
    assert_eq!(picture.width(), Length::cm(25.5));
    assert_eq!(picture.height(), Length::cm(12.75));
}

#[test]
fn test_portrait_picture_uses_requested_size() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "square.png", 100, 100);

    let mut docx = Docx::new(options_with_images(&dir));
    docx.picture("square.png")
        .set_width(Length::cm(8.0))
        .set_height(Length::cm(5.0));
    docx.picture("square.png");
    let doc = docx.render().unwrap();

    let pictures = pictures(&doc);
    assert_eq!(
        (pictures[0].width(), pictures[0].height()),
        (Length::cm(8.0), Length::cm(5.0))
    );
    assert_eq!(
        (pictures[1].width(), pictures[1].height()),
        (Length::cm(17.8), Length::cm(17.8))
    );
}

#[test]
fn test_missing_image_aborts_save() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.docx");

    let mut docx = Docx::new(options_with_images(&dir));
    docx.paragraph("before");
    docx.picture("absent.png");
    let err = docx.save(Some(target.as_path())).unwrap_err();
    assert!(matches!(err, Error::MissingImage(path) if path.ends_with("absent.png")));
    assert!(!target.exists());
}

#[test]
fn test_unreadable_image() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"not a png at all").unwrap();

    let mut docx = Docx::new(options_with_images(&dir));
    docx.picture("broken.png");
    assert!(matches!(
        docx.render(),
        Err(Error::UnreadableImage { path, .. }) if path.ends_with("broken.png")
    ));
}

#[test]
fn test_line_breaks_and_tabs_in_paragraph_text() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("breaks.docx");

    let mut docx = Docx::default();
    docx.paragraph("line1\nline2\ttab");
    docx.save(Some(target.as_path())).unwrap();

    let xml = read_document_xml(&target);
    assert!(xml.contains(
        r#"<w:t xml:space="preserve">line1</w:t><w:br/><w:t xml:space="preserve">line2</w:t><w:tab/><w:t xml:space="preserve">tab</w:t>"#
    ));
    assert!(!xml.contains("line1\n"));
}

#[test]
fn test_control_character_fails_save() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("bad.docx");

    let mut docx = Docx::default();
    docx.paragraph("ok");
    docx.paragraph("bad\u{1}char");
    let err = docx.save(Some(target.as_path())).unwrap_err();
    assert!(matches!(err, Error::Xml(message) if message.contains("U+0001")));
    assert!(!target.exists());
}

#[test]
fn test_section_break_back_to_portrait() {
    let mut docx = Docx::default();
    docx.section_break(SectionStart::NewPage, Orientation::Landscape);
    docx.section_break(SectionStart::Continuous, Orientation::Portrait);
    let doc = docx.render().unwrap();

    let section = doc.last_section();
    assert_eq!(section.orientation(), Orientation::Portrait);
    assert_eq!(section.start_type(), SectionStart::Continuous);
    assert_eq!(section.page_width(), Some(Length::inches(8.5)));
    assert_eq!(section.page_height(), Some(Length::inches(11.0)));

    let closed: Vec<_> = doc.paragraphs().filter_map(|p| p.section.as_ref()).collect();
    assert_eq!(closed.len(), 2);
    assert_eq!(closed[1].orientation(), Orientation::Landscape);
    assert_eq!(closed[1].page_width(), Some(Length::inches(11.0)));
}

#[test]
fn test_page_break_and_toc_in_output() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("toc.docx");

    let mut docx = Docx::default();
    docx.toc();
    docx.page_break();
    docx.section_title("Chapter");
    docx.save(Some(target.as_path())).unwrap();

    let xml = read_document_xml(&target);
    assert!(xml.contains(
        r#"<w:instrText xml:space="preserve">TOC \o &quot;1-3&quot; \h \z \u</w:instrText>"#
    ));
    let paragraphs = body_paragraphs(&xml);
    assert_eq!(paragraphs[0].text(), "Contents");
    assert_eq!(paragraph_style(&paragraphs[0]).as_deref(), Some("TOCHeading"));
    assert!(paragraphs[1].text().ends_with("Right-click to update field."));
    assert!(paragraphs[2].children_named("w:r").next().unwrap().child("w:br").is_some());
    assert_eq!(paragraphs[3].text(), "Chapter");
}

#[test]
fn test_list_of_figures() {
    let mut docx = Docx::default();
    docx.list_of_figures();
    docx.toc_with(None, "TOC \\o \"1-1\"");
    let doc = docx.render().unwrap();

    let instructions: Vec<_> = doc
        .paragraphs()
        .flat_map(|p| p.runs())
        .flat_map(|r| r.content())
        .filter_map(|c| match c {
            RunContent::InstrText(i) => Some(i.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(instructions, [r#"TOC \h \z \c "Figure""#, r#"TOC \o "1-1""#]);
    assert_eq!(texts(&doc)[0], "Table of Figures");
}

#[test]
fn test_french_caption() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "plan.png", 40, 30);

    let config = FacadeConfig {
        image_root: dir.path().to_path_buf(),
        ..FacadeConfig::french()
    };
    let options = DocxOptions::new().config(config).pre_hook(|doc| {
        let styles = doc.styles_mut();
        for name in ["Chapitre", "Légende Figure", "Légende Tableau"] {
            styles.ensure_style(name, StyleType::Paragraph);
        }
        Ok(())
    });
    let mut docx = Docx::new(options);
    docx.title("Présentation");
    docx.picture("plan.png").set_caption("Caption").set_key("3");
    docx.table(1, 1, |_: &mut Table| Ok(())).set_caption("Coûts");
    let doc = docx.render().unwrap();

    let paragraphs: Vec<_> = doc.paragraphs().collect();
    assert_eq!(paragraphs[0].style_id(), Some("Chapitre"));
    let figure = paragraphs
        .iter()
        .find(|p| p.style_id() == Some("LégendeFigure"))
        .unwrap();
    assert_eq!(figure.text(), "Figure 3 : Caption");
    let table = paragraphs
        .iter()
        .find(|p| p.style_id() == Some("LégendeTableau"))
        .unwrap();
    assert_eq!(table.text(), "Tableau ? : Coûts");
}

#[test]
fn test_french_styles_missing_from_blank_document() {
    let mut docx = Docx::new(DocxOptions::new().config(FacadeConfig::french()));
    docx.title("Présentation");
    assert!(matches!(docx.render(), Err(Error::MissingStyle(s)) if s == "Chapitre"));
}

#[test]
fn test_auto_numbered_captions() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 10, 10);

    let mut config = FacadeConfig {
        image_root: dir.path().to_path_buf(),
        ..FacadeConfig::default()
    };
    config.captions.auto_number = true;
    let mut docx = Docx::new(DocxOptions::new().config(config));
    docx.picture("a.png").set_caption("first");
    docx.picture("a.png");
    docx.table(1, 1, |_: &mut Table| Ok(())).set_caption("totals");
    docx.picture("a.png").set_caption("fixed").set_key("A");
    // empty caption: no paragraph, no number consumed
    docx.picture("a.png").set_caption("");
    docx.picture("a.png").set_caption("second");
    let doc = docx.render().unwrap();

    let captions: Vec<_> = texts(&doc).into_iter().filter(|t| !t.is_empty()).collect();
    assert_eq!(
        captions,
        ["Figure 1: first", "Table 1: totals", "Figure A: fixed", "Figure 2: second"]
    );
}

#[test]
fn test_reference_spans() {
    let options = DocxOptions::new().resolver(|key| format!("<{}>", key));
    let mut docx = Docx::new(options);
    docx.paragraph("See ").reference("intro").normal(".");
    let doc = docx.render().unwrap();
    assert_eq!(texts(&doc), ["See <intro>."]);

    let mut docx = Docx::default();
    docx.paragraph("See ").reference("intro").normal(".");
    let doc = docx.render().unwrap();
    assert_eq!(texts(&doc), ["See ."]);
}

#[test]
fn test_pre_hook_runs_before_baseline() {
    let options = DocxOptions::new().pre_hook(|doc| {
        doc.styles_mut()
            .require_mut("Caption")?
            .set_space_after(Length::pt(30.0))
            .set_font_name("Georgia");
        Ok(())
    });
    let doc = Docx::new(options).render().unwrap();
    let caption = doc.styles().get("Caption").unwrap();
    assert_eq!(caption.space_after(), Some(Length::pt(12.0)));
    assert_eq!(caption.font_name().as_deref(), Some("Georgia"));
}

#[test]
fn test_pre_hook_error_aborts() {
    let options = DocxOptions::new().pre_hook(|_| Err(Error::Config("stop".to_string())));
    let mut docx = Docx::new(options);
    docx.paragraph("never");
    assert!(matches!(docx.render(), Err(Error::Config(_))));
}

#[test]
fn test_save_without_target_or_template() {
    let called = Rc::new(Cell::new(false));
    let flag = Rc::clone(&called);
    let options = DocxOptions::new().pre_hook(move |_| {
        flag.set(true);
        Ok(())
    });
    let mut docx = Docx::new(options);
    docx.paragraph("text");
    assert!(matches!(docx.save(None), Err(Error::NoTarget)));
    assert!(!called.get());
}

#[test]
fn test_save_back_to_template() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("report.docx");

    let mut first = Docx::default();
    first.title("Report");
    first.paragraph("existing");
    first.save(Some(template.as_path())).unwrap();

    let mut second = Docx::new(DocxOptions::new().template(&template));
    second.paragraph("appended");
    assert_eq!(second.save(None).unwrap(), template);

    let paragraphs = body_paragraphs(&read_document_xml(&template));
    let texts: Vec<_> = paragraphs.iter().map(|p| p.text()).collect();
    assert_eq!(texts, ["Report", "existing", "appended"]);
}

#[test]
fn test_missing_template() {
    let dir = tempfile::tempdir().unwrap();
    let docx = Docx::new(DocxOptions::new().template(dir.path().join("nope.docx")));
    assert!(matches!(docx.render(), Err(Error::Io(_))));
}

#[test]
fn test_builder_calls_leave_earlier_entities_alone() {
    let mut docx = Docx::default();
    docx.paragraph("first").bold("b");
    let snapshot = match &docx.entities()[0] {
        Entity::Paragraph(p) => p.clone(),
        _ => unreachable!(),
    };

    docx.paragraph("second").italic("i");
    docx.title("t");
    docx.page_break();
    docx.picture("x.png").set_caption("c");

    assert_eq!(docx.entities().len(), 5);
    assert!(matches!(&docx.entities()[0], Entity::Paragraph(p) if *p == snapshot));
}

#[derive(Debug, Clone)]
enum Op {
    Title(String),
    Paragraph(String),
    PageBreak,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(Op::Title),
        "[a-z ]{0,12}".prop_map(Op::Paragraph),
        Just(Op::PageBreak),
    ]
}

proptest! {
    #[test]
    fn prop_render_order_is_append_order(ops in proptest::collection::vec(op(), 0..20)) {
        let mut docx = Docx::default();
        for op in &ops {
            match op {
                Op::Title(text) => {
                    docx.section_title(text.as_str());
                },
                Op::Paragraph(text) => {
                    docx.paragraph(text.as_str());
                },
                Op::PageBreak => docx.page_break(),
            }
        }
        let doc = docx.render().unwrap();

        let expected: Vec<String> = ops
            .iter()
            .map(|op| match op {
                Op::Title(text) | Op::Paragraph(text) => text.clone(),
                Op::PageBreak => String::new(),
            })
            .collect();
        prop_assert_eq!(texts(&doc), expected);
    }
}
