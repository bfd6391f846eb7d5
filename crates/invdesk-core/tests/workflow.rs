use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;

use invdesk_core::{Controller, InvdeskConfig, KeystrokeAutomator, LogSink, Status};

fn write_pdf(path: &Path, lines: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut operations = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        operations.push(Operation::new("Td", vec![40.into(), (800 - 18 * i as i64).into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("ET", vec![]));
    }
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        Content { operations }.encode().unwrap(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn test_folder_workflow() {
    let dir = tempfile::tempdir().unwrap();
    write_pdf(
        &dir.path().join("ready.pdf"),
        &[
            "Expeditors International",
            "Invoice Number:5001",
            "Invoice Date:Jan 15, 2024",
            "Invoice Total:EUR 2,500.00",
            "Booking Number:900123/456",
        ],
    );
    write_pdf(
        &dir.path().join("other.pdf"),
        &["Someone Else Ltd", "Invoice Number:77"],
    );
    fs::write(dir.path().join("broken.pdf"), b"%PDF-1.4 truncated").unwrap();

    let mut controller = Controller::new(&InvdeskConfig::default(), KeystrokeAutomator::new(LogSink));
    assert_eq!(controller.open_folder(dir.path()).unwrap(), 3);

    let ready = controller.invoices().get("ready.pdf").unwrap().clone();
    assert_eq!(ready.status, Status::Success);
    assert_eq!(ready.invoice_type, "EXP");
    assert_eq!(ready.number, 5001);
    assert_eq!(ready.work_order.as_deref(), Some("900123"));
    assert_eq!(ready.amount_display(), "2500,00");

    assert_eq!(controller.invoices().get("other.pdf").unwrap().status, Status::Error);
    assert_eq!(controller.invoices().get("broken.pdf").unwrap().status, Status::Error);

    controller.register("ready.pdf").unwrap();
    assert_eq!(controller.invoices().get("ready.pdf").unwrap().status, Status::Done);

    controller.upload("ready.pdf").unwrap();
    let uploaded = controller.invoices().get("ready.pdf").unwrap();
    assert_eq!(uploaded.status, Status::Uploaded);
    assert_eq!(uploaded.link, dir.path().join("uploaded").join("ready.pdf"));
    assert!(uploaded.link.exists());

    controller.mark_error("broken.pdf").unwrap();
    assert!(dir.path().join("err").join("broken.pdf").exists());

    // moved files leave the working folder
    assert_eq!(controller.refresh().unwrap(), 1);
}
