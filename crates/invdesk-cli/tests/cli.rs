use std::fs;
use std::path::Path;

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;

/// Single-page PDF with one text line per entry.
fn write_invoice_pdf(path: &Path, lines: &[&str]) {
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

    let mut operations = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        operations.push(Operation::new("Td", vec![50.into(), (780 - 20 * i as i64).into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
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

/// Command with an isolated default config.
fn invdesk(config_dir: &Path) -> Command {
    let config = config_dir.join("config.json");
    if !config.exists() {
        fs::write(&config, "{}").unwrap();
    }
    let mut cmd = Command::cargo_bin("invdesk").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn test_process_invoice() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("inv.pdf");
    write_invoice_pdf(
        &pdf,
        &[
            "Expeditors International",
            "Invoice Number:4711",
            "Invoice Date:Feb 01, 2024",
            "Invoice Total:EUR 1,234.56",
            "Booking Number:123456/900001",
        ],
    );

    invdesk(dir.path())
        .args(["process", "--format", "json"])
        .arg(&pdf)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"number\": 4711"))
        .stdout(predicate::str::contains("\"status\": \"success\""))
        .stdout(predicate::str::contains("\"timestamp\": \"2024-02-01\""));
}

#[test]
fn test_scan_flags_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("inbox");
    fs::create_dir(&folder).unwrap();
    fs::write(folder.join("broken.pdf"), b"not a pdf").unwrap();
    fs::write(folder.join("notes.txt"), b"ignored").unwrap();

    invdesk(dir.path())
        .args(["scan", "--quiet", "--format", "csv"])
        .arg(&folder)
        .assert()
        .success()
        .stdout(predicate::str::contains("broken.pdf,Unknown,error"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn test_scan_missing_folder() {
    let dir = tempfile::tempdir().unwrap();
    invdesk(dir.path())
        .args(["scan", "/no/such/folder"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Folder not found"));
}

#[test]
fn test_mark_moves_file() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("a.pdf");
    fs::write(&pdf, b"garbage").unwrap();

    invdesk(dir.path())
        .args(["mark", "--as", "missing"])
        .arg(&pdf)
        .assert()
        .success()
        .stdout(predicate::str::contains("missing_wo"));

    assert!(!pdf.exists());
    assert!(dir.path().join("wo").join("a.pdf").exists());
    assert!(dir.path().join("err").is_dir());
    assert!(dir.path().join("uploaded").is_dir());
}

#[test]
fn test_register_requires_work_order() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("nowo.pdf");
    write_invoice_pdf(
        &pdf,
        &[
            "Expeditors International",
            "Invoice Number:12",
            "Invoice Date:Mar 05, 2024",
            "Invoice Total:EUR 10.00",
        ],
    );

    invdesk(dir.path())
        .arg("register")
        .arg(&pdf)
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no work order"));
}

#[test]
fn test_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    invdesk(dir.path())
        .args(["config", "set", "folders.error", "errors"])
        .assert()
        .success();

    invdesk(dir.path())
        .args(["config", "get", "folders.error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"errors\""));

    invdesk(dir.path())
        .args(["config", "get", "folders.trash"])
        .assert()
        .failure();
}

#[test]
fn test_session_quits() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.pdf"), b"garbage").unwrap();

    invdesk(dir.path())
        .arg("session")
        .arg(dir.path())
        .write_stdin("select a.pdf\nerror\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("with 1 invoices"));

    assert!(dir.path().join("err").join("a.pdf").exists());
}
