use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a config into `dir` pointing the database and models inside it.
fn write_config(dir: &Path) -> PathBuf {
    let config_path = dir.join("config.json");
    let config = serde_json::json!({
        "models": { "model_dir": dir.join("models") },
        "storage": { "database_path": dir.join("invoice_data.db") }
    });
    fs::write(&config_path, config.to_string()).unwrap();
    config_path
}

/// Write a one-page PDF whose text is `text`.
fn write_pdf(path: &Path, text: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });

    let kids: Vec<Object> = vec![page_id.into()];
    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => 1_i64,
        "Kids" => kids,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn invscan(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("invscan").unwrap();
    cmd.arg("-c").arg(config);
    cmd
}

#[test]
fn test_process_pdf_saves_record() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("invoice.pdf");
    write_pdf(
        &input,
        "Name: Jane Doe Invoice Number: INV-042 Due Date: 01/02/2024 Description: widgets, bolts",
    );

    invscan(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted Invoice Data:"))
        .stdout(predicate::str::contains("\"name\": \"Jane Doe Invoice Number\""))
        .stdout(predicate::str::contains("\"invoice_number\": \"INV-042\""))
        .stdout(predicate::str::contains("\"due_date\": \"2024-02-01\""))
        .stdout(predicate::str::contains("\"description\": \"widgets, bolts\""))
        .stdout(predicate::str::contains("Data saved to database."));

    let output = invscan(&config)
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stored: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        stored,
        serde_json::json!([{
            "name": "Jane Doe Invoice Number",
            "invoice_number": "INV-042",
            "due_date": "2024-02-01",
            "description": "widgets, bolts"
        }])
    );
}

#[test]
fn test_process_unsupported_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("notes.txt");
    fs::write(&input, "Invoice Number: INV-1").unwrap();

    invscan(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Unsupported file format"));

    invscan(&config)
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_process_unreadable_image_saves_nothing() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("scan.png");
    fs::write(&input, b"not a png").unwrap();

    invscan(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("No text extracted"));

    invscan(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No invoices stored."));
}

#[test]
fn test_list_csv_header_on_empty_database() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let db = dir.path().join("other.db");

    invscan(&config)
        .args(["list", "--format", "csv", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "name,invoice_number,due_date,description",
        ));

    assert!(db.exists());
}

#[test]
fn test_batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let pattern = format!("{}/*.pdf", dir.path().display());

    invscan(&config)
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No supported files found"));
}

#[test]
fn test_config_path_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("missing.json");

    invscan(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing.json"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("invscan.json");

    invscan(&config)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(config.exists());

    invscan(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    invscan(&config)
        .args(["config", "set", "storage.database_path", "ledger.db"])
        .assert()
        .success();

    invscan(&config)
        .args(["config", "get", "storage.database_path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ledger.db\""));

    invscan(&config)
        .args(["config", "get", "storage.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
