//! Integration tests for the `extract` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("extract").unwrap();
    cmd.env_remove("EXTRACT_START_PAGE")
        .env_remove("EXTRACT_TEMPLATE")
        .env_remove("RUST_LOG");
    cmd
}

/// Create a PDF with one page per entry; every string becomes its own text object.
fn pdf_with_pages(pages: &[&[&str]]) -> Vec<u8> {
    let contents: Vec<String> = pages
        .iter()
        .map(|lines| {
            lines
                .iter()
                .enumerate()
                .map(|(idx, line)| {
                    let y = 720 - (idx as i64) * 14;
                    format!("BT /F1 10 Tf 36 {y} Td ({line}) Tj ET\n")
                })
                .collect()
        })
        .collect();
    pdf_with_contents(&contents)
}

/// Create a PDF with one page per raw content stream.
fn pdf_with_contents(contents: &[String]) -> Vec<u8> {
    use lopdf::{Object, Stream, dictionary};

    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for content in contents {
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.clone().into_bytes()));

        let page_dict = dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        };
        page_ids.push(doc.add_object(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(contents.len() as i64),
    });

    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

const COVER: &[&str] = &["OFFICIAL LIST OF SECTION 13F SECURITIES"];
const NOTES: &[&str] = &["Notes"];

const DATA_PAGE: &[&str] = &[
    "CUSIP NO     ISSUER NAME              ISSUER DESCRIPTION   STATUS",
    "Run Date: 3/19/2015",
    "Total Count: header line that must not matter",
    "--------------------------------------------",
    "B01854 10 3  *AEGION CORP             COM                  ADDED",
    "000360 20 6  AAON INC                 COM PAR 0.004",
    "000361 10 5  *AAR CORP                COM                  DELETED",
];

const LAST_PAGE: &[&str] = &[
    "CUSIP NO     ISSUER NAME              ISSUER DESCRIPTION   STATUS",
    "Run Date: 3/19/2015",
    "Run Time: 11:27:45",
    "--------------------------------------------",
    "00000000011  SOME ISSUER CORP*ADDED",
    "Total Count: 4",
];

fn securities_list() -> Vec<u8> {
    pdf_with_pages(&[COVER, NOTES, NOTES, DATA_PAGE, LAST_PAGE])
}

fn write_pdf(dir: &Path, bytes: &[u8]) -> PathBuf {
    let path = dir.join("13flist2015q1.pdf");
    std::fs::write(&path, bytes).unwrap();
    path
}

fn csv_rows(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn no_args_shows_usage() {
    cmd()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_output_argument_is_usage_error() {
    cmd()
        .arg("list.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OUTPUT"));
}

#[test]
fn help_lists_options() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("INPUT"))
        .stdout(predicate::str::contains("--start-page"))
        .stdout(predicate::str::contains("--template"))
        .stdout(predicate::str::contains("--lenient"))
        .stdout(predicate::str::contains("--stop-at-end-marker"))
        .stdout(predicate::str::contains("--keep-data-file"));
}

#[test]
fn converts_securities_list_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), &securities_list());
    let csv = dir.path().join("13flist.csv");

    cmd().arg(&pdf).arg(&csv).assert().success();

    assert_eq!(
        csv_rows(&csv),
        vec![
            "B01854 10 3,*,AEGION CORP             COM,ADDED",
            "000360 20 6,,AAON INC                 COM PAR 0.004,",
            "000361 10 5,*,AAR CORP                COM,DELETED",
            "00000000011,,SOME ISSUER CORP*,ADDED",
        ]
    );
    assert!(!dir.path().join("13flist2015q1.pdf.data").exists());
}

#[test]
fn converts_rows_written_in_one_text_object() {
    let dir = tempfile::tempdir().unwrap();
    let page = "BT /F1 10 Tf 12 TL 36 720 Td (CUSIP NO     ISSUER NAME) Tj \
                T* (Run Date: 3/19/2015) Tj T* (Run Time: 11:27:45) Tj T* (------------) Tj \
                T* [(000360206) -1200 (*AAON INC) -6000 (ADDED)] TJ \
                T* [(00036020 1) -600 (AAR CORP)] TJ \
                0 -12 Td (00000000011 SOME ISSUER CORP*ADDED) Tj \
                T* (Total Count: 3) Tj ET"
        .to_string();
    let pdf = write_pdf(dir.path(), &pdf_with_contents(&[page]));
    let csv = dir.path().join("13flist.csv");

    cmd()
        .arg(&pdf)
        .arg(&csv)
        .args(["--start-page", "0"])
        .assert()
        .success();

    assert_eq!(
        csv_rows(&csv),
        vec![
            "000360206  ,*,AAON INC,ADDED",
            "00036020 1 ,,AAR CORP,",
            "00000000011,,SOME ISSUER CORP*,ADDED",
        ]
    );
}

#[test]
fn conversion_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), &securities_list());
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    cmd().arg(&pdf).arg(&first).assert().success();
    cmd().arg(&pdf).arg(&second).assert().success();

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn keep_data_file_leaves_intermediate_text() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), &securities_list());
    let csv = dir.path().join("13flist.csv");

    cmd()
        .arg(&pdf)
        .arg(&csv)
        .arg("--keep-data-file")
        .assert()
        .success();

    let data = std::fs::read_to_string(dir.path().join("13flist2015q1.pdf.data")).unwrap();
    assert!(data.contains("AEGION CORP"));
    assert!(!data.contains("OFFICIAL LIST"));
}

#[test]
fn start_page_zero_reads_cover_pages_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), &securities_list());
    let csv = dir.path().join("13flist.csv");

    cmd()
        .arg(&pdf)
        .arg(&csv)
        .args(["--start-page", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed record"));

    assert!(!csv.exists());
    assert!(dir.path().join("13flist2015q1.pdf.data").exists());
}

#[test]
fn lenient_mode_skips_short_lines() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), &securities_list());
    let csv = dir.path().join("13flist.csv");

    cmd()
        .arg(&pdf)
        .arg(&csv)
        .args(["--start-page", "0", "--lenient"])
        .assert()
        .success();

    let rows = csv_rows(&csv);
    assert!(rows.iter().any(|row| row.starts_with("OFFICIAL LI,")));
    assert!(rows.contains(&"00000000011,,SOME ISSUER CORP*,ADDED".to_string()));
    assert!(!rows.iter().any(|row| row.starts_with("Notes")));
}

#[test]
fn start_page_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), &securities_list());
    let csv = dir.path().join("13flist.csv");

    cmd()
        .env("EXTRACT_START_PAGE", "4")
        .arg(&pdf)
        .arg(&csv)
        .assert()
        .success();

    assert_eq!(csv_rows(&csv), vec!["00000000011,,SOME ISSUER CORP*,ADDED"]);
}

#[test]
fn trailing_footer_needs_stop_at_end_marker() {
    let dir = tempfile::tempdir().unwrap();
    let footer: &[&str] = &["Total Count: 1", "Page 5"];
    let pdf = write_pdf(
        dir.path(),
        &pdf_with_pages(&[COVER, NOTES, NOTES, &["00000000011  ISSUER A"], footer]),
    );
    let csv = dir.path().join("13flist.csv");

    cmd().arg(&pdf).arg(&csv).assert().failure();

    cmd()
        .arg(&pdf)
        .arg(&csv)
        .arg("--stop-at-end-marker")
        .assert()
        .success();
    assert_eq!(csv_rows(&csv), vec!["00000000011,,ISSUER A,"]);
}

#[test]
fn template_file_overrides_layout() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(
        dir.path(),
        &pdf_with_pages(&[&["HEADER", "00000000011 *ISSUER A NEW"]]),
    );
    let template = dir.path().join("layout.json");
    std::fs::write(
        &template,
        r#"{"start_page": 0, "title_prefix": "HEADER", "title_subrows": 0,
            "status_flags": ["NEW"], "separator": ";"}"#,
    )
    .unwrap();
    let csv = dir.path().join("out.csv");

    cmd()
        .arg(&pdf)
        .arg(&csv)
        .arg("--template")
        .arg(&template)
        .assert()
        .success();

    assert_eq!(csv_rows(&csv), vec!["00000000011;*;ISSUER A;NEW"]);
}

#[test]
fn invalid_template_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), &securities_list());
    let template = dir.path().join("layout.json");
    std::fs::write(&template, r#"{"cusip_width": 0}"#).unwrap();

    cmd()
        .arg(&pdf)
        .arg(dir.path().join("out.csv"))
        .arg("--template")
        .arg(&template)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid record template"));
}

#[test]
fn invalid_pdf_reports_extraction_error() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), b"this is not a pdf");

    cmd()
        .arg(&pdf)
        .arg(dir.path().join("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to convert"))
        .stderr(predicate::str::contains("PDF extraction failed"));
}

#[test]
fn missing_pdf_reports_error() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .arg(dir.path().join("missing.pdf"))
        .arg(dir.path().join("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.pdf"));
}
