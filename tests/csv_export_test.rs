mod common;

use common::write;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use tree_scanner::config::ScannerSettings;
use tree_scanner::output::write_sensitive_csv;
use tree_scanner::scanner::presets::scan_sensitive;

#[test]
fn test_export_scan_results() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("src");
    write(&root, "Login.java", "class Login {\n    log.info(\"password, please\");\n}\n");
    write(&root, "app.py", "print(\"token\", token)\n");

    let report = scan_sensitive(
        &root,
        &ScannerSettings::default(),
        &["password".to_string(), "token".to_string()],
    )
    .unwrap();
    let out = temp_dir.path().join("hits.csv");
    write_sensitive_csv(&out, report.records()).unwrap();

    let content = fs::read_to_string(&out).unwrap();
    let content = content.strip_prefix('\u{feff}').expect("missing BOM");
    let lines: Vec<&str> = content.split("\r\n").collect();

    assert_eq!(
        lines[0],
        "Index,Sensitive Word,File Type,Content,Line Number,File Path"
    );
    assert_eq!(
        lines[1],
        format!(
            "1,password,java,\"log.info(\"\"password, please\"\");\",2,{}",
            root.join("Login.java").display()
        )
    );
    assert_eq!(
        lines[2],
        format!(
            "2,token,py,\"print(\"\"token\"\", token)\",1,{}",
            root.join("app.py").display()
        )
    );
    assert_eq!(lines[3], "");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_export_empty_report_writes_header_only() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("src");
    fs::create_dir_all(&root).unwrap();

    let report = scan_sensitive(&root, &ScannerSettings::default(), &[]).unwrap();
    let out = temp_dir.path().join("empty.csv");
    write_sensitive_csv(&out, report.records()).unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "\u{feff}Index,Sensitive Word,File Type,Content,Line Number,File Path\r\n"
    );
}
