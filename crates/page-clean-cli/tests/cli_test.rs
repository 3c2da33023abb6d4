//! Integration tests for the page-clean CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const BASE: &str = "https://example.ac.jp/faculty/";

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_page-clean"))
}

#[test]
fn test_basic_stdin() {
    cli()
        .arg("--url")
        .arg(BASE)
        .write_stdin("<main><h2>教員一覧</h2><div class=\"side\">noise</div></main>")
        .assert()
        .success()
        .stdout(predicate::str::contains("教員一覧"))
        .stdout(predicate::str::contains("noise").not());
}

#[test]
fn test_file_input() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("capture.html");
    fs::write(
        &input_path,
        "<main><p><a href=\"/people/abc\">Profile</a></p></main>",
    )
    .unwrap();

    cli()
        .arg(input_path.to_str().unwrap())
        .arg("--url")
        .arg(BASE)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "href=\"https://example.ac.jp/people/abc\"",
        ));
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("cleaned.html");

    cli()
        .arg("--url")
        .arg(BASE)
        .arg("-o")
        .arg(output_path.to_str().unwrap())
        .write_stdin("<main><p>output test</p></main>")
        .assert()
        .success();

    let output = fs::read_to_string(&output_path).unwrap();
    assert_eq!(output, "<main><p>output test</p></main>");
}

#[test]
fn test_dash_reads_stdin() {
    cli()
        .arg("-")
        .arg("--url")
        .arg(BASE)
        .write_stdin("<main><p>dash test</p></main>")
        .assert()
        .success()
        .stdout("<main><p>dash test</p></main>\n");
}

#[test]
fn test_text_format() {
    cli()
        .arg("--url")
        .arg(BASE)
        .arg("--format")
        .arg("text")
        .write_stdin("<main><h2>教員一覧</h2><p>山田 太郎</p></main>")
        .assert()
        .success()
        .stdout("教員一覧\n山田 太郎\n");
}

#[test]
fn test_records_format_emits_json() {
    let html = "<main><table>\
        <tr><th>氏名</th><th>専門分野</th></tr>\
        <tr><td>田中 太郎</td><td>経済学</td></tr>\
        <tr><td>佐藤 花子</td><td>統計学</td></tr>\
        </table></main>";

    let output = cli()
        .arg("--url")
        .arg(BASE)
        .arg("--format")
        .arg("records")
        .write_stdin(html)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let rows: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["name"], "田中 太郎");
}

#[test]
fn test_blocks_format_emits_json() {
    let html = "<main><ul><li><a href=\"/r/lab/x\">山田研究室</a></li></ul></main>";

    let output = cli()
        .arg("--url")
        .arg(BASE)
        .arg("--format")
        .arg("blocks")
        .write_stdin(html)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let rows: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(rows[0]["tag"], "LI");
    assert_eq!(rows[0]["links"][0]["href"], "https://example.ac.jp/r/lab/x");
}

#[test]
fn test_url_is_required() {
    cli()
        .write_stdin("<p>x</p>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--url"));
}

#[test]
fn test_missing_input_file_fails() {
    cli()
        .arg("/definitely/not/here.html")
        .arg("--url")
        .arg(BASE)
        .assert()
        .failure();
}
