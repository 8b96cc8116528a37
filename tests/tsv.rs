use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn pubgen() -> Command {
    let mut cmd = Command::cargo_bin("pubgen").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

const HEADER: &str =
    "pub_date\ttitle\tauthors\tvenue\turl_slug\tpaper_url\tvideo_url\tcode_url\timage_path\tcategory";

#[test]
fn writes_one_page_per_row() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let table = dir.path().join("publications.tsv");
    fs::write(
        &table,
        format!(
            "{HEADER}\n\
             2023-05-01\tA Paper\tJ. Doe\tCHI 2023\ta-paper\thttps://p.org\t\thttps://github.com/x\t/images/a.png\tconferences\n\
             2021-09-09\tJournal Work\t\tTOCHI\tjournal-work\t\t\t\t\tjournals\n\
             2020-01-01\t\tNo Title\t\tno-title\t\t\t\t\t\n"
        ),
    )?;
    let out = dir.path().join("out");

    let output = pubgen().arg("tsv").arg(&table).arg("-o").arg(&out).output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(strip_ansi_escapes::strip(&output.stdout))?;
    assert!(stdout.contains("Created: 2023-05-01-a-paper.md (conferences)"), "stdout=\n{stdout}");
    assert!(stdout.contains("row 4 needs pub_date, title and url_slug"), "stdout=\n{stdout}");
    assert!(stdout.contains("✓ 2  ⚠ 1  ✗ 0"), "stdout=\n{stdout}");

    let page = fs::read_to_string(out.join("2023-05-01-a-paper.md"))?;
    let yaml = page
        .strip_prefix("---\n")
        .and_then(|rest| rest.strip_suffix("---\n"))
        .expect("front matter fences");
    let meta: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    assert_eq!(meta["title"].as_str(), Some("A Paper"));
    assert_eq!(meta["collection"].as_str(), Some("publications"));
    assert_eq!(meta["permalink"].as_str(), Some("/publication/a-paper"));
    assert_eq!(meta["header"]["teaser"].as_str(), Some("/images/a.png"));
    assert_eq!(meta["buttons"][0]["url"].as_str(), Some("https://p.org"));
    assert_eq!(meta["buttons"][1]["type"].as_str(), Some("code"));

    let journal = fs::read_to_string(out.join("2021-09-09-journal-work.md"))?;
    assert!(journal.contains("teaser: /images/default-thumbnail.png"));
    assert!(!journal.contains("buttons"));
    assert!(!journal.contains("authors"));
    Ok(())
}

#[test]
fn missing_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("bad.tsv");
    fs::write(&table, "pub_date\ttitle\n2020-01-01\tT\n").unwrap();
    pubgen()
        .arg("tsv")
        .arg(&table)
        .arg("-o")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing required column"));
}

#[test]
fn quoted_title_loses_its_quotes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let table = dir.path().join("publications.tsv");
    fs::write(
        &table,
        format!("{HEADER}\n2023-05-01\t\"Widgets, Gadgets\"\tJ. Doe\tCHI\twidgets\t\t\t\t\t\n"),
    )?;
    let out = dir.path().join("out");

    pubgen().arg("tsv").arg(&table).arg("-o").arg(&out).assert().success();
    let page = fs::read_to_string(out.join("2023-05-01-widgets.md"))?;
    let yaml = page
        .strip_prefix("---\n")
        .and_then(|rest| rest.strip_suffix("---\n"))
        .expect("front matter fences");
    let meta: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    assert_eq!(meta["title"].as_str(), Some("Widgets, Gadgets"));
    Ok(())
}
