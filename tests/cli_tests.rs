mod common;

use common::{fxt, mailbox_with_reports, roster_sheet, setup_test_db, temp_dir, temp_out};
use predicates::str::contains;
use std::fs;

const ROSTER: &str = "11.3 flex absences";

fn init_db(db: &str) {
    fxt()
        .args(["--db", db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Workbook initialized"));
}

fn roster_csv(name: &str, ids: &[&str]) -> String {
    let path = temp_out(name, "csv");
    let body: Vec<String> = roster_sheet(ids).iter().map(|r| r.join(",")).collect();
    fs::write(&path, body.join("\n")).expect("write roster csv");
    path
}

#[test]
fn test_init_creates_workbook() {
    let db = setup_test_db("cli_init");
    init_db(&db);
    assert!(fs::metadata(&db).is_ok());
}

#[test]
fn test_roster_new_for_date() {
    let db = setup_test_db("cli_roster_new");
    init_db(&db);

    fxt()
        .args(["--db", &db, "roster", "new", "--date", "2025-11-03"])
        .assert()
        .success()
        .stdout(contains(format!("Created new sheet: \"{ROSTER}\"")));

    fxt()
        .args(["--db", &db, "roster", "new", "--date", "2025-11-03"])
        .assert()
        .success()
        .stdout(contains("already exists"));
}

#[test]
fn test_full_daily_run() {
    let db = setup_test_db("cli_daily");
    let mailbox = mailbox_with_reports("cli_daily_mail");
    let mailbox = mailbox.to_string_lossy().to_string();
    init_db(&db);

    fxt()
        .args(["--db", &db, "roster", "new", "--date", "2025-11-03"])
        .assert()
        .success();

    let csv = roster_csv("cli_daily_roster", &["1001", "1002", "1003", "1004"]);
    fxt()
        .args(["--db", &db, "sheet", "paste", ROSTER, "--file", &csv, "--replace"])
        .assert()
        .success()
        .stdout(contains("Pasted 6 row(s)"));

    fxt()
        .args(["--db", &db, "--mailbox", &mailbox, "import"])
        .assert()
        .success()
        .stdout(contains("Imported 3 of 3 reports"));

    // 1002 ("2") and 1003 ("03") are filtered out of period 02.
    fxt()
        .args(["--db", &db, "enrich"])
        .assert()
        .success()
        .stdout(contains("2 skipper(s) staged"));

    let out = temp_out("cli_daily_export", "json");
    fxt()
        .args(["--db", &db, "export", "--format", "json", "--file", &out, "--force"])
        .assert()
        .success()
        .stdout(contains("JSON export completed"));
    let json = fs::read_to_string(&out).expect("export written");
    assert!(json.contains("1002"));
    assert!(json.contains("1003"));
    assert!(!json.contains("\"1001\""));

    fxt()
        .args(["--db", &db, "sync-comments"])
        .assert()
        .success()
        .stdout(contains("No comments found"));

    fxt()
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("enrich"));
}

#[test]
fn test_enrich_without_roster_fails() {
    let db = setup_test_db("cli_no_roster");
    init_db(&db);

    fxt()
        .args(["--db", &db, "enrich"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("No flex absences sheet found"));
}

#[test]
fn test_import_without_mailbox_folder_fails() {
    let db = setup_test_db("cli_no_mailbox");
    let missing = temp_dir("cli_missing_mailbox").join("nope");
    init_db(&db);

    fxt()
        .args(["--db", &db, "--mailbox", &missing.to_string_lossy(), "import"])
        .assert()
        .failure()
        .stderr(contains("mailbox folder not found"));
}

#[test]
fn test_export_requires_absolute_path() {
    let db = setup_test_db("cli_export_relative");
    init_db(&db);
    let csv = roster_csv("cli_export_relative_roster", &["1001"]);
    fxt()
        .args(["--db", &db, "sheet", "paste", "Skippers", "--file", &csv])
        .assert()
        .success();

    fxt()
        .args(["--db", &db, "export", "--sheet", "Skippers", "--file", "out.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_sheet_show_prints_notes() {
    let db = setup_test_db("cli_sheet_show");
    init_db(&db);
    fxt()
        .args(["--db", &db, "roster", "new", "--date", "2025-11-03"])
        .assert()
        .success();

    fxt()
        .args(["--db", &db, "sheet", "show", ROSTER, "--notes"])
        .assert()
        .success()
        .stdout(contains("Paste FlexiSched data here"))
        .stdout(contains("A1"));
}

#[test]
fn test_config_check_accepts_defaults() {
    fxt()
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("Configuration is valid."));
}

#[test]
fn test_bad_config_file_is_rejected() {
    let dir = temp_dir("cli_bad_config");
    let path = dir.join("bad.conf");
    fs::write(&path, "roster:\n  comment_column: \"A\"\n").expect("write config");

    fxt()
        .args(["--config", &path.to_string_lossy(), "config", "--check"])
        .assert()
        .failure()
        .stderr(contains("Configuration error"));
}
