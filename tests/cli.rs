//! End-to-end tests for the `folio` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn folio(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.env("FOLIO_DATA_DIR", dir.path())
        .env_remove("FOLIO_LOG")
        .current_dir(dir.path());
    cmd
}

/// Pull the value of the `ID:` line out of command output
fn created_id(output: &[u8]) -> String {
    let text = String::from_utf8_lossy(output);
    text.lines()
        .find_map(|line| line.trim().strip_prefix("ID:"))
        .map(|id| id.trim().to_string())
        .expect("output should contain an ID line")
}

#[test]
fn test_no_command_prints_hint() {
    let dir = TempDir::new().unwrap();
    folio(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("folio --help"));
}

#[test]
fn test_config_shows_paths() {
    let dir = TempDir::new().unwrap();
    folio(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Currency symbol: Rs."));
    assert!(dir.path().join("config.json").exists());
}

#[test]
fn test_finance_add_list_and_summary() {
    let dir = TempDir::new().unwrap();

    folio(&dir)
        .args(["finance", "add", "income", "1000", "Salary", "--date", "2024-01-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rs. 1,000.00"));
    folio(&dir)
        .args([
            "finance", "add", "expense", "400", "Food", "-d", "Groceries", "--date", "2024-01-20",
        ])
        .assert()
        .success();

    folio(&dir)
        .args(["finance", "list", "--type", "expense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Salary").not());

    folio(&dir)
        .args(["finance", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rs. 600.00"));

    folio(&dir)
        .args(["finance", "categories", "--type", "expense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food"));

    folio(&dir)
        .args(["finance", "trend", "--months", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly Trend"));
}

#[test]
fn test_finance_rejects_negative_amount() {
    let dir = TempDir::new().unwrap();
    folio(&dir)
        .args(["finance", "add", "expense", "--", "-5", "Food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_finance_delete() {
    let dir = TempDir::new().unwrap();
    let output = folio(&dir)
        .args(["finance", "add", "expense", "12.5", "Transport"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = created_id(&output.stdout);

    folio(&dir)
        .args(["finance", "delete", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted expense entry"));
    folio(&dir)
        .args(["finance", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries found."));
}

#[test]
fn test_project_lifecycle() {
    let dir = TempDir::new().unwrap();

    let output = folio(&dir)
        .args(["project", "add", "Website", "--type", "Web", "--tag", "client"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = created_id(&output.stdout);

    folio(&dir)
        .args([
            "project", "entry-add", &id, "Design", "--start", "2024-01-01", "--progress", "150",
            "--cost", "2500",
        ])
        .assert()
        .success();

    std::fs::write(dir.path().join("brief.txt"), "scope").unwrap();
    folio(&dir)
        .args(["project", "attach", &id, "brief.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Attached brief.txt"));

    folio(&dir)
        .args(["project", "link", &id, "github.com/acme/site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub Repository"));

    folio(&dir)
        .args(["project", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries (1)"))
        .stdout(predicate::str::contains("100%"))
        .stdout(predicate::str::contains("Rs. 2,500.00"))
        .stdout(predicate::str::contains("brief.txt"))
        .stdout(predicate::str::contains("https://github.com/acme/site"));

    folio(&dir)
        .args(["project", "duplicate", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Website (Copy)"));

    folio(&dir)
        .args(["project", "list", "--tag", "client"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Website (Copy)"));

    folio(&dir)
        .args(["project", "report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Web"));

    folio(&dir)
        .args(["project", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 entries, 1 files, 1 links"));
}

#[test]
fn test_unknown_project_fails() {
    let dir = TempDir::new().unwrap();
    folio(&dir)
        .args(["project", "show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project not found"));
}

#[test]
fn test_csv_export_import_round_trip() {
    let source = TempDir::new().unwrap();
    folio(&source)
        .args([
            "finance", "add", "expense", "42", "Food", "-d", "Lunch, with \"friends\"", "--date",
            "2024-03-02",
        ])
        .assert()
        .success();

    let csv_path = source.path().join("out.csv");
    folio(&source)
        .args(["export", "finance-csv"])
        .arg(&csv_path)
        .assert()
        .success();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("Date,Type,Category,Amount,Description"));
    assert!(csv.contains("\"Lunch, with \"\"friends\"\"\""));

    let target = TempDir::new().unwrap();
    folio(&target)
        .args(["import", "finance-csv"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 finance entries"));
    folio(&target)
        .args(["finance", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lunch, with \"friends\""));
}

#[test]
fn test_bad_csv_import_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("bad.csv");
    std::fs::write(
        &csv_path,
        "Date,Type,Category,Amount,Description\n2024-01-01,income,Salary,10,\nnot-a-date,income,Salary,10,\n",
    )
    .unwrap();

    folio(&dir)
        .args(["import", "finance-csv"])
        .arg(&csv_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row 3"));
    folio(&dir)
        .args(["finance", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries found."));
}

#[test]
fn test_backup_export_and_restore() {
    let dir = TempDir::new().unwrap();
    folio(&dir).args(["project", "add", "Kept"]).assert().success();
    folio(&dir)
        .args(["finance", "add", "income", "5", "Gift"])
        .assert()
        .success();

    folio(&dir)
        .args(["export", "backup", "all.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 projects and 1 entries"));

    folio(&dir)
        .args(["import", "backup", "all.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Safety backup"));

    // Projects replaced, finance appended
    folio(&dir)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| out.matches("Kept").count() == 1));
    folio(&dir)
        .args(["finance", "list"])
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| out.matches("Gift").count() == 2));

    folio(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s)"));
}

#[test]
fn test_backup_create() {
    let dir = TempDir::new().unwrap();
    folio(&dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created: backup-"));
}

#[test]
fn test_backup_restore_replaces_finance() {
    let dir = TempDir::new().unwrap();
    folio(&dir)
        .args(["finance", "add", "income", "1000", "Salary"])
        .assert()
        .success();
    folio(&dir).args(["backup", "create"]).assert().success();

    let before = folio(&dir).args(["finance", "list"]).output().unwrap();
    let before = String::from_utf8_lossy(&before.stdout).matches("Salary").count();
    assert!(before > 0);

    for _ in 0..2 {
        folio(&dir)
            .args(["backup", "restore", "latest", "--force"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Restore complete!"));
    }

    let after = folio(&dir).args(["finance", "list"]).output().unwrap();
    let after = String::from_utf8_lossy(&after.stdout).matches("Salary").count();
    assert_eq!(after, before);

    folio(&dir)
        .args(["finance", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rs. 1,000.00"))
        .stdout(predicate::str::contains("Rs. 2,000.00").not());
}

#[test]
fn test_default_categories() {
    let dir = TempDir::new().unwrap();
    folio(&dir)
        .args(["finance", "categories", "--type", "income", "--defaults"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary"));
}
