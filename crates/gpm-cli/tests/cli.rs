//! End-to-end runs of the `gpm` binary.

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

const GPM: &str = env!("CARGO_BIN_EXE_gpm");

fn gpm(args: &[&str]) -> Output {
    Command::new(GPM)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn import_example(dir: &Path) -> String {
    let csv = dir.join("ledger.csv");
    std::fs::write(
        &csv,
        "Account,Period,Amount\nRevenue,Q1,1000\nCOGS,Q1,600\nRevenue,Q2,500\n",
    )
    .unwrap();

    let book = dir.join("book.json");
    let out = gpm(&[
        "import",
        csv.to_str().unwrap(),
        "--output",
        book.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    book.to_str().unwrap().to_string()
}

#[test]
fn test_import_calc_show() {
    let dir = tempfile::tempdir().unwrap();
    let book = import_example(dir.path());

    let out = gpm(&["calc", &book, "--period", "Q1"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "Gross profit margin written to sheet 'GPM_Q1'.\n"
    );

    let out = gpm(&["show", &book]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        "Sheet: GPM_Q1\n\
         Period               Q1\n\
         \n\
         Metric               Value\n\
         Revenue              $1,000.00\n\
         COGS                 $600.00\n\
         Gross Profit         $400.00\n\
         Gross Profit Margin  40.00%\n"
    );
}

#[test]
fn test_calc_error_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let book = import_example(dir.path());

    let out = gpm(&["calc", &book, "--period", "Q9"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("No Revenue data found for period 'Q9'."));

    let out = gpm(&["calc", &book, "--period", " "]);
    assert!(!out.status.success());
}

#[test]
fn test_calc_to_output_leaves_input() {
    let dir = tempfile::tempdir().unwrap();
    let book = import_example(dir.path());
    let before = std::fs::read_to_string(&book).unwrap();
    let result = dir.path().join("result.json");

    let out = gpm(&[
        "calc",
        &book,
        "--period",
        "Q1",
        "--output",
        result.to_str().unwrap(),
        "--prefix",
        "Margin_",
    ]);
    assert!(out.status.success());
    assert_eq!(std::fs::read_to_string(&book).unwrap(), before);

    let out = gpm(&["show", result.to_str().unwrap(), "--sheet", "Margin_Q1"]);
    assert!(out.status.success());
    assert!(stdout(&out).starts_with("Sheet: Margin_Q1\n"));
}

#[test]
fn test_calc_through_bridge() {
    let dir = tempfile::tempdir().unwrap();
    let book = import_example(dir.path());

    let bridge = format!("{GPM} serve");
    let out = gpm(&["calc", &book, "--period", "Q1", "--bridge", &bridge]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    // the serving process saved the workbook on shutdown
    let out = gpm(&["show", &book, "--sheet", "gpm_q1"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("40.00%"));
}
