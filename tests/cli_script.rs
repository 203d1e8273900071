use assert_cmd::Command;
use predicates::str::contains;
use regex::Regex;
use tempfile::TempDir;

fn script(home: &TempDir, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("cashbook_cli")
        .unwrap()
        .env("CASHBOOK_CLI_SCRIPT", "1")
        .env("CASHBOOK_HOME", home.path())
        .write_stdin(input.to_string())
        .assert()
        .success()
}

#[test]
fn script_mode_records_and_reports_transactions() {
    let home = TempDir::new().unwrap();
    let page = home.path().join("page.html");
    let input = format!(
        "income Salary 1000\nexpense Rent 300\nexpense \"\" 50\nadd Salary 10\npage {}\nexit\n",
        page.display()
    );

    let assert = script(&home, &input)
        .stdout(contains("Starting a new ledger."))
        .stdout(contains("OK: Added income #1: Salary ₹1,000.00"))
        .stdout(contains("Expense: ₹300.00 (30%)"))
        .stdout(contains("WARNING: description: Input Transaction Description"))
        .stdout(contains("Choose income or expense"));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let balance_lines = Regex::new(r"(?m)^Balance: (\S+)$").unwrap();
    let balances: Vec<&str> = balance_lines
        .captures_iter(&stdout)
        .map(|caps| caps.get(1).unwrap().as_str())
        .collect();
    assert_eq!(balances, vec!["₹1,000.00", "₹700.00"]);

    let html = std::fs::read_to_string(&page).unwrap();
    assert!(html.contains("<td>Salary</td>"));
    assert!(html.contains("<td>Rent</td>"));
    assert!(html.contains("placeholder=\"Input Transaction Description\""));
}

#[test]
fn second_run_restores_the_ledger() {
    let home = TempDir::new().unwrap();
    script(&home, "income Salary 1000\nexpense Rent 300\nexit\n");
    script(&home, "summary\nlist expense\nexit\n")
        .stdout(contains("Loaded 2 transaction(s)."))
        .stdout(contains("Balance: ₹700.00"))
        .stdout(contains("Rent"));
}

#[test]
fn unknown_commands_get_suggestions() {
    let home = TempDir::new().unwrap();
    script(&home, "sumary\nexit\n")
        .stdout(contains("Unknown command `sumary`."))
        .stdout(contains("Suggestion: `summary`?"));
}

#[test]
fn config_changes_apply_to_the_running_session() {
    let home = TempDir::new().unwrap();
    script(
        &home,
        "income Salary 1000\nconfig currency USD\nconfig locale en-US\nsummary\nexit\n",
    )
    .stdout(contains("Balance: $1,000.00"));
    let config = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(config.contains("\"USD\""));
}

#[test]
fn unusable_data_directory_keeps_the_shell_running() {
    let temp = TempDir::new().unwrap();
    let home_file = temp.path().join("not-a-directory");
    std::fs::write(&home_file, "").unwrap();

    Command::cargo_bin("cashbook_cli")
        .unwrap()
        .env("CASHBOOK_CLI_SCRIPT", "1")
        .env("CASHBOOK_HOME", &home_file)
        .write_stdin("income Salary 1000\nsummary\nexit\n")
        .assert()
        .success()
        .stdout(contains("Storage is unavailable. Changes will not be saved."))
        .stdout(contains("OK: Added income #1: Salary ₹1,000.00"))
        .stdout(contains("Not saved: storage is unavailable for this session."))
        .stdout(contains("Balance: ₹1,000.00"));
}

#[test]
fn unreadable_config_falls_back_to_defaults() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.json"), "{bad").unwrap();
    script(&home, "income Salary 1000\nexit\n")
        .stdout(contains("Using default settings."))
        .stdout(contains("OK: Added income #1: Salary ₹1,000.00"));
    assert!(home.path().join("store").join("transactions.json").exists());
}
