use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

const MASTER: &str = "correct horse battery";

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("credvault"));
    cmd.env_remove("CREDVAULT_DIR")
        .env_remove("CREDVAULT_COMMON_PASSWORDS")
        .env_remove("RUST_LOG");
    cmd
}

fn vault_cmd(dir: &Path) -> Command {
    let mut cmd = bin();
    cmd.env("CREDVAULT_PASSWORD", MASTER).arg("--dir").arg(dir);
    cmd
}

fn init(dir: &Path) {
    vault_cmd(dir)
        .args(["init", "--argon-mem", "1024", "--argon-time", "1"])
        .assert()
        .success();
}

fn add(dir: &Path, service: &str, username: &str, secret: &str) {
    vault_cmd(dir)
        .args(["add", service, username])
        .write_stdin(format!("{secret}\n"))
        .assert()
        .success();
}

#[test]
fn init_creates_vault_files() {
    let dir = tempdir().unwrap();

    vault_cmd(dir.path())
        .args(["init", "--argon-mem", "1024", "--argon-time", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vault initialized"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("entries.json").exists());

    let config = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(!config.contains(MASTER));
}

#[test]
fn init_fails_if_store_exists() {
    let dir = tempdir().unwrap();
    init(dir.path());

    vault_cmd(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_finishes_setup_when_digest_is_empty() {
    let dir = tempdir().unwrap();
    let kdf = credvault::KdfParams::new(1024, 1, 1).unwrap();
    let pending = credvault::VaultConfig::new(String::new(), [0u8; 16], kdf);
    std::fs::write(dir.path().join("config.json"), pending.to_json().unwrap()).unwrap();

    vault_cmd(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("run `credvault init` first"));

    init(dir.path());

    vault_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No passwords stored."));
}

#[test]
fn init_keeps_an_unparsable_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, "not json").unwrap();

    vault_cmd(dir.path())
        .args(["init", "--argon-mem", "1024", "--argon-time", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unreadable"))
        .stderr(predicate::str::contains("already exists").not());

    assert_eq!(std::fs::read_to_string(&config).unwrap(), "not json");
}

#[test]
fn init_rejects_short_master_password() {
    let dir = tempdir().unwrap();

    bin()
        .env("CREDVAULT_PASSWORD", "short")
        .arg("--dir")
        .arg(dir.path())
        .args(["init", "--argon-mem", "1024", "--argon-time", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));

    assert!(!dir.path().join("config.json").exists());
}

#[test]
fn add_and_get_roundtrip() {
    let dir = tempdir().unwrap();
    init(dir.path());

    vault_cmd(dir.path())
        .args(["add", "github", "alice"])
        .write_stdin("Tr0ub4dor&3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("stored entry 1"))
        .stdout(predicate::str::contains("80/100 (VERY STRONG)"));

    vault_cmd(dir.path())
        .args(["get", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password: Tr0ub4dor&3"))
        .stdout(predicate::str::contains("Username: alice"));

    let entries = std::fs::read_to_string(dir.path().join("entries.json")).unwrap();
    assert!(!entries.contains("Tr0ub4dor&3"));
}

#[test]
fn wrong_password_fails() {
    let dir = tempdir().unwrap();
    init(dir.path());

    bin()
        .env("CREDVAULT_PASSWORD", "wrong password")
        .arg("--dir")
        .arg(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("incorrect master password"));
}

#[test]
fn actions_fail_if_store_not_exists() {
    let dir = tempdir().unwrap();

    vault_cmd(dir.path())
        .args(["get", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("store does not exist"));
}

#[test]
fn list_shows_entries_without_passwords() {
    let dir = tempdir().unwrap();
    init(dir.path());
    add(dir.path(), "github", "alice", "SecretValue!9");
    add(dir.path(), "mail", "bob", "password123");

    vault_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("github"))
        .stdout(predicate::str::contains("very weak"))
        .stdout(predicate::str::contains("SecretValue!9").not());

    vault_cmd(dir.path())
        .args(["list", "--service", "GIT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("github"))
        .stdout(predicate::str::contains("mail").not());
}

#[test]
fn update_replaces_password() {
    let dir = tempdir().unwrap();
    init(dir.path());
    add(dir.path(), "forum", "carol", "abcdefgh");

    vault_cmd(dir.path())
        .args(["update", "1"])
        .write_stdin("Vn7!pQ2#xL9@mR4$\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("entry 1 updated"));

    vault_cmd(dir.path())
        .args(["get", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password: Vn7!pQ2#xL9@mR4$"));
}

#[test]
fn remove_entry_works() {
    let dir = tempdir().unwrap();
    init(dir.path());
    add(dir.path(), "github", "alice", "hunter22");

    vault_cmd(dir.path())
        .args(["remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed successfully"));

    vault_cmd(dir.path())
        .args(["get", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("entry 1 not found"));
}

#[test]
fn add_with_generated_password() {
    let dir = tempdir().unwrap();
    init(dir.path());

    vault_cmd(dir.path())
        .args(["add", "bank", "dave", "--generate", "--length", "24"])
        .assert()
        .success()
        .stdout(predicate::str::contains("generated password: "))
        .stdout(predicate::str::contains("stored entry 1"));
}

#[test]
fn analyze_reports_common_password() {
    bin()
        .args(["analyze", "password123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0/100 (VERY WEAK)"))
        .stdout(predicate::str::contains("commonly used password"));
}

#[test]
fn analyze_reads_password_from_stdin() {
    bin()
        .arg("analyze")
        .write_stdin("abcdefgh\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("15/100 (WEAK)"))
        .stdout(predicate::str::contains("Avoid sequential characters"));
}

#[test]
fn missing_common_password_file_falls_back_to_empty_list() {
    let dir = tempdir().unwrap();

    bin()
        .arg("--common-passwords")
        .arg(dir.path().join("missing.txt"))
        .args(["analyze", "password123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30/100 (WEAK)"));
}

#[test]
fn custom_common_password_file_is_used() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("common.txt");
    std::fs::write(&list, "Tr0ub4dor&3\n").unwrap();

    bin()
        .arg("--common-passwords")
        .arg(&list)
        .args(["analyze", "tr0ub4dor&3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VERY WEAK"));
}

#[test]
fn generate_prints_password_of_requested_length() {
    let output = bin()
        .args(["generate", "--length", "32", "--no-symbols"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let password = String::from_utf8(output).unwrap();
    let password = password.trim_end();
    assert_eq!(password.len(), 32);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn generate_rejects_too_short_length() {
    bin()
        .args(["generate", "--length", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
}

#[test]
fn init_with_custom_argon2_parameters() {
    let dir = tempdir().unwrap();

    vault_cmd(dir.path())
        .args([
            "init",
            "--argon-mem",
            "2048",
            "--argon-time",
            "2",
            "--argon-parallelism",
            "1",
        ])
        .assert()
        .success();

    let config = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(config.contains("2048"));
}

#[test]
fn init_with_invalid_argon2_parameters_fails() {
    let dir = tempdir().unwrap();

    vault_cmd(dir.path())
        .args(["init", "--argon-mem", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("memory cost"));
}
