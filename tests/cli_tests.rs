// tests/cli_tests.rs
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn help_displays_correctly() {
    Command::cargo_bin("cflow")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("-i, --input <FILE>"));
}

#[test]
fn version_displays_correctly() {
    let version = format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    Command::cargo_bin("cflow").unwrap().arg("--version").assert().success().stdout(predicate::str::contains(version));
}

#[test]
fn missing_input_argument_fails() {
    Command::cargo_bin("cflow").unwrap().assert().failure();
}

#[test]
fn invalid_file_extension_is_rejected() {
    let path = temp_file("cli_invalid_extension.txt", "int main() { return 0; }");
    Command::cargo_bin("cflow").unwrap().arg("-i").arg(&path).assert().failure().stderr(predicate::str::contains("expected a path to a .c file"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_reports_an_io_error() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("cli_does_not_exist.c");
    Command::cargo_bin("cflow").unwrap().arg("-i").arg(&path).assert().failure();
}

#[test]
fn a_well_formed_program_compiles_successfully() {
    let path = temp_file("cli_valid.c", "int main() { return 0; }");
    Command::cargo_bin("cflow").unwrap().arg("-i").arg(&path).assert().success();
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn emit_ir_prints_the_module() {
    let path = temp_file("cli_emit_ir.c", "int main() { return 42; }");
    Command::cargo_bin("cflow")
        .unwrap()
        .arg("-i")
        .arg(&path)
        .arg("--emit-ir")
        .assert()
        .success()
        .stdout(predicate::str::contains("module"))
        .stdout(predicate::str::contains("function main"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn no_sccp_skips_optimization_but_still_succeeds() {
    let path = temp_file("cli_no_sccp.c", "int main() { return 1 + 1; }");
    Command::cargo_bin("cflow").unwrap().arg("-i").arg(&path).arg("--no-sccp").assert().success();
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn verbose_flag_works() {
    let path = temp_file("cli_verbose.c", "int main() { return 0; }");
    Command::cargo_bin("cflow").unwrap().arg("-i").arg(&path).arg("-v").assert().success();
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn a_program_with_an_undeclared_variable_fails_with_a_semantic_error() {
    let path = temp_file("cli_undeclared.c", "int main() { return y; }");
    Command::cargo_bin("cflow").unwrap().arg("-i").arg(&path).assert().failure().stderr(predicate::str::contains("SEMANTIC"));
    std::fs::remove_file(&path).unwrap();
}
