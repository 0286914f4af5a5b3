use assert_cmd::Command;

fn cli() -> Command {
    Command::cargo_bin("bookshelf-cli").unwrap()
}

#[test]
fn help_lists_commands() {
    let output = cli().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for command in ["list", "stats", "add", "import", "export", "delete-all", "sample"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn update_without_fields_is_refused() {
    let output = cli()
        .args(["--api-url", "http://127.0.0.1:9", "update", "507f1f77bcf86cd799439011"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("nothing to update"));
}

#[test]
fn delete_all_requires_confirmation() {
    let output = cli()
        .args(["--api-url", "http://127.0.0.1:9", "delete-all"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("--yes"));
}

#[test]
fn unreachable_api_is_reported() {
    let output = cli()
        .args(["--api-url", "http://127.0.0.1:9", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to reach bookshelf API"));
}
