use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("dispatch_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

const TREE_YAML: &str = r#"
name: mycli
type: group
children:
  - name: files
    type: group
    aliases: [f]
    description: Work with files
    children:
      - name: list
        description: List a directory
        options:
          - { name: long, aliases: [l], type: boolean }
          - { name: depth, type: number }
        positionals:
          - name: dir
      - name: remove
  - name: status
"#;

/// Minimal command tree YAML for testing.
fn write_tree(dir: &TempDir) -> PathBuf {
    let path = dir.join("tree.yaml");
    fs::write(&path, TREE_YAML).expect("failed to write tree");
    path
}

fn cmd_dispatch(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cmd-dispatch"))
        .args(args)
        .output()
        .expect("failed to run cmd-dispatch")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// parse tests
// ---------------------------------------------------------------------------

#[test]
fn parse_tokens_prints_result() {
    let dir = TempDir::new("parse_tokens");
    let tree = write_tree(&dir);

    let output = cmd_dispatch(&[
        "parse",
        "--tree",
        tree.to_str().unwrap(),
        "--",
        "f",
        "list",
        "-l",
        "/tmp",
        "--depth",
        "2",
    ]);

    assert!(output.status.success(), "parse should succeed");
    let result = stdout_json(&output);
    assert_eq!(result["success"], true);
    assert_eq!(result["commandToInvoke"], "list");
    assert_eq!(result["unknownArguments"], serde_json::json!([]));
    assert_eq!(result["arguments"]["_"], serde_json::json!(["f", "list"]));
    assert_eq!(result["arguments"]["$0"], "mycli");
    assert_eq!(result["arguments"]["long"], true);
    assert_eq!(result["arguments"]["l"], true);
    assert_eq!(result["arguments"]["depth"], 2);
    assert_eq!(result["arguments"]["dir"], "/tmp");
}

#[test]
fn parse_line_is_tokenized_with_quotes() {
    let dir = TempDir::new("parse_line");
    let tree = write_tree(&dir);

    let output = cmd_dispatch(&[
        "parse",
        "--tree",
        tree.to_str().unwrap(),
        "--line",
        "files list \"my docs\"",
    ]);

    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["arguments"]["dir"], "my docs");
}

#[test]
fn parse_failure_prints_diagnostic_and_exits_nonzero() {
    let dir = TempDir::new("parse_failure");
    let tree = write_tree(&dir);

    let output = cmd_dispatch(&[
        "parse",
        "--tree",
        tree.to_str().unwrap(),
        "--line",
        "files lsit",
    ]);

    assert!(!output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["success"], false);
    assert_eq!(result["unknownArguments"], serde_json::json!(["lsit"]));
    assert_eq!(result["commandToInvoke"], "files");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Command failed due to improper syntax"));
    assert!(stderr.contains("Did you mean: files list?"));
    assert!(stderr.contains("Available commands are \"list, remove\"."));
}

#[test]
fn parse_primary_command_sets_program_name() {
    let dir = TempDir::new("parse_primary");
    let tree = write_tree(&dir);

    let output = cmd_dispatch(&[
        "parse",
        "--tree",
        tree.to_str().unwrap(),
        "--primary",
        "mc",
        "--line",
        "mc status",
    ]);

    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["arguments"]["$0"], "mc");
    assert_eq!(result["commandToInvoke"], "status");
}

#[test]
fn parse_primary_commands_from_config() {
    let dir = TempDir::new("parse_config");
    let tree = write_tree(&dir);
    let config = dir.join("shell.yml");
    fs::write(&config, "primary_commands: [mycli]\n").unwrap();

    let output = cmd_dispatch(&[
        "parse",
        "--tree",
        tree.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--line",
        "mycli files remove",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["commandToInvoke"], "remove");
}

#[test]
fn parse_yaml_output() {
    let dir = TempDir::new("parse_yaml");
    let tree = write_tree(&dir);

    let output = cmd_dispatch(&[
        "parse",
        "--tree",
        tree.to_str().unwrap(),
        "--format",
        "yaml",
        "--line",
        "status",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("commandToInvoke: status"));
    assert!(stdout.contains("success: true"));
}

#[test]
fn parse_rejects_unsupported_tree_format() {
    let dir = TempDir::new("parse_bad_format");
    let path = dir.join("tree.toml");
    fs::write(&path, "name = 'mycli'").unwrap();

    let output = cmd_dispatch(&["parse", "--tree", path.to_str().unwrap(), "--line", "x"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported command tree format"));
}

// ---------------------------------------------------------------------------
// shell tests
// ---------------------------------------------------------------------------

fn run_shell_session(dir: &TempDir, input: &str) -> Output {
    let tree = write_tree(dir);
    let mut child = Command::new(env!("CARGO_BIN_EXE_cmd-dispatch"))
        .args(["shell", "--tree", tree.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run cmd-dispatch");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for shell")
}

#[test]
fn shell_dispatches_lines_until_exit() {
    let dir = TempDir::new("shell_session");
    let output = run_shell_session(&dir, "files list -l\nfiles\nbogus\nexit\nstatus\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mycli> "));
    assert!(stdout.contains("mycli files list: "));
    assert!(stdout.contains("Usage: mycli files <command> [options]"));
    assert!(stdout.contains("Exit acknowledged."));
    assert!(!stdout.contains("mycli status: "));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Command failed due to improper syntax"));
    assert!(stderr.contains("Command entered: \"mycli bogus\""));
}

#[test]
fn shell_help_lists_builtin_options_in_columns() {
    let dir = TempDir::new("shell_help");
    let output = run_shell_session(&dir, "files list --help\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: mycli files list <dir> [options]"));
    assert!(stdout.contains(&format!("  {:<26} Display the help", "--help (boolean) [h]")));
    assert!(stdout.contains("\n  --long (boolean) [l]\n"));
    assert!(stdout.contains("  --response-format-json (boolean) [rfj] Produce the response as JSON"));
}

#[test]
fn shell_json_response_format() {
    let dir = TempDir::new("shell_json");
    let output = run_shell_session(&dir, "status --rfj\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"command\": \"status\""));
    assert!(stdout.contains("End of input"));
}

// ---------------------------------------------------------------------------
// suggest / validate tests
// ---------------------------------------------------------------------------

#[test]
fn suggest_prints_two_nearest_paths() {
    let dir = TempDir::new("suggest");
    let tree = write_tree(&dir);

    let output = cmd_dispatch(&["suggest", "--tree", tree.to_str().unwrap(), "stauts"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "status\t2");
}

#[test]
fn suggest_commands_only_skips_groups() {
    let dir = TempDir::new("suggest_commands");
    let tree = write_tree(&dir);

    let output = cmd_dispatch(&[
        "suggest",
        "--tree",
        tree.to_str().unwrap(),
        "--commands-only",
        "files",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().all(|line| !line.starts_with("files\t")));
    assert!(stdout.lines().all(|line| !line.starts_with("f\t")));
}

#[test]
fn validate_accepts_well_formed_tree() {
    let dir = TempDir::new("validate_ok");
    let tree = write_tree(&dir);

    let output = cmd_dispatch(&["validate", "--tree", tree.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Validated command tree 'mycli'"));
}

#[test]
fn validate_reports_structural_errors() {
    let dir = TempDir::new("validate_errors");
    let path = dir.join("tree.json");
    let tree = serde_json::json!({
        "name": "mycli",
        "type": "group",
        "children": [
            { "name": "status" },
            { "name": "status" }
        ]
    });
    fs::write(&path, tree.to_string()).unwrap();

    let output = cmd_dispatch(&["validate", "--tree", path.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duplicate child in scope"));
    assert!(stderr.contains("1 validation error(s)"));
}
