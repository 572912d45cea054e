//! Helpers for running the `lit` binary against a scratch workspace.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use tempfile::TempDir;

/// A temporary directory to run `lit` in, isolated from the user's config.
pub struct LitWorkspace {
    _temp: TempDir,
    pub root: PathBuf,
}

impl LitWorkspace {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Path inside the workspace.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Base command with a fixed actor and no editor or log overrides.
    ///
    /// Stdin is not a pipe unless the caller sets one up.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_lit"));
        cmd.current_dir(&self.root)
            .env("LIT_USER", "tester")
            .env("HOME", &self.root)
            .env("XDG_CONFIG_HOME", self.root.join(".config"))
            .env_remove("LIT_LAYOUT")
            .env_remove("VISUAL")
            .env_remove("EDITOR")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Captured result of one `lit` run.
pub struct LitOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl LitOutput {
    /// Non-empty stdout lines.
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().filter(|line| !line.is_empty()).collect()
    }
}

fn finish(cmd: &mut Command, label: &str) -> LitOutput {
    collect(cmd.output().expect("run lit"), label)
}

fn collect(output: Output, label: &str) -> LitOutput {
    let result = LitOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !result.status.success() {
        eprintln!("[{label}] lit failed\nstdout:\n{}\nstderr:\n{}", result.stdout, result.stderr);
    }
    result
}

pub fn run_lit<I, S>(workspace: &LitWorkspace, args: I, label: &str) -> LitOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    finish(workspace.command().args(args), label)
}

pub fn run_lit_with_env<I, S>(
    workspace: &LitWorkspace,
    args: I,
    env: &[(&str, &str)],
    label: &str,
) -> LitOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut cmd = workspace.command();
    cmd.args(args);
    for (key, value) in env {
        cmd.env(key, value);
    }
    finish(&mut cmd, label)
}

pub fn run_lit_with_stdin<I, S>(
    workspace: &LitWorkspace,
    args: I,
    stdin: &str,
    label: &str,
) -> LitOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut child = workspace
        .command()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn lit");
    child
        .stdin
        .take()
        .expect("stdin pipe")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    collect(child.wait_with_output().expect("wait for lit"), label)
}

/// Initialize a tracker and create `count` issues, returning their ids.
pub fn init_with_issues(workspace: &LitWorkspace, count: usize) -> Vec<String> {
    let init = run_lit(workspace, ["init"], "init");
    assert!(init.status.success(), "init failed: {}", init.stderr);
    let count = count.to_string();
    let created = run_lit(workspace, ["new", count.as_str()], "new");
    assert!(created.status.success(), "new failed: {}", created.stderr);
    created.lines().into_iter().map(str::to_string).collect()
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read file")
}
