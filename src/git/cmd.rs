use anyhow::{Context, Result};
use std::process::Command;

/// Run a git subcommand in `repo_root`, capturing stdout. Non-zero exit
/// becomes an error carrying the trimmed stderr.
pub fn run_git<'a, I>(repo_root: &str, args: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let args: Vec<&str> = args.into_iter().collect();
    let output = Command::new("git")
        .args(&args)
        .current_dir(repo_root)
        .output()
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Get the working tree root for the current directory.
pub fn get_repo_root() -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .context("failed to run git")?;

    if !output.status.success() {
        anyhow::bail!("not in a git repository");
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Stage the given paths.
pub fn stage_paths(repo_root: &str, paths: &[String]) -> Result<()> {
    let mut args = vec!["add", "--"];
    args.extend(paths.iter().map(String::as_str));
    run_git(repo_root, args)?;
    Ok(())
}

/// Unstage the given paths.
pub fn unstage_paths(repo_root: &str, paths: &[String]) -> Result<()> {
    let mut args = vec!["reset", "HEAD", "--"];
    args.extend(paths.iter().map(String::as_str));
    run_git(repo_root, args)?;
    Ok(())
}

/// Push `branch` to `remote`.
pub fn push(repo_root: &str, remote: &str, branch: &str) -> Result<()> {
    run_git(repo_root, ["push", remote, branch])?;
    Ok(())
}

/// Run `git commit` with inherited stdio so the user's editor owns the
/// terminal. The caller must have left raw mode before calling this.
pub fn commit_interactive(repo_root: &str) -> Result<()> {
    let status = Command::new("git")
        .arg("commit")
        .current_dir(repo_root)
        .status()
        .context("failed to run git commit")?;

    if !status.success() {
        anyhow::bail!("git commit exited with {}", status);
    }
    Ok(())
}

/// Short head summary, `<abbrev-hash> <subject>`.
pub fn head_summary(repo_root: &str) -> Result<String> {
    let output = run_git(repo_root, ["log", "-1", "--format=%h %s"])?;
    Ok(output.trim().to_string())
}
