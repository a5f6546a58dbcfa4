use anyhow::{Context, Result};
use thiserror::Error;

use super::cmd;

// ── Types ──

/// Errors for the strict porcelain-v2 grammar. The upstream output is
/// trusted; any of these is a fatal parse failure, not a recoverable one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusParseError {
    #[error("status XY field is not exactly two characters: {0:?}")]
    InvalidXy(String),
    #[error("status line is missing the {0} field")]
    MissingField(&'static str),
    #[error("invalid change type character {0:?}")]
    InvalidChangeType(char),
    #[error("rename/copy score is not R<n> or C<n>: {0:?}")]
    InvalidScore(String),
}

/// One X or Y column of a porcelain-v2 status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Unmodified,
    Modified,
    TypeChange,
    Added,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
}

impl ChangeType {
    pub fn from_xy_char(c: char) -> Result<Self, StatusParseError> {
        match c {
            '.' => Ok(ChangeType::Unmodified),
            'M' => Ok(ChangeType::Modified),
            'T' => Ok(ChangeType::TypeChange),
            'A' => Ok(ChangeType::Added),
            'D' => Ok(ChangeType::Deleted),
            'R' => Ok(ChangeType::Renamed),
            'C' => Ok(ChangeType::Copied),
            'U' => Ok(ChangeType::Unmerged),
            other => Err(StatusParseError::InvalidChangeType(other)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChangeType::Unmodified => "unmodified",
            ChangeType::Modified => "modified",
            ChangeType::TypeChange => "type-change",
            ChangeType::Added => "added",
            ChangeType::Deleted => "deleted",
            ChangeType::Renamed => "renamed",
            ChangeType::Copied => "copied",
            ChangeType::Unmerged => "unmerged",
        }
    }
}

/// One row of a status section. All labels are static strings, so optimistic
/// rewrites cost nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub status: &'static str,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, status: &'static str) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// One line of `git branch --format=…`, duplicated into owned storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub is_head: bool,
    pub objectname: String,
    pub refname: String,
    pub subject: String,
    pub upstream: String,
}

/// In-memory snapshot of the working tree, built by `load_status` and
/// handed to the foreground through the event queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoState {
    pub branch_refs: Vec<BranchRef>,
    /// The captured porcelain-v2 text, verbatim.
    pub raw_status: String,
    pub branch_head: Option<String>,
    pub branch_upstream: Option<String>,
    /// `git log -1` line, filled only when the branch listing has no head
    /// entry (detached HEAD).
    pub head_summary: Option<String>,
    pub staged: Vec<FileEntry>,
    pub unstaged: Vec<FileEntry>,
    pub untracked: Vec<FileEntry>,
}

impl RepoState {
    pub fn head_ref(&self) -> Option<&BranchRef> {
        self.branch_refs.iter().find(|r| r.is_head)
    }
}

// ── Loading ──

const BRANCH_FORMAT: &str =
    "--format=%(if)%(HEAD)%(then)+%(else)-%(end)\t%(objectname)\t%(refname)\t%(contents:subject)\t%(upstream)";

/// Parse the working tree into a fresh `RepoState`.
pub fn load_status(repo_root: &str) -> Result<RepoState> {
    let raw = cmd::run_git(repo_root, ["status", "--branch", "--porcelain=v2"])?;
    let parsed = parse_status(&raw).context("malformed porcelain-v2 status output")?;
    let branch_refs = list_branches(repo_root)?;

    // Detached HEAD never shows up in the branch listing; fall back to the
    // last commit line. An unborn repo has no log either, so failure is fine.
    let head_summary = if branch_refs.iter().any(|r| r.is_head) {
        None
    } else {
        cmd::head_summary(repo_root).ok()
    };

    Ok(RepoState {
        branch_refs,
        raw_status: raw,
        branch_head: parsed.branch_head,
        branch_upstream: parsed.branch_upstream,
        head_summary,
        staged: parsed.staged,
        unstaged: parsed.unstaged,
        untracked: parsed.untracked,
    })
}

/// List local branches with head marker, object name, subject and upstream.
pub fn list_branches(repo_root: &str) -> Result<Vec<BranchRef>> {
    let raw = cmd::run_git(repo_root, ["branch", BRANCH_FORMAT])?;
    Ok(parse_branches(&raw))
}

// ── Porcelain v2 ──

#[derive(Debug, Default, PartialEq)]
struct ParsedStatus {
    branch_head: Option<String>,
    branch_upstream: Option<String>,
    staged: Vec<FileEntry>,
    unstaged: Vec<FileEntry>,
    untracked: Vec<FileEntry>,
}

/// Parse `git status --branch --porcelain=v2` output. Grammar per
/// git-status(1): `1` ordinary change, `2` rename/copy, `u` unmerged,
/// `?` untracked, `!` ignored (discarded), `#` headers.
fn parse_status(raw: &str) -> Result<ParsedStatus, StatusParseError> {
    let mut out = ParsedStatus::default();

    for line in raw.lines() {
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("# branch.head ") {
            out.branch_head = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("# branch.upstream ") {
            out.branch_upstream = Some(rest.to_string());
        } else if line.starts_with('#') {
            // branch.oid, branch.ab and future headers
        } else if let Some(rest) = line.strip_prefix("1 ") {
            parse_changed_line(rest, &mut out)?;
        } else if let Some(rest) = line.strip_prefix("2 ") {
            parse_renamed_line(rest, &mut out)?;
        } else if let Some(rest) = line.strip_prefix("u ") {
            parse_unmerged_line(rest, &mut out)?;
        } else if let Some(rest) = line.strip_prefix("? ") {
            out.untracked.push(FileEntry::new(rest, "untracked"));
        } else if line.starts_with("! ") {
            // ignored entries are not shown
        }
    }

    out.staged.sort_by(|a, b| a.path.cmp(&b.path));
    out.unstaged.sort_by(|a, b| a.path.cmp(&b.path));
    out.untracked.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

/// `<XY> <sub> <mH> <mI> <mW> <hH> <hI> <path>`
fn parse_changed_line(rest: &str, out: &mut ParsedStatus) -> Result<(), StatusParseError> {
    let mut rest = rest;
    let (x, y) = parse_xy(take_field(&mut rest, "XY")?)?;
    for name in ["sub", "mode-head", "mode-index", "mode-worktree", "oid-head", "oid-index"] {
        take_field(&mut rest, name)?;
    }
    if rest.is_empty() {
        return Err(StatusParseError::MissingField("path"));
    }
    project_changed(x, y, rest, out);
    Ok(())
}

/// `<XY> <sub> <mH> <mI> <mW> <hH> <hI> <score> <newpath>TAB<origpath>`
fn parse_renamed_line(rest: &str, out: &mut ParsedStatus) -> Result<(), StatusParseError> {
    let mut rest = rest;
    let (x, y) = parse_xy(take_field(&mut rest, "XY")?)?;
    for name in ["sub", "mode-head", "mode-index", "mode-worktree", "oid-head", "oid-index"] {
        take_field(&mut rest, name)?;
    }
    validate_score(take_field(&mut rest, "score")?)?;
    let (path, _orig) = rest
        .split_once('\t')
        .ok_or(StatusParseError::MissingField("original path"))?;
    if path.is_empty() {
        return Err(StatusParseError::MissingField("path"));
    }
    project_changed(x, y, path, out);
    Ok(())
}

/// `<XY> <sub> <m1> <m2> <m3> <mW> <o1> <o2> <o3> <path>`
fn parse_unmerged_line(rest: &str, out: &mut ParsedStatus) -> Result<(), StatusParseError> {
    let mut rest = rest;
    parse_xy(take_field(&mut rest, "XY")?)?;
    for name in [
        "sub", "mode-1", "mode-2", "mode-3", "mode-worktree", "oid-1", "oid-2", "oid-3",
    ] {
        take_field(&mut rest, name)?;
    }
    if rest.is_empty() {
        return Err(StatusParseError::MissingField("path"));
    }
    out.unstaged.push(FileEntry::new(rest, "unmerged"));
    Ok(())
}

/// Project a changed entry into the staged/unstaged sections. X is the
/// index-vs-HEAD column, Y the worktree-vs-index column; a path with both
/// kinds of changes legitimately lands in both sections.
fn project_changed(x: ChangeType, y: ChangeType, path: &str, out: &mut ParsedStatus) {
    if x != ChangeType::Unmodified {
        out.staged.push(FileEntry::new(path, x.label()));
    }
    if y != ChangeType::Unmodified {
        out.unstaged.push(FileEntry::new(path, y.label()));
    }
}

/// Split the next single-space-separated field off the front of `rest`.
fn take_field<'a>(rest: &mut &'a str, name: &'static str) -> Result<&'a str, StatusParseError> {
    match rest.split_once(' ') {
        Some((field, tail)) if !field.is_empty() => {
            *rest = tail;
            Ok(field)
        }
        _ => Err(StatusParseError::MissingField(name)),
    }
}

fn parse_xy(field: &str) -> Result<(ChangeType, ChangeType), StatusParseError> {
    let mut chars = field.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(x), Some(y), None) => Ok((ChangeType::from_xy_char(x)?, ChangeType::from_xy_char(y)?)),
        _ => Err(StatusParseError::InvalidXy(field.to_string())),
    }
}

/// Rename/copy similarity score: `R` or `C` followed by a percentage.
fn validate_score(field: &str) -> Result<(), StatusParseError> {
    let valid = matches!(field.chars().next(), Some('R') | Some('C'))
        && field.len() > 1
        && field[1..].chars().all(|c| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(StatusParseError::InvalidScore(field.to_string()))
    }
}

// ── Branch listing ──

/// Parse `git branch --format=…` output: one tab-separated line per branch,
/// head marked with a leading `+`. Malformed lines are skipped.
fn parse_branches(raw: &str) -> Vec<BranchRef> {
    raw.lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            let [marker, objectname, refname, subject, upstream] = fields.as_slice() else {
                return None;
            };
            Some(BranchRef {
                is_head: marker.as_bytes().first() == Some(&b'+'),
                objectname: objectname.to_string(),
                refname: refname.to_string(),
                subject: subject.to_string(),
                upstream: upstream.to_string(),
            })
        })
        .collect()
}
