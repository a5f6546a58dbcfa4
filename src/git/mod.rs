mod cmd;
mod status;

pub use cmd::{commit_interactive, get_repo_root, push, stage_paths, unstage_paths};
pub use status::{list_branches, load_status, FileEntry, RepoState};
