use std::path::Path;

use crate::error::Result;

use super::runner::CommandRunner;

/// Arguments for `git pull origin <branch>`.
pub fn pull_args(branch: &str) -> [&str; 3] {
    ["pull", "origin", branch]
}

/// Fast-forward the checkout at `repo_path` from `origin/<branch>`.
pub async fn pull(runner: &dyn CommandRunner, repo_path: &Path, branch: &str) -> Result<()> {
    runner.run(repo_path, "git", &pull_args(branch)).await
}
