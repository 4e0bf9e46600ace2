use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use anyhow::Context;
use std::collections::BTreeSet;
use std::path::PathBuf;

impl Repository {
    /// Stage the given paths
    ///
    /// Directories expand to the files below them. Tracked files under a
    /// given path that are no longer regular files in the working tree are
    /// unstaged, so `add .` records deletions as well. Everything is applied
    /// in one index rewrite.
    pub fn add(&mut self, paths: &[PathBuf]) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let manifest = self.index().read().context("failed to read the index")?;

        let mut to_stage = BTreeSet::new();
        let mut to_unstage = BTreeSet::new();

        for path in paths {
            let path = self.relative_to_worktree(path)?;
            let prefix = Workspace::index_key(&path)?;

            let deleted = manifest
                .entries()
                .filter(|entry| Self::is_under(&entry.path, &prefix))
                .map(|entry| PathBuf::from(&entry.path))
                .filter(|tracked| !self.workspace().is_file(tracked))
                .collect::<Vec<_>>();

            if self.workspace().exists(&path) {
                to_stage.extend(self.workspace().list_files(&path)?);
            } else if deleted.is_empty() {
                anyhow::bail!(
                    "pathspec '{}' did not match any files",
                    path.display()
                );
            }
            to_unstage.extend(deleted);
        }

        let to_stage = to_stage.into_iter().collect::<Vec<_>>();
        let to_unstage = to_unstage.into_iter().collect::<Vec<_>>();

        let (staged, unstaged) = self
            .index()
            .update(self.workspace(), self.database(), &to_stage, &to_unstage)
            .context("failed to update the index")?;

        tracing::debug!(
            staged = staged.len(),
            unstaged = unstaged.len(),
            "updated index"
        );

        Ok(())
    }

    /// Whether an index key lies at or below `prefix` (empty prefix: root)
    fn is_under(key: &str, prefix: &str) -> bool {
        prefix.is_empty()
            || key == prefix
            || key
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}
