use crate::areas::repository::Repository;
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;

impl Repository {
    /// Unstage files that were deleted from the working tree
    pub fn rm(&mut self, paths: &[PathBuf]) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let paths = paths
            .iter()
            .map(|path| self.relative_to_worktree(path))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let removed = self
            .index()
            .unstage_all(self.workspace(), &paths)
            .context("failed to unstage files")?;

        for entry in removed {
            writeln!(self.writer(), "rm '{}'", entry.path)?;
        }

        Ok(())
    }
}
