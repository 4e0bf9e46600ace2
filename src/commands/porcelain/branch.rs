use crate::areas::repository::Repository;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Create a branch at the current commit, or list branches when no
    /// name is given
    pub fn branch(&mut self, branch_name: Option<&str>) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        match branch_name {
            Some(name) => {
                let tip = self
                    .refs()
                    .create_branch(name)
                    .with_context(|| format!("cannot create branch {name}"))?;
                tracing::debug!(branch = name, %tip, "created branch");
            }
            None => self.list_branches()?,
        }

        Ok(())
    }

    fn list_branches(&self) -> anyhow::Result<()> {
        let current = self.refs().current_branch()?;

        for branch in self.refs().list_branches()? {
            // an unborn current branch has no file yet and is not listed
            let marker = if branch == current { "*" } else { " " };
            writeln!(self.writer(), "{marker} {branch}")?;
        }

        Ok(())
    }
}
