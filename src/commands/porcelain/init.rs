use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .git/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .git/refs/heads directory")?;

        // re-running init keeps whatever branch is checked out
        if !self.refs().head_path().exists() {
            self.refs()
                .set_head(DEFAULT_BRANCH)
                .context("Failed to create initial HEAD reference")?;
        }

        // create the index file if it does not exist
        let index_path = self.index().path().to_path_buf();
        if !index_path.exists() {
            fs::write(&index_path, b"").context("Failed to create .git/index file")?;
        }

        tracing::debug!(path = %self.git_path().display(), "initialized repository");
        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }
}
