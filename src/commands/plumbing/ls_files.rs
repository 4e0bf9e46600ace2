use crate::areas::repository::Repository;
use anyhow::Context;
use std::io::Write;

impl Repository {
    pub fn ls_files(&mut self, stage: bool) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let manifest = self.index().read().context("failed to read the index")?;

        for entry in manifest.entries() {
            if stage {
                writeln!(
                    self.writer(),
                    "{} {} 0\t{}",
                    entry.entry_mode().as_str(),
                    entry.oid,
                    entry.path
                )?;
            } else {
                writeln!(self.writer(), "{}", entry.path)?;
            }
        }

        Ok(())
    }
}
