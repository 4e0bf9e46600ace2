use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectPayload;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use std::io::Write;

impl Repository {
    pub fn write_tree(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let tree_id = self.store_index_tree()?;

        writeln!(self.writer(), "{tree_id}")?;

        Ok(())
    }

    /// Store one tree object per staged directory, children first, and
    /// return the root tree ID
    pub(crate) fn store_index_tree(&self) -> anyhow::Result<ObjectId> {
        let manifest = self.index().read().context("failed to read the index")?;

        let tree = Tree::build(manifest.entries())?;
        tree.traverse(&mut |tree: &Tree| self.database().store(tree).map(|_| ()))
            .context("failed to store tree objects")?;

        Ok(tree.object_id()?)
    }
}
