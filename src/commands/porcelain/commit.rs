use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::io::Write;

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let message = message.trim().to_string();
        if message.is_empty() {
            anyhow::bail!("aborting commit due to empty commit message");
        }

        let tree_id = self.store_index_tree()?;
        let parent = self.refs().read_head()?;
        if let Some(parent) = &parent {
            self.load_commit(parent)?;
        }
        let is_root = match parent {
            Some(_) => "",
            None => " (root-commit)",
        };

        let author = Author::load_from_env().context("cannot determine the commit author")?;

        let commit = Commit::new(parent, tree_id, author, message);
        let commit_id = self
            .database()
            .store(&commit)
            .context("failed to store the commit")?;
        self.refs().update_head(&commit_id)?;

        let branch = self.refs().current_branch()?;
        writeln!(
            self.writer(),
            "[{}{} {}] {}",
            branch,
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }

    /// Read back a stored commit, failing if `oid` names another kind of object
    pub(crate) fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        let object = self
            .database()
            .load(oid)
            .with_context(|| format!("cannot read commit {oid}"))?;
        if object.kind() != ObjectType::Commit {
            anyhow::bail!("{oid} is a {}, not a commit", object.kind());
        }

        let commit = Commit::deserialize(&object.payload()[..])
            .with_context(|| format!("cannot parse commit {oid}"))?;
        tracing::debug!(%oid, subject = commit.short_message(), "loaded commit");

        Ok(commit)
    }
}
