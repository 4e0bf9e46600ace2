use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub fn hash_object(&mut self, object_path: &Path, kind: &str, write: bool) -> anyhow::Result<()> {
        let kind = ObjectType::try_from(kind)?;

        // read object file
        let object_path = self.relative_to_worktree(object_path)?;
        let data = self
            .workspace()
            .read_file(&object_path)
            .with_context(|| format!("cannot hash {}", object_path.display()))?;
        let object = Object::new(kind, data);

        // write (if write is true) as compressed object file
        let object_id = if write {
            self.database()
                .store_object(&object)
                .context("failed to write object")?
        } else {
            object.object_id()
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
