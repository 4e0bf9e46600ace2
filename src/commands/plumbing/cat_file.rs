use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::TreeListing;
use anyhow::Context;
use std::io::Write;

/// What `cat-file` reports about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// Content, with trees rendered one record per line
    Pretty,
    Type,
    Size,
}

impl Repository {
    pub fn cat_file(&mut self, prefix: &str, mode: CatFileMode) -> anyhow::Result<()> {
        let object = self
            .database()
            .get(prefix)
            .with_context(|| format!("cannot read object {prefix}"))?;

        match mode {
            CatFileMode::Type => writeln!(self.writer(), "{}", object.kind())?,
            CatFileMode::Size => writeln!(self.writer(), "{}", object.size())?,
            CatFileMode::Pretty => match object.kind() {
                ObjectType::Tree => {
                    let listing = TreeListing::deserialize(&object.payload()[..])?;
                    write!(self.writer(), "{listing}")?;
                }
                ObjectType::Blob | ObjectType::Commit => {
                    self.writer().write_all(object.payload())?;
                }
            },
        }

        Ok(())
    }
}
