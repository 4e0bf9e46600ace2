use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Name of the repository directory inside the working tree
pub const GIT_DIR: &str = ".git";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Index,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open the repository whose working tree is `path`, creating the
    /// directory if needed
    ///
    /// Nothing inside `.git` is touched until a command runs.
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("failed to create directory {}", path.display()))?;
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", path.display()))?;
        let git_path = path.join(GIT_DIR);

        let index = Index::new(git_path.join("index").into_boxed_path());
        let database = Database::new(git_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(git_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index,
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> Box<Path> {
        self.path.join(GIT_DIR).into_boxed_path()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Fail early with a readable message outside of a repository
    pub(crate) fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.refs.head_path().is_file() {
            anyhow::bail!(
                "not a repository: {} (run `plumb init` first)",
                self.path.display()
            );
        }

        Ok(())
    }

    /// Convert a user-supplied path into one relative to the working tree
    pub(crate) fn relative_to_worktree(&self, path: &Path) -> anyhow::Result<std::path::PathBuf> {
        if path.is_absolute() {
            let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            return resolved
                .strip_prefix(&self.path)
                .map(Path::to_path_buf)
                .with_context(|| {
                    format!("{} is outside the working tree", path.display())
                });
        }

        Ok(path.to_path_buf())
    }
}
