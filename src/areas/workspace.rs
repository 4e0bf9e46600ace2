use crate::artifacts::index::index_entry::EntryMetadata;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".git", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).exists()
    }

    pub fn is_file(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    /// Expand a path into the files below it, relative to the workspace root
    ///
    /// A file expands to itself. The result is sorted and never contains
    /// anything under `.git`.
    pub fn list_files(&self, root_file_path: &Path) -> Result<Vec<PathBuf>> {
        let root_file_path = self.path.join(root_file_path);

        if !root_file_path.exists() {
            return Err(Error::NotFound(format!(
                "path {} in the working tree",
                root_file_path.display()
            )));
        }

        let mut files = if root_file_path.is_dir() {
            WalkDir::new(&root_file_path)
                .into_iter()
                .filter_entry(|entry| !Self::is_ignored_name(entry.file_name()))
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .filter_map(|entry| self.relative_path(entry.path()))
                .collect::<Vec<_>>()
        } else {
            self.relative_path(&root_file_path).into_iter().collect()
        };
        files.sort();

        Ok(files)
    }

    pub fn read_file(&self, file_path: &Path) -> Result<Bytes> {
        let file_path = self.path.join(file_path);
        let content = std::fs::read(&file_path).map_err(Self::missing_or_storage(&file_path))?;

        Ok(Bytes::from(content))
    }

    /// Stat a regular file, normalising its mode
    pub fn stat_file(&self, file_path: &Path) -> Result<EntryMetadata> {
        let file_path = self.path.join(file_path);
        let metadata =
            std::fs::metadata(&file_path).map_err(Self::missing_or_storage(&file_path))?;

        if !metadata.is_file() {
            return Err(Error::NotFound(format!(
                "regular file {}",
                file_path.display()
            )));
        }

        Ok(EntryMetadata::from_file(&file_path, &metadata))
    }

    /// Index key for a workspace path: relative, `/`-separated
    pub fn index_key(file_path: &Path) -> Result<String> {
        let components = file_path
            .components()
            .filter(|component| !matches!(component, Component::CurDir))
            .map(|component| match component {
                Component::Normal(name) => name
                    .to_str()
                    .ok_or_else(|| Error::MalformedIndex(format!("{file_path:?} is not UTF-8"))),
                _ => Err(Error::MalformedIndex(format!(
                    "{} is not relative to the working tree",
                    file_path.display()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(components.join("/"))
    }

    fn is_ignored_name(name: &std::ffi::OsStr) -> bool {
        IGNORED_PATHS.contains(&name.to_string_lossy().as_ref())
    }

    fn relative_path(&self, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(self.path.as_ref())
            .ok()
            .map(Path::to_path_buf)
    }

    fn missing_or_storage(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
        move |source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("file {} in the working tree", path.display()))
            } else {
                Error::StorageError {
                    path: path.to_path_buf(),
                    source,
                }
            }
        }
    }
}
