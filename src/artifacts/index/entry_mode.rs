use is_executable::IsExecutable;
use std::path::Path;

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

/// Modes that appear in index entries and tree records
#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
pub enum EntryMode {
    File(FileMode),
    Directory,
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    /// Normalise a working-tree file to one of the two file modes
    pub fn of_file(path: &Path) -> Self {
        if path.is_executable() {
            EntryMode::File(FileMode::Executable)
        } else {
            EntryMode::File(FileMode::Regular)
        }
    }

    /// Octal form used inside tree payloads (no leading zero)
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::Directory => "40000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::Directory => 0o40000,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// Classify a raw mode read from disk; anything that is not a directory
    /// or executable counts as a regular file
    pub fn from_u32(mode: u32) -> Self {
        match mode & 0o170000 {
            0o040000 => EntryMode::Directory,
            _ if mode & 0o111 != 0 => EntryMode::File(FileMode::Executable),
            _ => EntryMode::File(FileMode::Regular),
        }
    }
}
