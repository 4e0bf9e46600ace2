//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands compose the object store, the index and the refs into
//! everyday workflows.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files (and drop deleted ones) for commit
//! - `rm`: Unstage files deleted from the working tree
//! - `status`: Compare the working tree with the index
//! - `commit`: Create a new commit from the index
//! - `branch`: Create or list branches

pub mod add;
pub mod branch;
pub mod commit;
pub mod init;
pub mod rm;
pub mod status;
