//! Commit objects
//!
//! ## Format
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>            (absent for a root commit)
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{ObjectPayload, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::BufRead;

/// Author or committer identity with a timezone-aware timestamp
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Load the identity from `GIT_AUTHOR_NAME`, `GIT_AUTHOR_EMAIL` and the
    /// optional `GIT_AUTHOR_DATE`; the current time is used when no date is set
    pub fn load_from_env() -> Result<Self> {
        let name = std::env::var("GIT_AUTHOR_NAME")
            .map_err(|_| Error::MissingIdentity("GIT_AUTHOR_NAME"))?;
        let email = std::env::var("GIT_AUTHOR_EMAIL")
            .map_err(|_| Error::MissingIdentity("GIT_AUTHOR_EMAIL"))?;
        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }

    /// `Name <email> <unix seconds> <±hhmm>`
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let malformed = || Error::MalformedObject(format!("invalid identity {value:?}"));

        let (name, rest) = value.split_once(" <").ok_or_else(malformed)?;
        let (email, rest) = rest.split_once("> ").ok_or_else(malformed)?;
        let timestamp = chrono::DateTime::parse_from_str(rest.trim(), "%s %z")
            .map_err(|_| malformed())?;

        Ok(Author::new_with_timestamp(
            name.to_string(),
            email.to_string(),
            timestamp,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.clone());

        let mut content = lines.join("\n");
        if !content.ends_with('\n') {
            content.push('\n');
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|_| Error::MalformedObject("commit is not valid UTF-8".to_string()))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| Error::MalformedObject("commit lacks a message".to_string()))?;

        let mut tree_oid = None;
        let mut parent = None;
        let mut author = None;
        let mut committer = None;

        for line in headers.lines() {
            match line.split_once(' ') {
                Some(("tree", oid)) => tree_oid = Some(ObjectId::try_parse(oid.to_string())?),
                Some(("parent", oid)) => parent = Some(ObjectId::try_parse(oid.to_string())?),
                Some(("author", ident)) => author = Some(Author::try_from(ident)?),
                Some(("committer", ident)) => committer = Some(Author::try_from(ident)?),
                _ => {
                    return Err(Error::MalformedObject(format!(
                        "unexpected commit header {line:?}"
                    )));
                }
            }
        }

        let missing = |field: &str| Error::MalformedObject(format!("commit lacks {field}"));
        let author = author.ok_or_else(|| missing("author"))?;

        Ok(Commit {
            parent,
            tree_oid: tree_oid.ok_or_else(|| missing("tree"))?,
            committer: committer.unwrap_or_else(|| author.clone()),
            author,
            message: message.trim_end_matches('\n').to_string(),
        })
    }
}

impl ObjectPayload for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
