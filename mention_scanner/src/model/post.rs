//! Forum entities consumed by the collector.
//!
//! All of them are read-only snapshots of what the forum returned; nothing here is
//! ever sent back.
use chrono::{DateTime, Utc};

/// A submission in the scanned channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Short id, e.g. `1b6ipzq`.
    pub id: String,
    pub title: String,
    /// Creation instant as reported by the source, before any offset is applied.
    pub created: DateTime<Utc>,
}

impl Post {
    /// Type-prefixed id the forum expects when a post is referenced (`t3_<id>`).
    pub fn fullname(&self) -> String {
        format!("t3_{}", self.id)
    }
}

/// A single comment. Deleted comments may come without a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub body: Option<String>,
}

impl Comment {
    /// Body text when present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }
}

/// Placeholder for comments the forum collapsed out of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoreStub {
    /// Number of comments the forum says are hidden behind the stub.
    pub count: u64,
    /// Ids of the hidden top-level children of the stub.
    pub children: Vec<String>,
}

/// Comments and stubs returned by one forum call, in breadth-first order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBatch {
    pub comments: Vec<Comment>,
    pub more: Vec<MoreStub>,
}

impl CommentBatch {
    /// Appends `other` after the items already in the batch.
    pub fn extend(&mut self, other: CommentBatch) {
        self.comments.extend(other.comments);
        self.more.extend(other.more);
    }
}
