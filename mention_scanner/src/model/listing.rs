//! JSON wire format of the forum API.
//!
//! Responses are listings of "things", each tagged with a `kind` (`t3` for posts,
//! `t1` for comments, `more` for collapsed stubs) and carrying its fields under
//! `data`. Things are decoded in two steps: the envelope first, then the payload once
//! the kind is known, so unknown kinds can be skipped instead of failing the run.
use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use log::debug;
use mention_common::{MentionError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::model::post::{Comment, CommentBatch, MoreStub, Post};

const KIND_POST: &str = "t3";
const KIND_COMMENT: &str = "t1";
const KIND_MORE: &str = "more";

/// Body of a successful OAuth token request.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

/// A page of things.
#[derive(Debug, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingData {
    /// Cursor of the next page, absent on the last one.
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub children: Vec<RawThing>,
}

/// Kind-tagged envelope whose payload is decoded lazily.
#[derive(Debug, Deserialize)]
pub struct RawThing {
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RawThing {
    fn payload<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.data).map_err(|e| {
            MentionError::UnexpectedResponse(format!("malformed {} thing: {}", self.kind, e))
        })
    }
}

#[derive(Debug, Deserialize)]
struct LinkData {
    id: String,
    #[serde(default)]
    title: String,
    created_utc: f64,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    replies: Option<Replies>,
}

/// `replies` is either a nested listing or an empty string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Replies {
    Listing(Listing),
    Empty(#[allow(dead_code)] String),
}

#[derive(Debug, Deserialize)]
struct MoreData {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    children: Vec<String>,
}

/// Response of the comment expansion endpoint.
#[derive(Debug, Deserialize)]
pub struct MoreChildrenResponse {
    pub json: MoreChildrenBody,
}

#[derive(Debug, Deserialize)]
pub struct MoreChildrenBody {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    #[serde(default)]
    pub data: Option<MoreChildrenData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MoreChildrenData {
    #[serde(default)]
    pub things: Vec<RawThing>,
}

impl MoreChildrenResponse {
    /// Flattens the returned things, failing if the forum reported errors.
    pub fn into_batch(self) -> Result<CommentBatch> {
        if !self.json.errors.is_empty() {
            return Err(MentionError::UnexpectedResponse(format!(
                "comment expansion failed: {:?}",
                self.json.errors
            )));
        }
        flatten_comment_tree(self.json.data.unwrap_or_default().things)
    }
}

impl Listing {
    /// Posts on this page, in listing order, and the cursor of the next page.
    pub fn into_posts(self) -> Result<(Vec<Post>, Option<String>)> {
        let ListingData { after, children } = self.data;
        let mut posts = Vec::with_capacity(children.len());

        for thing in children {
            if thing.kind != KIND_POST {
                debug!("Skipping {} thing in post listing", thing.kind);
                continue;
            }
            let link: LinkData = thing.payload()?;
            posts.push(Post {
                created: timestamp_from_epoch(link.created_utc)?,
                id: link.id,
                title: link.title,
            });
        }
        Ok((posts, after))
    }
}

/// Walks a comment forest breadth-first, collecting comments and stubs.
pub fn flatten_comment_tree(children: Vec<RawThing>) -> Result<CommentBatch> {
    let mut batch = CommentBatch::default();
    let mut queue: VecDeque<RawThing> = children.into();

    while let Some(thing) = queue.pop_front() {
        match thing.kind.as_str() {
            KIND_COMMENT => {
                let comment: CommentData = thing.payload()?;
                if let Some(Replies::Listing(replies)) = comment.replies {
                    queue.extend(replies.data.children);
                }
                batch.comments.push(Comment { body: comment.body });
            }
            KIND_MORE => {
                let more: MoreData = thing.payload()?;
                batch.more.push(MoreStub {
                    count: more.count,
                    children: more.children,
                });
            }
            other => debug!("Skipping {} thing in comment tree", other),
        }
    }
    Ok(batch)
}

fn timestamp_from_epoch(seconds: f64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64).ok_or_else(|| {
        MentionError::UnexpectedResponse(format!("creation time {} out of range", seconds))
    })
}
