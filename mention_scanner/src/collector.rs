//! Collection stage: recent posts and their comments, folded into one corpus.
//!
//! The collector only decides *what* is collected (age filter, bounded comment
//! expansion, corpus assembly). Talking to the forum is delegated to a
//! [`ForumSource`], so the same logic runs against the live API and against canned
//! data in tests.
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info};
use mention_common::net::DEFAULT_CHANNEL;
use mention_common::{Corpus, Result};

use crate::model::post::{CommentBatch, MoreStub, Post};

/// Access to a forum channel.
pub trait ForumSource {
    /// Up to `limit` newest posts of `channel`, newest first.
    fn new_posts(&mut self, channel: &str, limit: usize) -> Result<Vec<Post>>;

    /// The comment tree of `post` as first served, collapsed stubs included.
    fn comment_tree(&mut self, post: &Post) -> Result<CommentBatch>;

    /// The comments hidden behind one stub of `post`'s tree.
    fn expand_more(&mut self, post: &Post, stub: &MoreStub) -> Result<CommentBatch>;
}

/// Knobs of one collection run.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub channel: String,
    /// Posts at least this old are ignored.
    pub lookback: TimeDelta,
    /// Newest posts examined before the age filter.
    pub max_candidates: usize,
    /// Stubs expanded per post; the rest of the collapsed comments are dropped.
    pub replace_more_limit: usize,
    /// Subtracted from the source's creation time to bring it to UTC.
    pub created_offset: TimeDelta,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            lookback: TimeDelta::hours(24),
            max_candidates: 900,
            replace_more_limit: 1,
            created_offset: TimeDelta::zero(),
        }
    }
}

/// Output of the collection stage.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub corpus: Corpus,
    pub post_count: usize,
    pub comment_count: usize,
}

/// Returns `true` if a post created at `created` is strictly younger than `lookback`.
pub fn is_recent(
    created: DateTime<Utc>,
    now: DateTime<Utc>,
    lookback: TimeDelta,
    created_offset: TimeDelta,
) -> bool {
    let age = now - (created - created_offset);
    age < lookback
}

/// Gathers the corpus of one channel through a [`ForumSource`].
pub struct Collector<S: ForumSource> {
    source: S,
    settings: CollectorSettings,
}

impl<S: ForumSource> Collector<S> {
    pub fn new(source: S, settings: CollectorSettings) -> Self {
        Self { source, settings }
    }

    /// Runs the collection relative to `now`.
    pub fn collect(&mut self, now: DateTime<Utc>) -> Result<Collection> {
        let candidates = self
            .source
            .new_posts(&self.settings.channel, self.settings.max_candidates)?;
        let examined = candidates.len();

        let recent: Vec<Post> = candidates
            .into_iter()
            .filter(|post| {
                is_recent(
                    post.created,
                    now,
                    self.settings.lookback,
                    self.settings.created_offset,
                )
            })
            .collect();
        info!(
            "{} of {} newest posts in r/{} are recent",
            recent.len(),
            examined,
            self.settings.channel
        );

        let mut collection = Collection {
            post_count: recent.len(),
            ..Collection::default()
        };

        for post in &recent {
            collection.corpus.push_segment(&post.title);

            let batch = self.expanded_comments(post)?;
            for text in batch.comments.iter().filter_map(|comment| comment.text()) {
                collection.comment_count += 1;
                collection.corpus.push_segment(text);
            }
        }

        info!(
            "Collected {} posts and {} comments ({} bytes of text)",
            collection.post_count,
            collection.comment_count,
            collection.corpus.len()
        );
        Ok(collection)
    }

    /// Comment tree of `post` with at most `replace_more_limit` stubs expanded.
    ///
    /// Stubs are expanded largest first; stubs revealed by an expansion compete with
    /// the ones already pending. Stubs without child ids cannot be expanded through
    /// the batch endpoint and are dropped.
    fn expanded_comments(&mut self, post: &Post) -> Result<CommentBatch> {
        let tree = self.source.comment_tree(post)?;
        let mut comments = tree.comments;
        let mut pending: Vec<MoreStub> = expandable(tree.more);
        let mut expansions = 0;

        while expansions < self.settings.replace_more_limit {
            pending.sort_by_key(|stub| stub.count);
            let Some(stub) = pending.pop() else {
                break;
            };

            let revealed = self.source.expand_more(post, &stub)?;
            comments.extend(revealed.comments);
            pending.extend(expandable(revealed.more));
            expansions += 1;
        }

        if !pending.is_empty() {
            let hidden: u64 = pending.iter().map(|stub| stub.count).sum();
            debug!(
                "Post {}: {} collapsed threads (~{} comments) left unexpanded",
                post.id,
                pending.len(),
                hidden
            );
        }

        Ok(CommentBatch {
            comments,
            more: pending,
        })
    }
}

fn expandable(stubs: Vec<MoreStub>) -> Vec<MoreStub> {
    stubs
        .into_iter()
        .filter(|stub| !stub.children.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::post::Comment;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
    }

    fn post(id: &str, title: &str, age: TimeDelta) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            created: now() - age,
        }
    }

    fn comments(bodies: &[&str]) -> Vec<Comment> {
        bodies
            .iter()
            .map(|body| Comment {
                body: Some(body.to_string()),
            })
            .collect()
    }

    fn stub(count: u64, id: &str) -> MoreStub {
        MoreStub {
            count,
            children: vec![id.to_string()],
        }
    }

    /// Canned forum: posts, one tree per post id, one expansion per stub child id.
    #[derive(Default)]
    struct FakeForum {
        posts: Vec<Post>,
        trees: HashMap<String, CommentBatch>,
        expansions: HashMap<String, CommentBatch>,
        expanded: Vec<String>,
        requested_limit: Option<usize>,
    }

    impl ForumSource for FakeForum {
        fn new_posts(&mut self, _channel: &str, limit: usize) -> Result<Vec<Post>> {
            self.requested_limit = Some(limit);
            Ok(self.posts.iter().take(limit).cloned().collect())
        }

        fn comment_tree(&mut self, post: &Post) -> Result<CommentBatch> {
            Ok(self.trees.get(&post.id).cloned().unwrap_or_default())
        }

        fn expand_more(&mut self, _post: &Post, stub: &MoreStub) -> Result<CommentBatch> {
            let key = stub.children[0].clone();
            self.expanded.push(key.clone());
            Ok(self.expansions.get(&key).cloned().unwrap_or_default())
        }
    }

    #[test]
    fn age_filter_is_strict() {
        let lookback = TimeDelta::hours(24);
        let offset = TimeDelta::zero();

        assert!(!is_recent(now() - TimeDelta::hours(24), now(), lookback, offset));
        // 23.99 hours.
        assert!(is_recent(now() - TimeDelta::seconds(86_364), now(), lookback, offset));
    }

    #[test]
    fn offset_shifts_creation_time() {
        let created = now() - TimeDelta::hours(20);
        let offset = TimeDelta::hours(8);
        assert!(!is_recent(created, now(), TimeDelta::hours(24), offset));
    }

    #[test]
    fn collects_recent_posts_and_non_empty_comments() {
        let mut forum = FakeForum {
            posts: vec![
                post("new", "GME squeeze", TimeDelta::hours(1)),
                post("quiet", "No comments here", TimeDelta::hours(5)),
                post("old", "Yesterday's TSLA", TimeDelta::hours(30)),
            ],
            ..FakeForum::default()
        };
        let mut tree = CommentBatch {
            comments: comments(&["$GME", "", "hold"]),
            more: vec![],
        };
        tree.comments.push(Comment { body: None });
        forum.trees.insert("new".to_string(), tree);
        forum
            .trees
            .insert("old".to_string(), CommentBatch { comments: comments(&["TSLA"]), more: vec![] });

        let mut collector = Collector::new(forum, CollectorSettings::default());
        let collection = collector.collect(now()).unwrap();

        assert_eq!(collection.post_count, 2);
        assert_eq!(collection.comment_count, 2);
        assert_eq!(
            collection.corpus.as_str(),
            "GME squeeze\n$GME\nhold\nNo comments here"
        );
    }

    #[test]
    fn passes_candidate_ceiling_to_source() {
        let forum = FakeForum {
            posts: vec![post("a", "A", TimeDelta::hours(1))],
            ..FakeForum::default()
        };
        let settings = CollectorSettings {
            max_candidates: 25,
            ..CollectorSettings::default()
        };
        let mut collector = Collector::new(forum, settings);
        let collection = collector.collect(now()).unwrap();

        assert_eq!(collection.post_count, 1);
        assert_eq!(collector.source.requested_limit, Some(25));
    }

    #[test]
    fn expands_largest_stubs_up_to_the_limit() {
        let mut forum = FakeForum {
            posts: vec![post("p", "title", TimeDelta::hours(2))],
            ..FakeForum::default()
        };
        forum.trees.insert(
            "p".to_string(),
            CommentBatch {
                comments: comments(&["top"]),
                more: vec![stub(3, "small"), stub(50, "large"), MoreStub { count: 0, children: vec![] }],
            },
        );
        forum.expansions.insert(
            "large".to_string(),
            CommentBatch {
                comments: comments(&["from large"]),
                more: vec![stub(80, "deeper")],
            },
        );
        forum
            .expansions
            .insert("deeper".to_string(), CommentBatch { comments: comments(&["from deeper"]), more: vec![] });
        forum
            .expansions
            .insert("small".to_string(), CommentBatch { comments: comments(&["from small"]), more: vec![] });

        let settings = CollectorSettings {
            replace_more_limit: 2,
            ..CollectorSettings::default()
        };
        let mut collector = Collector::new(forum, settings);
        let collection = collector.collect(now()).unwrap();

        assert_eq!(collector.source.expanded, vec!["large", "deeper"]);
        assert_eq!(collection.comment_count, 3);
        assert!(!collection.corpus.as_str().contains("from small"));
    }

    #[test]
    fn zero_limit_skips_expansion() {
        let mut forum = FakeForum {
            posts: vec![post("p", "title", TimeDelta::hours(2))],
            ..FakeForum::default()
        };
        forum.trees.insert(
            "p".to_string(),
            CommentBatch {
                comments: comments(&["top"]),
                more: vec![stub(10, "hidden")],
            },
        );

        let settings = CollectorSettings {
            replace_more_limit: 0,
            ..CollectorSettings::default()
        };
        let mut collector = Collector::new(forum, settings);
        let collection = collector.collect(now()).unwrap();

        assert!(collector.source.expanded.is_empty());
        assert_eq!(collection.comment_count, 1);
    }
}
