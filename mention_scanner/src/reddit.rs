//! Live [`ForumSource`] backed by the Reddit OAuth API.
//!
//! Authentication uses the application-only client-credentials grant; the token is
//! requested once when the source is created and reused for every call of the run.
//! All calls are blocking and nothing is retried: any failure ends the run.
use log::{debug, info};
use mention_common::net::{FORUM_AUTH_URL, LISTING_PAGE_SIZE, MORE_CHILDREN_BATCH, api_url};
use mention_common::{MentionError, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::collector::ForumSource;
use crate::config::ForumCredentials;
use crate::model::listing::{Listing, MoreChildrenResponse, TokenResponse, flatten_comment_tree};
use crate::model::post::{CommentBatch, MoreStub, Post};

/// Authenticated client for one channel scan.
pub struct RedditSource {
    client: Client,
    token: String,
}

impl RedditSource {
    /// Builds the HTTP client and obtains an access token.
    pub fn connect(credentials: &ForumCredentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(credentials.user_agent.clone())
            .build()
            .map_err(http_error)?;

        info!("Requesting forum access token");
        let token: TokenResponse = decode(
            client
                .post(FORUM_AUTH_URL)
                .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
                .form(&[("grant_type", "client_credentials")]),
        )?;
        debug!("Access token valid for {}s", token.expires_in);

        Ok(Self {
            client,
            token: token.access_token,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(api_url(path))
            .bearer_auth(&self.token)
            .query(&[("raw_json", "1")])
    }
}

impl ForumSource for RedditSource {
    fn new_posts(&mut self, channel: &str, limit: usize) -> Result<Vec<Post>> {
        let path = format!("/r/{}/new", channel);
        page_through(limit, |page_size, after| {
            let page_size = page_size.to_string();
            let mut request = self.get(&path).query(&[("limit", page_size.as_str())]);
            if let Some(cursor) = after {
                request = request.query(&[("after", cursor)]);
            }
            decode::<Listing>(request)?.into_posts()
        })
    }

    fn comment_tree(&mut self, post: &Post) -> Result<CommentBatch> {
        let listings: Vec<Listing> = decode(self.get(&format!("/comments/{}", post.id)))?;
        // First listing holds the post itself, second the comment forest.
        let comments = listings.into_iter().nth(1).ok_or_else(|| {
            MentionError::UnexpectedResponse(format!("post {} returned no comment listing", post.id))
        })?;
        flatten_comment_tree(comments.data.children)
    }

    fn expand_more(&mut self, post: &Post, stub: &MoreStub) -> Result<CommentBatch> {
        let link_id = post.fullname();
        let batch = expand_in_batches(&stub.children, |children| {
            let response: MoreChildrenResponse = decode(self.get("/api/morechildren").query(&[
                ("api_type", "json"),
                ("link_id", link_id.as_str()),
                ("children", children),
            ]))?;
            response.into_batch()
        })?;

        debug!(
            "Expanded {} hidden comments of post {}",
            batch.comments.len(),
            post.id
        );
        Ok(batch)
    }
}

/// Walks a paged listing until `limit` posts are gathered or the listing ends.
///
/// `fetch_page` receives the page size to request and the cursor of the previous
/// page, and returns the page's posts with the next cursor. The walk stops on a
/// missing cursor or an empty page.
pub fn page_through<F>(limit: usize, mut fetch_page: F) -> Result<Vec<Post>>
where
    F: FnMut(usize, Option<&str>) -> Result<(Vec<Post>, Option<String>)>,
{
    let mut posts: Vec<Post> = Vec::new();
    let mut after: Option<String> = None;

    while posts.len() < limit {
        let page_size = (limit - posts.len()).min(LISTING_PAGE_SIZE);
        let (page, next) = fetch_page(page_size, after.as_deref())?;
        debug!("Listing page with {} posts", page.len());
        let exhausted = page.is_empty();
        posts.extend(page);

        match next {
            Some(cursor) if !exhausted => after = Some(cursor),
            _ => break,
        }
    }

    posts.truncate(limit);
    Ok(posts)
}

/// Fetches the comments behind `children`, at most [`MORE_CHILDREN_BATCH`] ids per call.
///
/// `fetch` receives the comma-separated ids of one batch.
pub fn expand_in_batches<F>(children: &[String], mut fetch: F) -> Result<CommentBatch>
where
    F: FnMut(&str) -> Result<CommentBatch>,
{
    let mut batch = CommentBatch::default();
    for ids in children.chunks(MORE_CHILDREN_BATCH) {
        batch.extend(fetch(&ids.join(","))?);
    }
    Ok(batch)
}

/// Sends `request`, rejects non-success statuses and decodes the JSON body.
fn decode<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response: Response = request.send().map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        let url = response.url().clone();
        return Err(MentionError::Http(format!("{} returned {}", url, status)));
    }
    response.json::<T>().map_err(|e| {
        MentionError::UnexpectedResponse(format!("cannot decode forum response: {}", e))
    })
}

fn http_error(err: reqwest::Error) -> MentionError {
    MentionError::Http(err.to_string())
}
