//! Endpoints and fixed defaults of the forum and the object store.

/// Host that issues OAuth tokens for the forum API.
pub const FORUM_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
/// Base URL for authenticated forum API calls.
pub const FORUM_API_BASE: &str = "https://oauth.reddit.com";
/// Channel scanned when none is given.
pub const DEFAULT_CHANNEL: &str = "wallstreetbets";
/// Largest page the forum listing endpoints return.
pub const LISTING_PAGE_SIZE: usize = 100;
/// Most child ids accepted by one comment expansion request.
pub const MORE_CHILDREN_BATCH: usize = 100;

/// Bucket the report is published to.
pub const DEFAULT_BUCKET: &str = "wsb-pop-index";
/// Object key the report is published under.
pub const DEFAULT_OBJECT_KEY: &str = "wsbPopIndex.json";
/// Region used when `S3_REGION` is not set.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Content type of the published report.
pub const REPORT_CONTENT_TYPE: &str = "application/json";

/// Local file the report is written to before publishing.
pub const DEFAULT_REPORT_PATH: &str = "reddit_most_mentioned_stocks.json";
/// Curated ticker list read when no path is given.
pub const DEFAULT_TICKERS_PATH: &str = "curated_stock_tickers.txt";

/// Helper to build a forum API URL from a path like `/r/wallstreetbets/new`.
pub fn api_url(path: &str) -> String {
    format!("{}{}", FORUM_API_BASE, path)
}

/// Virtual-hosted-style host name of `bucket` in `region`.
pub fn bucket_host(bucket: &str, region: &str) -> String {
    format!("{}.s3.{}.amazonaws.com", bucket, region)
}
