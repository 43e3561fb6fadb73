//! Upload of the report file to public object storage.
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use mention_common::net::{REPORT_CONTENT_TYPE, bucket_host};
use mention_common::{MentionError, Result};
use reqwest::blocking::Client;

use crate::config::StorageCredentials;
use crate::signing::{CanonicalRequest, SigningKey, amz_date, sha256_hex, uri_encode_path};

/// Canned ACL making the object world-readable.
const PUBLIC_READ: &str = "public-read";

/// Writes one object to a fixed bucket/key.
pub struct S3Publisher<'a> {
    client: Client,
    credentials: &'a StorageCredentials,
    bucket: String,
    key: String,
}

impl<'a> S3Publisher<'a> {
    pub fn new(credentials: &'a StorageCredentials, bucket: &str, key: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| MentionError::Http(e.to_string()))?;
        Ok(Self {
            client,
            credentials,
            bucket: bucket.to_string(),
            key: key.trim_start_matches('/').to_string(),
        })
    }

    fn host(&self) -> String {
        bucket_host(&self.bucket, &self.credentials.region)
    }

    /// Signed headers for uploading `body` at `now`, `authorization` last.
    pub fn signed_headers(&self, body: &[u8], now: DateTime<Utc>) -> Result<Vec<(&'static str, String)>> {
        let path = format!("/{}", self.key);
        let mut headers = vec![
            ("content-type", REPORT_CONTENT_TYPE.to_string()),
            ("host", self.host()),
            ("x-amz-acl", PUBLIC_READ.to_string()),
            ("x-amz-content-sha256", sha256_hex(body)),
            ("x-amz-date", amz_date(now)),
        ];

        let request = CanonicalRequest {
            method: "PUT",
            path: &path,
            headers: headers.clone(),
            payload_sha256: sha256_hex(body),
        };
        let key = SigningKey {
            access_key: &self.credentials.access_key,
            secret_key: &self.credentials.secret_key,
            region: &self.credentials.region,
        };
        headers.push(("authorization", request.authorization(&key, now)?));
        Ok(headers)
    }

    /// Uploads the file at `path` as the report object.
    pub fn publish(&self, path: &Path) -> Result<()> {
        let body = fs::read(path)?;
        let url = format!("https://{}/{}", self.host(), uri_encode_path(&self.key));

        let mut request = self.client.put(&url);
        for (name, value) in self.signed_headers(&body, Utc::now())? {
            // reqwest derives Host from the URL.
            if name != "host" {
                request = request.header(name, value);
            }
        }

        let response = request
            .body(body)
            .send()
            .map_err(|e| MentionError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(MentionError::Publish(format!(
                "PUT {} returned {}: {}",
                url, status, detail
            )));
        }

        info!("Published {} to s3://{}/{}", path.display(), self.bucket, self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn credentials() -> StorageCredentials {
        StorageCredentials {
            access_key: "AKIDEXAMPLE".to_string(),
            secret_key: "secret".to_string(),
            region: "us-east-1".to_string(),
        }
    }

    #[test]
    fn signs_public_json_upload() {
        let credentials = credentials();
        let publisher = S3Publisher::new(&credentials, "wsb-pop-index", "wsbPopIndex.json").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 2, 15, 0).unwrap();

        let headers = publisher.signed_headers(br#"{"posts":0}"#, now).unwrap();
        let value = |name: &str| {
            headers
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, value)| value.as_str())
        };

        assert_eq!(value("content-type"), Some("application/json"));
        assert_eq!(value("x-amz-acl"), Some("public-read"));
        assert_eq!(value("host"), Some("wsb-pop-index.s3.us-east-1.amazonaws.com"));
        assert_eq!(value("x-amz-date"), Some("20240305T021500Z"));
        let authorization = value("authorization").unwrap();
        assert!(authorization.contains(
            "SignedHeaders=content-type;host;x-amz-acl;x-amz-content-sha256;x-amz-date"
        ));
    }

    #[test]
    fn publish_fails_for_missing_file() {
        let credentials = credentials();
        let publisher = S3Publisher::new(&credentials, "wsb-pop-index", "wsbPopIndex.json").unwrap();
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            publisher.publish(&dir.path().join("missing.json")),
            Err(MentionError::Io(_))
        ));
    }
}
