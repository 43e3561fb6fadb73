//! AWS Signature Version 4 for single-object uploads.
//!
//! Only what a `PUT` of one object needs: no query string, no chunked payloads.
//! Header names passed in must already be lowercase.
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use mention_common::{MentionError, Result};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
/// Service name of the object store.
pub const SERVICE: &str = "s3";

/// Access key pair and region a request is signed for.
pub struct SigningKey<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub region: &'a str,
}

/// Request parts covered by the signature.
pub struct CanonicalRequest<'a> {
    pub method: &'a str,
    /// Absolute path, not yet URI-encoded.
    pub path: &'a str,
    /// `(name, value)` pairs, `host` included.
    pub headers: Vec<(&'a str, String)>,
    pub payload_sha256: String,
}

/// Lowercase hex SHA-256 of `payload`.
pub fn sha256_hex(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    format!("{:x}", hasher.finalize())
}

/// `x-amz-date` value, e.g. `20240305T021500Z`.
pub fn amz_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

fn hmac(key: &[u8], data: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| MentionError::Publish(format!("signing key rejected: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derives the per-day signing key `kSigning`.
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    let k_date = hmac(format!("AWS4{}", secret_key).as_bytes(), date)?;
    let k_region = hmac(&k_date, region)?;
    let k_service = hmac(&k_region, service)?;
    hmac(&k_service, "aws4_request")
}

/// Percent-encodes a path the way S3 expects: unreserved characters and `/` stay.
pub fn uri_encode_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

impl CanonicalRequest<'_> {
    fn sorted_headers(&self) -> Vec<(&str, &str)> {
        let mut headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| (*name, value.trim()))
            .collect();
        headers.sort_by(|a, b| a.0.cmp(b.0));
        headers
    }

    /// `;`-joined sorted header names.
    pub fn signed_headers(&self) -> String {
        self.sorted_headers()
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Canonical request string as defined by SigV4.
    pub fn canonical_string(&self) -> String {
        let canonical_headers: String = self
            .sorted_headers()
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();

        format!(
            "{}\n{}\n\n{}\n{}\n{}",
            self.method,
            uri_encode_path(self.path),
            canonical_headers,
            self.signed_headers(),
            self.payload_sha256
        )
    }

    /// Value of the `Authorization` header for this request signed at `now`.
    pub fn authorization(&self, key: &SigningKey<'_>, now: DateTime<Utc>) -> Result<String> {
        let date = now.format("%Y%m%d").to_string();
        let scope = format!("{}/{}/{}/aws4_request", date, key.region, SERVICE);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date(now),
            scope,
            sha256_hex(self.canonical_string().as_bytes())
        );

        let signing_key = derive_signing_key(key.secret_key, &date, key.region, SERVICE)?;
        let signature = hex(&hmac(&signing_key, &string_to_sign)?);

        Ok(format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM,
            key.access_key,
            scope,
            self.signed_headers(),
            signature
        ))
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> CanonicalRequest<'static> {
        CanonicalRequest {
            method: "PUT",
            path: "/wsbPopIndex.json",
            headers: vec![
                ("x-amz-date", "20240305T021500Z".to_string()),
                ("host", "wsb-pop-index.s3.us-east-1.amazonaws.com".to_string()),
                ("content-type", "application/json".to_string()),
            ],
            payload_sha256: sha256_hex(b""),
        }
    }

    #[test]
    fn hashes_empty_payload() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn derives_documented_signing_key() {
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            hex(&key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn canonical_request_sorts_headers() {
        let canonical = request().canonical_string();
        let expected = format!(
            "PUT\n/wsbPopIndex.json\n\ncontent-type:application/json\nhost:wsb-pop-index.s3.us-east-1.amazonaws.com\nx-amz-date:20240305T021500Z\n\ncontent-type;host;x-amz-date\n{}",
            sha256_hex(b"")
        );
        assert_eq!(canonical, expected);
    }

    #[test]
    fn encodes_reserved_path_characters() {
        assert_eq!(uri_encode_path("/reports/a b+c.json"), "/reports/a%20b%2Bc.json");
    }

    #[test]
    fn authorization_names_scope_and_headers() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 2, 15, 0).unwrap();
        let key = SigningKey {
            access_key: "AKIDEXAMPLE",
            secret_key: "secret",
            region: "us-east-1",
        };

        let header = request().authorization(&key, now).unwrap();
        let prefix = "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240305/us-east-1/s3/aws4_request, \
                      SignedHeaders=content-type;host;x-amz-date, Signature=";
        assert!(header.starts_with(prefix), "{}", header);
        assert_eq!(
            &header[prefix.len()..],
            "0424027147b7e5fda941d8b050c85cb74827ed811e7f5b370e2537008540265d"
        );
    }
}
