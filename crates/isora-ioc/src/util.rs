use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use isora_common::IocType;

use crate::detect::detect_type;
use crate::normalize::normalize_ioc_value;

/// `SHA-256(type || ":" || normalize(value))`, hex-encoded (§4.1).
pub fn fingerprint(value: &str, ioc_type: IocType) -> String {
    let normalized = normalize_ioc_value(value, ioc_type);
    let mut hasher = Sha256::new();
    hasher.update(ioc_type.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

static TAG_STRIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s\-_:.]").unwrap());

/// Strip characters outside `[\w\s\-_:.]`, trim, truncate to `max_len`, and
/// dedupe case-insensitively while preserving first-seen casing.
pub fn sanitize_tags(tags: &[String], max_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for tag in tags {
        let cleaned = TAG_STRIP_RE.replace_all(tag, "").trim().to_string();
        if cleaned.is_empty() {
            continue;
        }
        let truncated: String = cleaned.chars().take(max_len).collect();
        let key = truncated.to_lowercase();
        if seen.insert(key) {
            out.push(truncated);
        }
    }
    out
}

static HASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-fA-F0-9]{32,64}\b").unwrap());
static IP_IN_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b").unwrap()
});

/// Pull a candidate domain out of a URL-typed IOC, and hash/IP literals out
/// of a free-text description.
pub fn extract_related_iocs(value: &str, ioc_type: IocType, description: &str) -> Vec<String> {
    let mut out = Vec::new();

    if ioc_type == IocType::Url {
        if let Some(idx) = value.find("://") {
            let rest = &value[idx + 3..];
            let host = match rest.find('/') {
                Some(i) => &rest[..i],
                None => rest,
            };
            if detect_type(host) == IocType::Domain {
                out.push(host.to_lowercase());
            }
        }
    }

    for m in HASH_RE.find_iter(description) {
        let len = m.as_str().len();
        if len == 32 || len == 40 || len == 64 {
            out.push(m.as_str().to_lowercase());
        }
    }

    for m in IP_IN_TEXT_RE.find_iter(description) {
        out.push(m.as_str().to_string());
    }

    out
}
