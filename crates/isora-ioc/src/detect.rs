use isora_common::IocType;
use once_cell::sync::Lazy;
use regex::Regex;

static IP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$").unwrap()
});
static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$").unwrap()
});
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static CVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^CVE-\d{4}-\d{4,}$").unwrap());
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^https?://[^\s/$.?#].[^\s]*$"#).unwrap());
static MD5_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{32}$").unwrap());
static SHA1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{40}$").unwrap());
static SHA256_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{64}$").unwrap());

/// Precedence order from §4.1: IP → CVE → hash-by-length (32/40/64) → email
/// → URL → domain → else unknown.
pub fn detect_type(value: &str) -> IocType {
    let v = value.trim();

    if IP_RE.is_match(v) {
        return IocType::Ip;
    }
    if CVE_RE.is_match(v) {
        return IocType::Cve;
    }
    if MD5_RE.is_match(v) {
        return IocType::Md5;
    }
    if SHA1_RE.is_match(v) {
        return IocType::Sha1;
    }
    if SHA256_RE.is_match(v) {
        return IocType::Sha256;
    }
    if EMAIL_RE.is_match(v) {
        return IocType::Email;
    }
    if URL_RE.is_match(v) {
        return IocType::Url;
    }
    if DOMAIN_RE.is_match(v) {
        return IocType::Domain;
    }

    IocType::Unknown
}

/// Regex-based literal validator per type (§4.1). `Ok(())` if valid, else the
/// human-readable reason carried into `CoreError::IocValueInvalid`.
pub fn validate(value: &str, ioc_type: IocType) -> Result<(), String> {
    let v = value.trim();
    if v.is_empty() {
        return Err("empty value".to_string());
    }

    let ok = match ioc_type {
        IocType::Ip => IP_RE.is_match(v),
        IocType::Domain | IocType::Hostname => DOMAIN_RE.is_match(v),
        IocType::Md5 => MD5_RE.is_match(v),
        IocType::Sha1 => SHA1_RE.is_match(v),
        IocType::Sha256 => SHA256_RE.is_match(v),
        IocType::Email => EMAIL_RE.is_match(v),
        IocType::Cve => CVE_RE.is_match(v),
        IocType::Url => URL_RE.is_match(v),
        // Mutex, FilePath, Process, RegistryKey, Unknown carry no literal format constraint.
        _ => true,
    };

    if ok {
        Ok(())
    } else {
        Err(format!("invalid {} format", ioc_type.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_in_precedence_order() {
        assert_eq!(detect_type("8.8.8.8"), IocType::Ip);
        assert_eq!(detect_type("CVE-2024-12345"), IocType::Cve);
        assert_eq!(detect_type(&"a".repeat(32)), IocType::Md5);
        assert_eq!(detect_type(&"a".repeat(40)), IocType::Sha1);
        assert_eq!(detect_type(&"a".repeat(64)), IocType::Sha256);
        assert_eq!(detect_type("user@example.com"), IocType::Email);
        assert_eq!(detect_type("https://evil.com/path"), IocType::Url);
        assert_eq!(detect_type("evil.com"), IocType::Domain);
        assert_eq!(detect_type("!!!not-anything!!!"), IocType::Unknown);
    }

    #[test]
    fn validate_rejects_malformed_ip() {
        assert!(validate("999.999.999.999", IocType::Ip).is_err());
        assert!(validate("8.8.8.8", IocType::Ip).is_ok());
    }

    #[test]
    fn validate_rejects_short_hash() {
        assert!(validate("abcd", IocType::Md5).is_err());
    }
}
