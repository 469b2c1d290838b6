use isora_common::IocType;

/// Canonicalize a raw value per its detected/declared type (§4.1). Identity
/// for dedup/merge purposes is `(normalize(value), type)`.
pub fn normalize_ioc_value(value: &str, ioc_type: IocType) -> String {
    let v = value.trim();

    match ioc_type {
        IocType::Ip => normalize_ip(v),
        IocType::Domain | IocType::Hostname => v.to_lowercase().trim_end_matches('.').to_string(),
        IocType::Url => normalize_url(v),
        IocType::Md5 | IocType::Sha1 | IocType::Sha256 => v.to_lowercase(),
        IocType::Email => v.to_lowercase(),
        IocType::Cve => normalize_cve(v),
        _ => v.to_string(),
    }
}

fn normalize_ip(v: &str) -> String {
    v.split('.')
        .map(|octet| match octet.parse::<u32>() {
            Ok(n) => n.to_string(),
            Err(_) => octet.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn normalize_url(v: &str) -> String {
    if let Some(idx) = v.find("://") {
        let (scheme, rest) = v.split_at(idx);
        let rest = &rest[3..];
        let (host, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        format!("{}://{}{}", scheme.to_lowercase(), host.to_lowercase(), path)
    } else {
        v.to_string()
    }
}

fn normalize_cve(v: &str) -> String {
    let upper = v.to_uppercase();
    if upper.starts_with("CVE-") {
        upper
    } else {
        format!("CVE-{}", upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_strips_leading_zeros() {
        assert_eq!(normalize_ioc_value("192.168.001.001", IocType::Ip), "192.168.1.1");
    }

    #[test]
    fn domain_lowercases_and_strips_trailing_dot() {
        assert_eq!(normalize_ioc_value("EVIL.COM.", IocType::Domain), "evil.com");
    }

    #[test]
    fn url_lowercases_scheme_and_host_only() {
        assert_eq!(
            normalize_ioc_value("HTTPS://Evil.COM/PathIsCaseSensitive", IocType::Url),
            "https://evil.com/PathIsCaseSensitive"
        );
    }

    #[test]
    fn hash_lowercases() {
        assert_eq!(
            normalize_ioc_value(&"A".repeat(64), IocType::Sha256),
            "a".repeat(64)
        );
    }

    #[test]
    fn cve_uppercases_and_ensures_prefix() {
        assert_eq!(normalize_ioc_value("cve-2024-12345", IocType::Cve), "CVE-2024-12345");
    }
}
