use isora_common::{IocType, ThreatLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    VirusTotal,
    AbuseIpDb,
    Shodan,
    GreyNoise,
    Otx,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::VirusTotal => "virustotal",
            Source::AbuseIpDb => "abuseipdb",
            Source::Shodan => "shodan",
            Source::GreyNoise => "greynoise",
            Source::Otx => "otx",
        }
    }
}

/// Default source set applicable to a detected type (§4.3), used when the
/// caller does not specify an explicit source list.
pub fn default_sources_for(ioc_type: IocType) -> Vec<Source> {
    match ioc_type {
        IocType::Ip => vec![
            Source::VirusTotal,
            Source::AbuseIpDb,
            Source::Shodan,
            Source::GreyNoise,
            Source::Otx,
        ],
        IocType::Md5 | IocType::Sha1 | IocType::Sha256 => vec![Source::VirusTotal, Source::Otx],
        IocType::Domain | IocType::Hostname | IocType::Url => vec![Source::VirusTotal, Source::Otx],
        _ => vec![Source::VirusTotal],
    }
}

/// Per-source enrichment result (§4.3).
#[derive(Debug, Clone, Default)]
pub struct SourceResult {
    pub available: bool,
    pub threat_level: Option<ThreatLevel>,
    pub confidence: f64,
    pub raw_score: f64,
    pub detections: u32,
    pub total_engines: u32,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub country: Option<String>,
    pub asn: Option<String>,
    pub isp: Option<String>,
    pub error: Option<String>,
}

impl SourceResult {
    pub fn unavailable(error: impl Into<String>) -> Self {
        SourceResult {
            available: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
