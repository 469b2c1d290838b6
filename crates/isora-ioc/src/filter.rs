use isora_common::{Ioc, IocType};

/// Feed-sync filter gate (§4.10 step 4): keep IOCs meeting `min_confidence`
/// and, when `allowed_types` is non-empty, restricted to that set.
pub fn filter_iocs(iocs: Vec<Ioc>, min_confidence: f64, allowed_types: &[IocType]) -> Vec<Ioc> {
    iocs.into_iter()
        .filter(|ioc| ioc.confidence >= min_confidence)
        .filter(|ioc| allowed_types.is_empty() || allowed_types.contains(&ioc.ioc_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use isora_common::ThreatLevel;

    fn sample(confidence: f64, ioc_type: IocType) -> Ioc {
        let mut ioc = Ioc::new("v", ioc_type);
        ioc.confidence = confidence;
        ioc.threat_level = ThreatLevel::Unknown;
        ioc
    }

    #[test]
    fn filters_by_confidence_and_type() {
        let iocs = vec![
            sample(0.9, IocType::Ip),
            sample(0.2, IocType::Ip),
            sample(0.9, IocType::Domain),
        ];
        let result = filter_iocs(iocs, 0.5, &[IocType::Ip]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].ioc_type, IocType::Ip);
    }

    #[test]
    fn empty_allowed_types_means_no_type_restriction() {
        let iocs = vec![sample(0.9, IocType::Ip), sample(0.9, IocType::Domain)];
        let result = filter_iocs(iocs, 0.5, &[]);
        assert_eq!(result.len(), 2);
    }
}
