/// Closed 20-entry tag-substring → MITRE technique table shared by the
/// enrichment aggregator (§4.3) and available here for normalizer callers
/// that want technique suggestions before enrichment runs.
const TAG_TECHNIQUES: &[(&str, &str)] = &[
    ("c2", "T1071 - Application Layer Protocol"),
    ("command_and_control", "T1071 - Application Layer Protocol"),
    ("ransomware", "T1486 - Data Encrypted for Impact"),
    ("phishing", "T1566 - Phishing"),
    ("spearphishing", "T1566.001 - Spearphishing Attachment"),
    ("credential_theft", "T1003 - OS Credential Dumping"),
    ("trojan", "T1204 - User Execution"),
    ("rat", "T1219 - Remote Access Software"),
    ("keylogger", "T1056 - Input Capture"),
    ("dropper", "T1105 - Ingress Tool Transfer"),
    ("tor", "T1090.003 - Multi-hop Proxy"),
    ("cobalt_strike", "T1071 - Application Layer Protocol"),
    ("emotet", "T1204 - User Execution"),
    ("bruteforce", "T1110 - Brute Force"),
    ("scanner", "T1595 - Active Scanning"),
    ("dga", "T1568.002 - Domain Generation Algorithms"),
    ("exfiltration", "T1041 - Exfiltration Over C2 Channel"),
    ("persistence", "T1547 - Boot or Logon Autostart Execution"),
    ("lateral_movement", "T1021 - Remote Services"),
    ("privilege_escalation", "T1068 - Exploitation for Privilege Escalation"),
];

pub const MAX_DERIVED_TECHNIQUES: usize = 15;

/// Derive MITRE technique suggestions from a tag set by substring match,
/// normalizing `-`/` ` to `_` before comparing (§4.3 step 7).
pub fn enrich_with_mitre(tags: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for tag in tags {
        let normalized = tag.to_lowercase().replace(['-', ' '], "_");
        for (marker, technique) in TAG_TECHNIQUES {
            if normalized.contains(marker) && !out.contains(&technique.to_string()) {
                out.push(technique.to_string());
            }
        }
        if out.len() >= MAX_DERIVED_TECHNIQUES {
            break;
        }
    }
    out.truncate(MAX_DERIVED_TECHNIQUES);
    out
}
