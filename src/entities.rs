use crate::lines::{LineRole, RawLine};
use crate::schema::InvestorInfo;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)mobile[^0-9+]*(\+?\d[\d\s-]{7,13}\d)").unwrap());

/// Indian PAN: five letters, four digits, one letter.
static PAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{5}[0-9]{4}[A-Z]\b").unwrap());

/// Scans the header region (everything before the first scheme header) for
/// loosely positioned investor identity fields. Never fails: any field that
/// cannot be located is simply left absent.
///
/// The investor name has no label of its own; by convention it is the first
/// non-empty line immediately after the email line. The address, when
/// present, is the run of plain lines that follows the name.
pub fn extract_investor_info(labeled: &[(RawLine, LineRole)]) -> InvestorInfo {
    let header: Vec<&str> = labeled
        .iter()
        .take_while(|(_, role)| *role != LineRole::SchemeHeader)
        .map(|(raw, _)| raw.text.as_str())
        .collect();

    let mut info = InvestorInfo::default();

    for (i, line) in header.iter().enumerate() {
        if info.email.is_none() {
            if let Some(m) = EMAIL_RE.find(line) {
                info.email = Some(m.as_str().to_string());
                let (name, address) = name_and_address_after(&header, i);
                info.name = name;
                info.address = address;
            }
        }
        if info.mobile.is_none() {
            if let Some(caps) = MOBILE_RE.captures(line) {
                info.mobile = Some(caps[1].trim().to_string());
            }
        }
        if info.pan.is_none() {
            if let Some(m) = PAN_RE.find(line) {
                info.pan = Some(m.as_str().to_string());
            }
        }
    }

    info
}

fn looks_like_identity_field(line: &str) -> bool {
    EMAIL_RE.is_match(line) || PAN_RE.is_match(line) || MOBILE_RE.is_match(line)
}

fn name_and_address_after(
    header: &[&str],
    email_idx: usize,
) -> (Option<String>, Option<String>) {
    let mut rest = header
        .iter()
        .skip(email_idx + 1)
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !looks_like_identity_field(l));

    let name = rest.next().map(|l| l.to_string());

    let address_lines: Vec<&str> = rest.take(3).collect();
    let address = if address_lines.is_empty() {
        None
    } else {
        Some(address_lines.join(", "))
    };

    (name, address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::classify_lines;

    fn labeled(text: &str) -> Vec<(RawLine, LineRole)> {
        classify_lines(text).collect()
    }

    #[test]
    fn test_full_header() {
        let text = "Consolidated Account Statement\n\
                    Email Id: ramesh.kumar@example.com\n\
                    Ramesh Kumar\n\
                    42 MG Road\n\
                    Bengaluru 560001\n\
                    Mobile: +91 98765 43210\n\
                    PAN: ABCDE1234F\n\
                    INF903K01BW2-SBI Bluechip Fund - Direct Growth\n";

        let info = extract_investor_info(&labeled(text));
        assert_eq!(info.email.as_deref(), Some("ramesh.kumar@example.com"));
        assert_eq!(info.name.as_deref(), Some("Ramesh Kumar"));
        assert_eq!(info.mobile.as_deref(), Some("+91 98765 43210"));
        assert_eq!(info.pan.as_deref(), Some("ABCDE1234F"));
        assert_eq!(info.address.as_deref(), Some("42 MG Road, Bengaluru 560001"));
    }

    #[test]
    fn test_absent_fields_are_not_errors() {
        let info = extract_investor_info(&labeled("just some boilerplate\nand a disclaimer"));
        assert_eq!(info, InvestorInfo::default());
    }

    #[test]
    fn test_scan_stops_at_first_scheme_header() {
        let text = "INF903K01BW2-SBI Bluechip Fund - Direct Growth\n\
                    Email Id: below.header@example.com\n";
        let info = extract_investor_info(&labeled(text));
        assert!(info.email.is_none());
    }

    #[test]
    fn test_name_skips_other_identity_lines() {
        let text = "Email Id: a@b.com\n\
                    PAN: ABCDE1234F\n\
                    Sunita Sharma\n";
        let info = extract_investor_info(&labeled(text));
        assert_eq!(info.name.as_deref(), Some("Sunita Sharma"));
        assert_eq!(info.pan.as_deref(), Some("ABCDE1234F"));
    }
}
