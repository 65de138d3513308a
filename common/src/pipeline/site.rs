use crate::model::lead::Lead;
use url::Url;

/// Source prefixes of partner portals and the domain each one stands for.
const SOURCE_ALIASES: [(&str, &str); 3] = [
    ("Boarding Admissions", "boardingadmissions.com"),
    ("Edu123", "edu123.in"),
    ("Eduminatti", "eduminatti.com"),
];

/// Site label of a lead, or `None` when it cannot be classified.
pub fn classify_site(lead: &Lead) -> Option<String> {
    site_from_parts(lead.url.as_deref(), lead.source.as_deref())
}

/// The URL host wins when it looks like a domain; otherwise the source
/// column is mapped through the partner alias table.
pub fn site_from_parts(url: Option<&str>, source: Option<&str>) -> Option<String> {
    url.and_then(site_from_url)
        .or_else(|| source.and_then(site_from_source))
}

fn site_from_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let lower = raw.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let parsed = match Url::parse(&candidate) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::debug!("unparsable lead url '{}': {}", raw, e);
            return None;
        }
    };

    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.contains('.').then(|| host.to_string())
}

fn site_from_source(raw: &str) -> Option<String> {
    let source = raw.trim();
    if source.is_empty() {
        return None;
    }
    let aliased = SOURCE_ALIASES
        .iter()
        .find(|(prefix, _)| source.starts_with(prefix))
        .map(|(_, domain)| domain.to_string());
    Some(aliased.unwrap_or_else(|| source.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(url: &str, source: &str) -> Lead {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Lead {
            id: "rec".into(),
            url: opt(url),
            source: opt(source),
            ..Lead::default()
        }
    }

    #[test]
    fn url_host_without_www_is_the_site() {
        assert_eq!(
            classify_site(&lead("www.Example.com/page", "")),
            Some("example.com".to_string())
        );
        assert_eq!(
            classify_site(&lead("http://admissions.school.edu.in/form?x=1", "Edu123")),
            Some("admissions.school.edu.in".to_string())
        );
    }

    #[test]
    fn partner_sources_map_to_their_domains() {
        assert_eq!(
            classify_site(&lead("", "Edu123 Campaign")),
            Some("edu123.in".to_string())
        );
        assert_eq!(
            classify_site(&lead("", "Boarding Admissions - Form")),
            Some("boardingadmissions.com".to_string())
        );
        assert_eq!(
            classify_site(&lead("", "Eduminatti")),
            Some("eduminatti.com".to_string())
        );
        assert_eq!(
            classify_site(&lead("", "  Walk-in  ")),
            Some("Walk-in".to_string())
        );
    }

    #[test]
    fn dotless_or_broken_urls_fall_back_to_source() {
        assert_eq!(
            classify_site(&lead("localhost:3000", "Edu123")),
            Some("edu123.in".to_string())
        );
        assert_eq!(
            classify_site(&lead("http://exa mple.com", "Referral")),
            Some("Referral".to_string())
        );
    }

    #[test]
    fn nothing_to_classify() {
        assert_eq!(classify_site(&lead("", "")), None);
        assert_eq!(classify_site(&lead("   ", "   ")), None);
    }

    #[test]
    fn classification_is_repeatable() {
        let l = lead("https://www.edu123.in/lp", "Edu123");
        assert_eq!(classify_site(&l), classify_site(&l));
    }
}
