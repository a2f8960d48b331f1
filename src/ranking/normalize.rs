/// Alternative spellings mapped to the canonical English name used by the
/// ranking snapshot. Keys are lower case.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    // Polish names
    ("polska", "Poland"),
    ("niemcy", "Germany"),
    ("holandia", "Netherlands"),
    ("włochy", "Italy"),
    ("francja", "France"),
    ("hiszpania", "Spain"),
    ("anglia", "England"),
    ("brazylia", "Brazil"),
    ("argentyna", "Argentina"),
    ("portugalia", "Portugal"),
    ("belgia", "Belgium"),
    ("chorwacja", "Croatia"),
    ("czechy", "Czech Republic"),
    ("szwecja", "Sweden"),
    ("dania", "Denmark"),
    ("szkocja", "Scotland"),
    ("walia", "Wales"),
    ("meksyk", "Mexico"),
    ("japonia", "Japan"),
    ("maroko", "Morocco"),
    // Common English variants
    ("usa", "United States"),
    ("us", "United States"),
    ("united states of america", "United States"),
    ("holland", "Netherlands"),
    ("the netherlands", "Netherlands"),
    ("south korea", "Korea, South"),
    ("korea republic", "Korea, South"),
    ("republic of korea", "Korea, South"),
    ("czechia", "Czech Republic"),
    ("türkiye", "Turkey"),
    ("turkiye", "Turkey"),
    ("ivory coast", "Cote d'Ivoire"),
    ("côte d'ivoire", "Cote d'Ivoire"),
    ("ir iran", "Iran"),
    ("china pr", "China"),
];

/// Normalize a country name to the spelling used by the ranking source.
///
/// Known aliases (including the Polish names of the big football nations)
/// map to their canonical English name. Anything else is trimmed, has its
/// inner whitespace collapsed and is title cased.
pub fn normalize_country_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let lower = collapsed.to_lowercase();

    COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| title_case(&lower))
}

/// Upper case every letter that follows a non letter, lower case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polish_aliases() {
        assert_eq!(normalize_country_name("Polska"), "Poland");
        assert_eq!(normalize_country_name("NIEMCY"), "Germany");
        assert_eq!(normalize_country_name("Włochy"), "Italy");
        assert_eq!(normalize_country_name(" brazylia "), "Brazil");
    }

    #[test]
    fn test_english_aliases() {
        assert_eq!(normalize_country_name("USA"), "United States");
        assert_eq!(
            normalize_country_name("United  States of America"),
            "United States"
        );
        assert_eq!(normalize_country_name("Holland"), "Netherlands");
        assert_eq!(normalize_country_name("Czechia"), "Czech Republic");
    }

    #[test]
    fn test_title_case_fallback() {
        assert_eq!(normalize_country_name("panama"), "Panama");
        assert_eq!(normalize_country_name("new zealand"), "New Zealand");
        assert_eq!(normalize_country_name("guinea-bissau"), "Guinea-Bissau");
        assert_eq!(normalize_country_name("SAUDI ARABIA"), "Saudi Arabia");
    }
}
