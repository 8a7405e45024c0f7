/// A case-insensitive substring rewrite for platform names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformRule {
    pub pattern: &'static str,
    pub canonical: &'static str,
}

/// Rewrite rules in application order. Every rule whose pattern occurs in the
/// source value overwrites the result, so the last matching rule wins.
pub const PLATFORM_RULES: [PlatformRule; 5] = [
    PlatformRule {
        pattern: "PS",
        canonical: "PS",
    },
    PlatformRule {
        pattern: "Playstation",
        canonical: "PS",
    },
    PlatformRule {
        pattern: "Xbox",
        canonical: "XB",
    },
    PlatformRule {
        pattern: "XBOX",
        canonical: "XB",
    },
    PlatformRule {
        pattern: "Nintendo",
        canonical: "NES",
    },
];

impl PlatformRule {
    pub fn matches(&self, lowered: &str) -> bool {
        lowered.contains(&self.pattern.to_lowercase())
    }
}

/// Canonical platform label for an already trimmed source value.
pub fn canonical_platform(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    PLATFORM_RULES
        .iter()
        .rev()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.canonical.to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playstation_variants_collapse_to_ps() {
        assert_eq!(canonical_platform("Sony Playstation 2"), "PS");
        assert_eq!(canonical_platform("PS3"), "PS");
        assert_eq!(canonical_platform("psp"), "PS");
    }

    #[test]
    fn last_matching_rule_wins() {
        assert_eq!(canonical_platform("Playstation Xbox Bundle"), "XB");
        assert_eq!(canonical_platform("Xbox for Nintendo fans"), "NES");
    }

    #[test]
    fn unmatched_names_pass_through() {
        assert_eq!(canonical_platform("Wii"), "Wii");
        assert_eq!(canonical_platform("GBA"), "GBA");
        assert_eq!(canonical_platform("X360"), "X360");
    }
}
