use crate::models::Roster;

/// Which tier of the match policy produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Full name, case-sensitive
    FullName,
    /// Full name, upper-cased
    FullNameUpper,
    /// Space-prefixed last name, as written or upper-cased
    LastName,
}

/// Resolve a matched text to at most one roster name.
///
/// Tiers are tried in order and a later tier only runs if the previous one
/// found nothing. Within a tier the whole roster is scanned and the *last*
/// matching entry wins, so roster order decides ties.
pub fn resolve_speaker<'r>(matched_text: &str, roster: &'r Roster) -> Option<&'r str> {
    resolve_speaker_with_tier(matched_text, roster).map(|(name, _)| name)
}

/// Like [`resolve_speaker`] but also reports the tier that matched
pub fn resolve_speaker_with_tier<'r>(
    matched_text: &str,
    roster: &'r Roster,
) -> Option<(&'r str, MatchTier)> {
    let names = roster.names();

    let full = last_match(names, |name| matched_text.contains(name));
    if let Some(name) = full {
        return Some((name, MatchTier::FullName));
    }

    let upper = last_match(names, |name| matched_text.contains(&name.to_uppercase()));
    if let Some(name) = upper {
        return Some((name, MatchTier::FullNameUpper));
    }

    // Space-prefixed so that "Ek" does not match inside "Lindek"
    let last = last_match(names, |name| match name.split_whitespace().last() {
        Some(last) => {
            let needle = format!(" {}", last);
            matched_text.contains(&needle) || matched_text.contains(&needle.to_uppercase())
        }
        None => false,
    });
    last.map(|name| (name, MatchTier::LastName))
}

/// Scan every name and keep the last one accepted by `is_match`
fn last_match<'r>(names: &'r [String], is_match: impl Fn(&str) -> bool) -> Option<&'r str> {
    let mut found = None;
    for name in names {
        if is_match(name) {
            found = Some(name.as_str());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::from_names(["Anna Andersson", "Erik Ek"])
    }

    #[test]
    fn test_full_name_tier() {
        let roster = roster();
        assert_eq!(
            resolve_speaker_with_tier("Anna Andersson yttrade sig", &roster),
            Some(("Anna Andersson", MatchTier::FullName))
        );
    }

    #[test]
    fn test_upper_case_tier() {
        let roster = roster();
        assert_eq!(
            resolve_speaker_with_tier("ANNA ANDERSSON:", &roster),
            Some(("Anna Andersson", MatchTier::FullNameUpper))
        );
    }

    #[test]
    fn test_last_name_tier() {
        let roster = roster();
        assert_eq!(
            resolve_speaker_with_tier("Herr Ek anförde", &roster),
            Some(("Erik Ek", MatchTier::LastName))
        );
        assert_eq!(resolve_speaker("Herr EK:", &roster), Some("Erik Ek"));
    }

    #[test]
    fn test_last_name_requires_word_start() {
        let roster = roster();
        assert_eq!(resolve_speaker("Herr Lindek anförde", &roster), None);
    }

    #[test]
    fn test_last_match_wins() {
        let roster = Roster::from_names(["Anna Andersson", "Erik Andersson"]);
        assert_eq!(
            resolve_speaker("Anna Andersson och Erik Andersson", &roster),
            Some("Erik Andersson")
        );
        // shared last name: tier 3 also keeps the later entry
        assert_eq!(resolve_speaker("Fru Andersson:", &roster), Some("Erik Andersson"));
    }

    #[test]
    fn test_earlier_tier_takes_precedence() {
        // "Erik Ek" matches on last name only; the full-name hit must win
        let roster = Roster::from_names(["Anna Andersson", "Erik Ek"]);
        assert_eq!(
            resolve_speaker("Anna Andersson om herr Ek", &roster),
            Some("Anna Andersson")
        );
    }

    #[test]
    fn test_empty_roster_is_unresolved() {
        assert_eq!(resolve_speaker("Anna Andersson", &Roster::default()), None);
    }
}
