/// Known team countries, scanned in order; the first prefix match wins.
///
/// When one name is a prefix of another the longer one must come first.
pub const COUNTRIES: &[&str] = &[
    "Australia",
    "Austria",
    "Belgium",
    "Canada",
    "China",
    "Czech Republic",
    "Denmark",
    "England",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Ireland",
    "Italy",
    "Latvia",
    "Middle East",
    "Netherlands",
    "Northern Ireland",
    "Norway",
    "Poland",
    "Portugal",
    "Russia",
    "Scotland",
    "Slovenia",
    "Spain",
    "Sweden",
    "Switzerland",
    "UAE",
    "USA",
    "Wales",
];

/// Splits a raw team label such as "USA Team Eagles" into
/// `("USA", "Team Eagles")`.
pub fn split_team_label<'a>(raw: &'a str, countries: &[&'a str]) -> Option<(&'a str, &'a str)> {
    countries
        .iter()
        .find_map(|country| raw.strip_prefix(country).map(|rest| (*country, rest.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_matching_country() {
        assert_eq!(
            split_team_label("USA Team Eagles", COUNTRIES),
            Some(("USA", "Team Eagles"))
        );
        assert_eq!(
            split_team_label("Northern Ireland Giants", COUNTRIES),
            Some(("Northern Ireland", "Giants"))
        );
        assert_eq!(split_team_label("Atlantis Wolves", COUNTRIES), None);
    }

    #[test]
    fn list_order_decides_overlapping_prefixes() {
        let countries = ["Ireland", "Ireland North"];
        assert_eq!(
            split_team_label("Ireland North Tigers", &countries),
            Some(("Ireland", "North Tigers"))
        );
    }
}
