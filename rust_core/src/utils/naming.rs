//! Name conversions applied at the wire boundary.

/// Irregular plurals used by the API's collection endpoints
const IRREGULAR_PLURALS: &[(&str, &str)] = &[("stadium", "stadia")];

/// Plural form of an entity tag as it appears in collection URLs.
pub fn pluralize(word: &str) -> String {
    IRREGULAR_PLURALS
        .iter()
        .find(|(singular, _)| *singular == word)
        .map(|(_, plural)| plural.to_string())
        .unwrap_or_else(|| format!("{}s", word))
}

/// Convert a parameter name to the API's snake_case convention.
///
/// Handles camelCase, PascalCase, kebab-case and spaced input. Runs of
/// capitals are kept together as one word (`gameID` -> `game_id`).
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }

        out.extend(c.to_lowercase());
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("stadium"), "stadia");
        assert_eq!(pluralize("manager"), "managers");
        assert_eq!(pluralize("team"), "teams");
        assert_eq!(pluralize("referee"), "referees");
        assert_eq!(pluralize("player"), "players");
    }

    #[test]
    fn test_snake_case_from_camel() {
        assert_eq!(to_snake_case("minimumMinutes"), "minimum_minutes");
        assert_eq!(to_snake_case("splitBySeasons"), "split_by_seasons");
        assert_eq!(to_snake_case("SeasonName"), "season_name");
    }

    #[test]
    fn test_snake_case_passthrough() {
        assert_eq!(to_snake_case("season_name"), "season_name");
        assert_eq!(to_snake_case("offset"), "offset");
    }

    #[test]
    fn test_snake_case_acronyms_and_separators() {
        assert_eq!(to_snake_case("gameID"), "game_id");
        assert_eq!(to_snake_case("playerIDList"), "player_id_list");
        assert_eq!(to_snake_case("split-by-teams"), "split_by_teams");
        assert_eq!(to_snake_case("  stage name "), "stage_name");
    }
}
