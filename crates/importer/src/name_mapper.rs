/// Spellings found on old score sheets and the roster name they stand for.
const NAME_ALIASES: [(&str, &str); 2] = [("Goldor", "Gordor"), ("Xephy", "Xephi")];

/// Roster name for a name as written on a score sheet.
pub fn canonical_name(source_name: &str) -> &str {
    let name = source_name.trim();
    NAME_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

pub fn is_alias(source_name: &str) -> bool {
    canonical_name(source_name) != source_name.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(canonical_name("Goldor"), "Gordor");
        assert_eq!(canonical_name(" Xephy "), "Xephi");
        assert!(is_alias("Xephy"));
    }

    #[test]
    fn test_other_names_pass_through_trimmed() {
        assert_eq!(canonical_name("Negro "), "Negro");
        assert_eq!(canonical_name("goldor"), "goldor");
        assert!(!is_alias(" Negro"));
    }
}
