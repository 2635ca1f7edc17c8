//! Deterministic room description used whenever the text model is absent,
//! fails, or returns something too short to narrate.

/// Feature words replaced with a more evocative synonym. Anything not listed
/// is used verbatim.
const SYNONYMS: &[(&str, &str)] = &[
    ("spacious", "expansive"),
    ("modern", "contemporary"),
    ("bright", "sun-filled"),
    ("private", "secluded"),
    ("peaceful", "tranquil"),
    ("landscaped", "meticulously maintained"),
];

/// Looks up the synonym for a feature, passing unknown features through.
pub fn enhance_feature(feature: &str) -> &str {
    SYNONYMS
        .iter()
        .find(|(plain, _)| *plain == feature)
        .map(|(_, fancy)| *fancy)
        .unwrap_or(feature)
}

/// Builds the fallback description for a room.
pub fn fallback_description(room_type: &str, features: &[String]) -> String {
    let enhanced: Vec<&str> = features.iter().map(|f| enhance_feature(f)).collect();
    format!(
        "Welcome to this exceptional {room_type}, where {} features create an unforgettable \
         living space. This carefully designed area exemplifies luxury living at its finest.",
        enhanced.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(list: &[&str]) -> Vec<String> {
        list.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn known_features_are_substituted() {
        assert_eq!(enhance_feature("bright"), "sun-filled");
        assert_eq!(enhance_feature("landscaped"), "meticulously maintained");
    }

    #[test]
    fn unknown_features_pass_through() {
        assert_eq!(enhance_feature("heated floors"), "heated floors");
        // Lookup is exact; case variants are not mapped.
        assert_eq!(enhance_feature("Bright"), "Bright");
    }

    #[test]
    fn fallback_matches_template() {
        let text = fallback_description("living room", &features(&["spacious", "modern", "bright"]));
        assert_eq!(
            text,
            "Welcome to this exceptional living room, where expansive, contemporary, sun-filled \
             features create an unforgettable living space. This carefully designed area \
             exemplifies luxury living at its finest."
        );
    }

    #[test]
    fn fallback_contains_every_feature() {
        let cases: &[&[&str]] = &[
            &[],
            &["private"],
            &["private", "landscaped", "peaceful"],
            &["wine cellar", "bright", "vaulted ceilings"],
            &["spacious", "spacious"],
        ];
        for case in cases {
            let list = features(case);
            let text = fallback_description("garden", &list);
            assert!(!text.is_empty());
            for feature in &list {
                assert!(
                    text.contains(enhance_feature(feature)),
                    "{text:?} is missing {feature:?}"
                );
            }
        }
    }
}
