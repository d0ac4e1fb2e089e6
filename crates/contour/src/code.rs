//! # Outcome Codes — Closed Vocabulary
//!
//! Every comparison node carries exactly one [`Code`]. Each code has a fixed
//! match / no-match meaning, so a node's verdict is a pure lookup on its own
//! code and never recomputed from its children.
//!
//! Codes serialize as their snake_case names (`exact_match`,
//! `map_has_extra_keys`, ...). Parsing an unknown name fails with
//! `ContourError::InvalidCode`.

use std::fmt;
use std::str::FromStr;

use contour_core::ContourError;
use serde::{Deserialize, Serialize};

macro_rules! codes {
    ($( $(#[$doc:meta])* $variant:ident => $name:literal, $matches:literal; )+) => {
        /// Outcome of a single comparison decision.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Code {
            $( $(#[$doc])* $variant, )+
        }

        impl Code {
            /// The whole vocabulary in declaration order.
            pub const ALL: &'static [Code] = &[ $( Code::$variant, )+ ];

            /// Whether this outcome counts as a match.
            pub const fn is_match(self) -> bool {
                match self {
                    $( Code::$variant => $matches, )+
                }
            }

            /// The snake_case name of this code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Code::$variant => $name, )+
                }
            }
        }

        impl FromStr for Code {
            type Err = ContourError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(Code::$variant), )+
                    other => Err(ContourError::InvalidCode(other.to_string())),
                }
            }
        }
    };
}

codes! {
    // General
    /// Shape and value are equal.
    ExactMatch => "exact_match", true;
    /// The shape accepts the value (type, pattern, range or predicate).
    Match => "match", true;
    /// The shape does not accept the value.
    Mismatch => "mismatch", false;
    /// A collection was checked against a shape of another category.
    ClassMismatch => "class_mismatch", false;
    /// The universal shape accepts everything.
    ObjectUniversalMatch => "object_universal_match", true;

    // AnyOf
    /// At least one alternative matched.
    AnyOfMatch => "any_of_match", true;
    /// No alternative matched.
    AnyOfMismatch => "any_of_mismatch", false;

    // Sequences
    /// The value sequence is empty.
    SequenceEmpty => "sequence_empty", true;
    /// Every element matched some element shape.
    SequenceMatch => "sequence_match", true;
    /// Some element matched no element shape.
    SequenceMismatch => "sequence_mismatch", false;
    /// The sequence equals the shape literally.
    SequenceExactMatch => "sequence_exact_match", true;
    /// The shape is the any-sequence type matcher.
    SequenceClassMatchesAny => "sequence_class_matches_any", true;
    /// One element matched some element shape.
    SequenceElementMatch => "sequence_element_match", true;
    /// One element matched no element shape.
    SequenceElementMismatch => "sequence_element_mismatch", false;

    // Maps
    /// The shape is the any-map type matcher.
    MapClassMatchesAny => "map_class_matches_any", true;
    /// The map equals the shape literally.
    MapExactMatch => "map_exact_match", true;
    /// A required, extra or value check failed.
    MapMismatch => "map_mismatch", false;
    /// All three map checks passed.
    MapMatch => "map_match", true;

    // Maps: extra key checks
    /// Some value key is allowed by no shape key.
    MapHasExtraKeys => "map_has_extra_keys", false;
    /// Every value key is allowed.
    MapNoExtraKeys => "map_no_extra_keys", true;
    /// The value key equals a shape key.
    KeyExactlyAllowed => "key_exactly_allowed", true;
    /// The value key matches some general shape key.
    KeyMatchAllowed => "key_match_allowed", true;
    /// The value key matches no shape key.
    KeyNotAllowed => "key_not_allowed", false;

    // Maps: required key checks
    /// Some required shape key is absent.
    MapHasMissingKeys => "map_has_missing_keys", false;
    /// Every required shape key is present or optional.
    MapNoMissingKeys => "map_no_missing_keys", true;
    /// A value key equals the required shape key.
    KeyExactMatch => "key_exact_match", true;
    /// Some value keys match the required shape key.
    KeyMatch => "key_match", true;
    /// The required shape key is absent.
    KeyMissing => "key_missing", false;
    /// The shape key is absent but its value shape accepts absence.
    KeyOptional => "key_optional", true;

    // Maps: value checks
    /// Some entry matched no shape entry.
    MapValuesMismatch => "map_values_mismatch", false;
    /// Every entry matched a shape entry.
    MapValuesMatch => "map_values_match", true;
    /// The entry matched at least one general shape entry.
    KvMatch => "kv_match", true;
    /// The entry matched no general shape entry.
    KvMismatch => "kv_mismatch", false;
    /// The value under an exactly matching key matched its shape.
    KvSpecificMatch => "kv_specific_match", true;
    /// The value under an exactly matching key did not match its shape.
    KvSpecificMismatch => "kv_specific_mismatch", false;
    /// The entry's key did not match this shape entry's key.
    KvKeyMismatch => "kv_key_mismatch", false;
    /// Key and value both matched this shape entry.
    KvValueMatch => "kv_value_match", true;
    /// The key matched this shape entry but the value did not.
    KvValueMismatch => "kv_value_mismatch", false;
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_has_38_codes() {
        assert_eq!(Code::ALL.len(), 38);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for code in Code::ALL {
            assert_eq!(code.as_str().parse::<Code>().unwrap(), *code);
        }
    }

    #[test]
    fn unknown_names_are_invalid_codes() {
        let err = "foo_bar".parse::<Code>().unwrap_err();
        assert_eq!(err, ContourError::InvalidCode("foo_bar".to_string()));
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&Code::KvSpecificMismatch).unwrap();
        assert_eq!(json, r#""kv_specific_mismatch""#);
        let parsed: Code = serde_json::from_str(r#""any_of_match""#).unwrap();
        assert_eq!(parsed, Code::AnyOfMatch);
        assert_eq!(serde_json::to_string(&Code::AnyOfMismatch).unwrap(), r#""any_of_mismatch""#);
    }

    #[test]
    fn match_table_spot_checks() {
        assert!(Code::ExactMatch.is_match());
        assert!(Code::SequenceEmpty.is_match());
        assert!(Code::KeyOptional.is_match());
        assert!(!Code::ClassMismatch.is_match());
        assert!(!Code::KvKeyMismatch.is_match());
        assert!(!Code::MapHasExtraKeys.is_match());
        let matching = Code::ALL.iter().filter(|c| c.is_match()).count();
        assert_eq!(matching, 23);
    }
}
