//! Filename codec for save files.
//!
//! On-disk names follow `<slot_name>[~<generation:012>].tunic`. Generation 0
//! is written without a suffix; every other generation is zero-padded to 12
//! digits so that lexical and numeric order agree.
//!
//! Decoding only accepts the canonical form produced by [`encode`], which
//! keeps the mapping collision-free: `hero~5.tunic` and
//! `hero~000000000005.tunic` cannot both claim `("hero", 5)`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DecodeError;

/// Extension shared by every save file (case-sensitive, without the dot).
pub const SAVE_EXTENSION: &str = "tunic";

/// Separates the slot name from the generation suffix.
pub const GENERATION_DELIMITER: char = '~';

/// Zero-padded width of a rendered generation.
pub const GENERATION_WIDTH: usize = 12;

/// A decoded save file: one generation of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Save {
    /// Identifier shared by all generations of the same save.
    pub slot_name: String,
    /// 0 when the filename carries no suffix.
    pub generation: u64,
}

impl Save {
    /// Create a save record.
    ///
    /// `slot_name` must be non-empty and free of [`GENERATION_DELIMITER`] for
    /// the record to survive an encode/decode round trip.
    pub fn new(slot_name: impl Into<String>, generation: u64) -> Self {
        Self {
            slot_name: slot_name.into(),
            generation,
        }
    }

    /// The on-disk filename for this save.
    pub fn file_name(&self) -> String {
        encode(self)
    }
}

impl fmt::Display for Save {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

/// Whether a directory entry name should be handed to [`decode`].
pub fn is_candidate_name(name: &str) -> bool {
    strip_extension(name).is_some()
}

/// Decode a save filename.
pub fn decode(filename: &str) -> Result<Save, DecodeError> {
    let stem = strip_extension(filename).ok_or_else(|| DecodeError::MissingExtension {
        filename: filename.to_string(),
        extension: SAVE_EXTENSION,
    })?;

    let (slot_name, generation) = match stem.rfind(GENERATION_DELIMITER) {
        None => (stem, 0),
        Some(idx) => {
            let slot_name = &stem[..idx];
            let suffix = &stem[idx + GENERATION_DELIMITER.len_utf8()..];
            let generation =
                parse_generation(suffix).ok_or_else(|| DecodeError::MalformedGeneration {
                    filename: filename.to_string(),
                    slot_name: slot_name.to_string(),
                    suffix: suffix.to_string(),
                })?;
            (slot_name, generation)
        }
    };

    if slot_name.is_empty() {
        return Err(DecodeError::EmptySlotName {
            filename: filename.to_string(),
        });
    }
    if slot_name.contains(GENERATION_DELIMITER) {
        return Err(DecodeError::InvalidSlotName {
            filename: filename.to_string(),
            slot_name: slot_name.to_string(),
        });
    }

    Ok(Save::new(slot_name, generation))
}

/// Encode a save as its on-disk filename.
pub fn encode(save: &Save) -> String {
    if save.generation == 0 {
        format!("{}.{}", save.slot_name, SAVE_EXTENSION)
    } else {
        format!(
            "{}{}{:0width$}.{}",
            save.slot_name,
            GENERATION_DELIMITER,
            save.generation,
            SAVE_EXTENSION,
            width = GENERATION_WIDTH
        )
    }
}

fn strip_extension(name: &str) -> Option<&str> {
    name.strip_suffix(SAVE_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
}

/// Parse a suffix, accepting only what [`encode`] would have written.
fn parse_generation(suffix: &str) -> Option<u64> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let generation: u64 = suffix.parse().ok()?;
    // Generation 0 never carries a suffix.
    if generation == 0 {
        return None;
    }
    if format!("{:0width$}", generation, width = GENERATION_WIDTH) != suffix {
        return None;
    }
    Some(generation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_without_suffix() {
        let save = decode("hero.tunic").unwrap();
        assert_eq!(save, Save::new("hero", 0));
    }

    #[test]
    fn test_decode_with_suffix() {
        let save = decode("hero~000000000003.tunic").unwrap();
        assert_eq!(save, Save::new("hero", 3));
    }

    #[test]
    fn test_decode_uses_last_delimiter() {
        let err = decode("a~b~000000000007.tunic").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidSlotName { ref slot_name, .. } if slot_name == "a~b"));
    }

    #[test]
    fn test_decode_keeps_dots_in_slot_name() {
        let save = decode("slot.backup~000000000002.tunic").unwrap();
        assert_eq!(save.slot_name, "slot.backup");
        assert_eq!(save.generation, 2);
    }

    #[test]
    fn test_decode_malformed_generation() {
        let err = decode("hero~abc.tunic").unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedGeneration {
                filename: "hero~abc.tunic".to_string(),
                slot_name: "hero".to_string(),
                suffix: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_rejects_non_canonical_generations() {
        for name in [
            "hero~3.tunic",
            "hero~+00000000003.tunic",
            "hero~-00000000003.tunic",
            "hero~000000000000.tunic",
            "hero~.tunic",
            "hero~ 00000000003.tunic",
        ] {
            let err = decode(name).unwrap_err();
            assert!(
                matches!(err, DecodeError::MalformedGeneration { .. }),
                "{name} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn test_decode_doubled_delimiter_is_rejected() {
        assert!(decode("weird~~12.tunic").is_err());
        assert!(decode("weird~~000000000012.tunic").is_err());
    }

    #[test]
    fn test_decode_empty_slot_name() {
        assert!(matches!(
            decode(".tunic").unwrap_err(),
            DecodeError::EmptySlotName { .. }
        ));
        assert!(matches!(
            decode("~000000000004.tunic").unwrap_err(),
            DecodeError::EmptySlotName { .. }
        ));
    }

    #[test]
    fn test_decode_extension_is_case_sensitive() {
        assert!(!is_candidate_name("hero.TUNIC"));
        assert!(!is_candidate_name("hero.tunic.bak"));
        assert!(!is_candidate_name("herotunic"));
        assert!(matches!(
            decode("hero.TUNIC").unwrap_err(),
            DecodeError::MissingExtension { .. }
        ));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(&Save::new("hero", 0)), "hero.tunic");
        assert_eq!(encode(&Save::new("hero", 3)), "hero~000000000003.tunic");
        assert_eq!(
            encode(&Save::new("hero", 123_456_789_012)),
            "hero~123456789012.tunic"
        );
    }

    #[test]
    fn test_encode_orders_lexically() {
        let mut names: Vec<String> = [10, 9, 100, 1]
            .into_iter()
            .map(|g| encode(&Save::new("hero", g)))
            .collect();
        names.sort();
        let generations: Vec<u64> = names.iter().map(|n| decode(n).unwrap().generation).collect();
        assert_eq!(generations, vec![1, 9, 10, 100]);
    }

    #[test]
    fn test_round_trip() {
        let saves = [
            Save::new("hero", 0),
            Save::new("hero", 1),
            Save::new("slot 2", 42),
            Save::new("ünïcode", 999_999_999_999),
            Save::new("wide", 1_000_000_000_000),
            Save::new("max", u64::MAX),
        ];
        for save in saves {
            assert_eq!(decode(&encode(&save)).unwrap(), save);
        }
    }

    #[test]
    fn test_display_is_file_name() {
        let save = Save::new("hero", 5);
        assert_eq!(save.to_string(), save.file_name());
    }
}
