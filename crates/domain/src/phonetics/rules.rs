//! Confusion rules and example words for French phonemes
//!
//! Both tables are plain data. Adding a confusion pair or an example is a
//! one-line change to the arrays below; lookups are built once on first use
//! and are read-only afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;

use super::feedback::GENERIC_SUBSTITUTION;

/// Hint for an ordered (expected, produced) phoneme confusion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionRule {
    pub expected: &'static str,
    pub produced: &'static str,
    pub hint: &'static str,
}

/// Example word illustrating a single phoneme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleEntry {
    pub phoneme: &'static str,
    pub example: &'static str,
}

const fn rule(expected: &'static str, produced: &'static str, hint: &'static str) -> ConfusionRule {
    ConfusionRule {
        expected,
        produced,
        hint,
    }
}

const fn example(phoneme: &'static str, example: &'static str) -> ExampleEntry {
    ExampleEntry { phoneme, example }
}

/// Known confusions, keyed by (expected, produced)
pub static RULES: &[ConfusionRule] = &[
    // Oral vowels
    rule("y", "u", "French **u** /y/ is like 'ee' with rounded lips. Avoid English 'oo'."),
    rule("u", "y", "French **ou** /u/ is a pure 'oo' sound. Relax tongue, lips slightly rounded."),
    rule("e", "ɛ", "Close **é** /e/ needs higher tongue than **è** /ɛ/. Smile gently."),
    rule("ɛ", "e", "Open **è** /ɛ/ needs more open mouth than **é** /e/."),
    rule("ɛ", "u", "Open **è** /ɛ/ is spread and front. Don't round your lips into 'oo'."),
    rule("o", "ɔ", "Close **o** /o/ is tenser than **ɔ**. Round lips firmly."),
    rule("ɔ", "o", "Open **ɔ** is laxer than /o/. Open mouth slightly."),
    rule("i", "e", "French **i** /i/ is tense and high. Avoid laxing toward /e/."),
    rule("ø", "œ", "French **eu** /ø/ vs /œ/: round lips, adjust tongue height."),
    // Nasal vowels
    rule("ɑ̃", "a", "Nasal **an** /ɑ̃/: let air resonate through nose, don't add /n/."),
    rule("ɛ̃", "e", "Nasal **in** /ɛ̃/: open vowel, nasalize gently, avoid final /n/."),
    rule("ɔ̃", "o", "Nasal **on** /ɔ̃/: start near /ɔ/, nasalize, avoid 'on' with /n/."),
    rule("œ̃", "ø", "Nasal **un** /œ̃/: start from /ø/ and nasalize."),
    // R, sibilants, glides
    rule("ʁ", "r", "French **r** /ʁ/ is uvular, not English tap. Think gentle gargle."),
    rule("s", "z", "Voiceless **s** /s/, whisper it."),
    rule("z", "s", "Voiced **z** /z/, feel vibration in throat."),
    rule("ʃ", "ʒ", "**ch** /ʃ/ is voiceless, keep it soft."),
    rule("ʒ", "ʃ", "**j** /ʒ/ is voiced, add gentle buzz."),
    rule("ɥ", "j", "French **u-glide** /ɥ/ (as in 'huit'), round lips."),
    // Stops and fricatives
    rule("p", "b", "Voiceless **p** /p/ is unvoiced. Avoid sounding like English 'b'."),
    rule("b", "p", "Voiced **b** /b/ is voiced. Don't under-voice it."),
    rule("t", "d", "Voiceless **t** /t/ should not sound like 'd'. Place tongue on alveolar ridge."),
    rule("d", "t", "Voiced **d** /d/ should buzz slightly; don't overvoice like English 'd'."),
    rule("k", "g", "Voiceless **k** /k/ should not sound like 'g'. Tongue back and firm."),
    rule("g", "k", "Voiced **g** /g/ should sound firm, not like English 'k'."),
    rule("f", "v", "Voiceless **f** /f/ should not buzz. English 'v' is voiced."),
    rule("v", "f", "Voiced **v** /v/ should buzz. Avoid under-voicing."),
];

/// Example words, keyed by phoneme
pub static EXAMPLES: &[ExampleEntry] = &[
    example("y", "u in **lune**"),
    example("u", "ou in **tout**"),
    example("e", "é in **été**"),
    example("ɛ", "è in **mère**"),
    example("o", "o in **zéro**"),
    example("ɔ", "o in **port**"),
    example("ɑ̃", "an in **sans**"),
    example("ɛ̃", "in in **vin**"),
    example("ɔ̃", "on in **nom**"),
    example("œ̃", "un in **brun**"),
    example("ʁ", "r in **Paris**"),
    example("ʃ", "ch in **chat**"),
    example("ʒ", "j in **journal**"),
    example("s", "s in **sans**"),
    example("z", "z in **zéro**"),
    example("ɥ", "u-glide in **huit**"),
    example("j", "y-glide in **fille**"),
    example("p", "p in **pain**"),
    example("b", "b in **beau**"),
    example("t", "t in **temps**"),
    example("d", "d in **dame**"),
    example("k", "c in **clé**"),
    example("g", "g in **gare**"),
    example("f", "f in **faim**"),
    example("v", "v in **vin**"),
];

// Keys are normalized the same way tokens are, so lookups by token text
// always agree with the table regardless of how the source file encodes
// combining marks.
static RULE_INDEX: LazyLock<HashMap<(String, String), &'static str>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|r| ((normalize(r.expected), normalize(r.produced)), r.hint))
        .collect()
});

static EXAMPLE_INDEX: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    EXAMPLES
        .iter()
        .map(|e| (normalize(e.phoneme), e.example))
        .collect()
});

fn normalize(s: &str) -> String {
    s.nfkc().collect()
}

/// Specific hint for an (expected, produced) pair, if one is known
pub fn specific_rule_for(expected: &str, produced: &str) -> Option<&'static str> {
    RULE_INDEX
        .get(&(normalize(expected), normalize(produced)))
        .copied()
}

/// Hint for an (expected, produced) pair, falling back to a generic
/// substitution hint for unknown pairs
pub fn rule_for(expected: &str, produced: &str) -> &'static str {
    specific_rule_for(expected, produced).unwrap_or(GENERIC_SUBSTITUTION)
}

/// Example word for a phoneme
pub fn example_for(phoneme: &str) -> Option<&'static str> {
    EXAMPLE_INDEX.get(&normalize(phoneme)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_pair_returns_specific_hint() {
        assert!(rule_for("y", "u").contains("rounded lips"));
        assert!(rule_for("ʁ", "r").contains("uvular"));
    }

    #[test]
    fn rules_are_ordered_pairs() {
        assert_ne!(rule_for("s", "z"), rule_for("z", "s"));
    }

    #[test]
    fn unknown_pair_falls_back_to_generic() {
        assert_eq!(rule_for("ɥ", "z"), GENERIC_SUBSTITUTION);
        assert_eq!(specific_rule_for("ɥ", "z"), None);
    }

    #[test]
    fn nasal_vowels_resolve_in_either_encoding() {
        let composed: String = "ɔ̃".nfc().collect();
        let decomposed: String = "ɔ̃".nfd().collect();
        assert_eq!(rule_for(&composed, "o"), rule_for(&decomposed, "o"));
        assert!(rule_for(&composed, "o").starts_with("Nasal **on**"));
    }

    #[test]
    fn example_lookup() {
        assert_eq!(example_for("ɛ"), Some("è in **mère**"));
        assert_eq!(example_for("ɥ"), Some("u-glide in **huit**"));
        assert_eq!(example_for("n"), None);
        assert_eq!(example_for(""), None);
    }

    #[test]
    fn tables_have_no_duplicate_keys() {
        assert_eq!(RULE_INDEX.len(), RULES.len());
        assert_eq!(EXAMPLE_INDEX.len(), EXAMPLES.len());
    }

    #[test]
    fn every_rule_hint_is_non_empty() {
        assert!(RULES.iter().all(|r| !r.hint.trim().is_empty()));
        assert!(EXAMPLES.iter().all(|e| !e.example.trim().is_empty()));
    }
}
