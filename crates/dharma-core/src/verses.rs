//! Verse Database - Static scriptural grounding references
//!
//! A fixed lookup table of Bhagavad Gita references keyed by the stable
//! identifier strings the scoring components export (principle ids, rule ids,
//! guna names). Higher-level glue uses it to annotate reports with
//! human-readable grounding text; the scoring core never depends on it.

use serde::Serialize;

/// A single scriptural reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verse {
    /// Canonical reference label, e.g. "BG 2.47"
    pub reference: &'static str,

    /// Chapter number
    pub chapter: u8,

    /// Verse number
    pub verse: u8,

    /// English rendering
    pub translation: &'static str,

    /// Identifier tags this verse grounds (principle ids, rule ids, gunas)
    pub topics: &'static [&'static str],
}

static VERSES: &[Verse] = &[
    Verse {
        reference: "BG 2.47",
        chapter: 2,
        verse: 47,
        translation: "You have a right to action alone, never to its fruits; let not the fruits of action be your motive.",
        topics: &["nishkama", "vairagya"],
    },
    Verse {
        reference: "BG 2.50",
        chapter: 2,
        verse: 50,
        translation: "Endowed with evenness of mind, one casts off both good and evil deeds; yoga is skill in action.",
        topics: &["viveka"],
    },
    Verse {
        reference: "BG 2.64",
        chapter: 2,
        verse: 64,
        translation: "One who moves among objects with the senses under restraint, free from attraction and aversion, attains tranquility.",
        topics: &["samyama", "samyama-boundary"],
    },
    Verse {
        reference: "BG 3.20",
        chapter: 3,
        verse: 20,
        translation: "By action alone Janaka and others attained perfection; you should act with the welfare of the world in view.",
        topics: &["lokasangraha", "seva"],
    },
    Verse {
        reference: "BG 3.25",
        chapter: 3,
        verse: 25,
        translation: "As the unwise act from attachment, so should the wise act without attachment, desiring the welfare of the world.",
        topics: &["seva", "nishkama"],
    },
    Verse {
        reference: "BG 3.35",
        chapter: 3,
        verse: 35,
        translation: "Better one's own duty, though imperfect, than the duty of another well performed.",
        topics: &["svadharma", "svadharma-scope"],
    },
    Verse {
        reference: "BG 6.10",
        chapter: 6,
        verse: 10,
        translation: "Let the yogi constantly discipline the self, remaining alone, with mind and body controlled, free from desire and possession.",
        topics: &["aparigraha", "aparigraha-boundary"],
    },
    Verse {
        reference: "BG 6.19",
        chapter: 6,
        verse: 19,
        translation: "As a lamp in a windless place does not flicker, so is the disciplined mind steady in concentration.",
        topics: &["sthairya"],
    },
    Verse {
        reference: "BG 6.35",
        chapter: 6,
        verse: 35,
        translation: "Doubtless the mind is restless and hard to restrain, but by practice and dispassion it is restrained.",
        topics: &["vairagya"],
    },
    Verse {
        reference: "BG 14.6",
        chapter: 14,
        verse: 6,
        translation: "Of these, sattva, being stainless, is luminous and free from ill; it binds by attachment to happiness and knowledge.",
        topics: &["sattva"],
    },
    Verse {
        reference: "BG 14.7",
        chapter: 14,
        verse: 7,
        translation: "Know rajas to be of the nature of passion, the source of thirst and attachment; it binds by attachment to action.",
        topics: &["rajas"],
    },
    Verse {
        reference: "BG 14.8",
        chapter: 14,
        verse: 8,
        translation: "Know tamas to be born of ignorance, deluding all beings; it binds by negligence, indolence and sleep.",
        topics: &["tamas"],
    },
    Verse {
        reference: "BG 16.2",
        chapter: 16,
        verse: 2,
        translation: "Non-violence, truth, absence of anger, renunciation, tranquility, absence of calumny, compassion to beings.",
        topics: &["ahimsa", "ahimsa-boundary"],
    },
    Verse {
        reference: "BG 17.15",
        chapter: 17,
        verse: 15,
        translation: "Speech that causes no distress, that is true, pleasant and beneficial, is the austerity of speech.",
        topics: &["satya", "satya-boundary"],
    },
    Verse {
        reference: "BG 18.30",
        chapter: 18,
        verse: 30,
        translation: "The intellect that knows action and inaction, what ought to be done and what not, fear and fearlessness, bondage and liberation, is sattvic.",
        topics: &["viveka"],
    },
];

/// Lookup interface over the static verse table
#[derive(Debug, Clone, Copy, Default)]
pub struct VerseDatabase;

impl VerseDatabase {
    /// Create a database handle
    pub fn new() -> Self {
        Self
    }

    /// All verses in canonical order
    pub fn all(&self) -> &'static [Verse] {
        VERSES
    }

    /// Lookup by canonical reference label; absence is `None`, not an error
    pub fn lookup(&self, reference: &str) -> Option<&'static Verse> {
        VERSES.iter().find(|v| v.reference == reference)
    }

    /// Lookup by chapter and verse number
    pub fn by_chapter_verse(&self, chapter: u8, verse: u8) -> Option<&'static Verse> {
        VERSES.iter().find(|v| v.chapter == chapter && v.verse == verse)
    }

    /// All verses grounding a given topic tag (principle id, rule id, guna)
    pub fn for_topic(&self, topic: &str) -> Vec<&'static Verse> {
        VERSES
            .iter()
            .filter(|v| v.topics.contains(&topic))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_reference() {
        let db = VerseDatabase::new();
        let verse = db.lookup("BG 2.47").unwrap();
        assert_eq!(verse.chapter, 2);
        assert_eq!(verse.verse, 47);
    }

    #[test]
    fn test_lookup_absent_is_none() {
        let db = VerseDatabase::new();
        assert!(db.lookup("BG 99.99").is_none());
    }

    #[test]
    fn test_by_chapter_verse() {
        let db = VerseDatabase::new();
        let verse = db.by_chapter_verse(17, 15).unwrap();
        assert_eq!(verse.reference, "BG 17.15");
    }

    #[test]
    fn test_default_principles_all_grounded() {
        let db = VerseDatabase::new();
        for id in ["viveka", "ahimsa", "satya", "seva", "vairagya"] {
            assert!(!db.for_topic(id).is_empty(), "no verse grounds {}", id);
        }
    }

    #[test]
    fn test_default_rules_all_grounded() {
        let db = VerseDatabase::new();
        for id in [
            "ahimsa-boundary",
            "satya-boundary",
            "aparigraha-boundary",
            "samyama-boundary",
            "svadharma-scope",
        ] {
            assert!(!db.for_topic(id).is_empty(), "no verse grounds {}", id);
        }
    }

    #[test]
    fn test_gunas_grounded() {
        let db = VerseDatabase::new();
        for guna in ["sattva", "rajas", "tamas"] {
            assert_eq!(db.for_topic(guna).len(), 1);
        }
    }
}
