//! Reversible share codes for replaying a simulated match.
//!
//! A code reads `<KIND>-<WORD><NN>` (`EX-DRAGON42`, `TR-BARON07`). The word and the two-digit
//! number pack into the low 13 bits of the seed; the remaining bits are a domain-separated hash
//! of those 13 bits, so every code maps to one full seed and back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Context a match was played in; encoded as the share-code prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exhibition,
    Tournament,
}

impl MatchKind {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Exhibition => "EX",
            Self::Tournament => "TR",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_uppercase().as_str() {
            "EX" => Some(Self::Exhibition),
            "TR" => Some(Self::Tournament),
            _ => None,
        }
    }

    const fn domain_byte(self) -> u8 {
        match self {
            Self::Exhibition => b'E',
            Self::Tournament => b'T',
        }
    }
}

const WORD_BITS: u32 = 6;
const NUMBER_BITS: u32 = 7;
const WORD_MASK: u64 = (1 << WORD_BITS) - 1;
const NUMBER_MASK: u64 = (1 << NUMBER_BITS) - 1;
/// Seed bits carried verbatim by a share code.
pub const SHARE_CODE_MASK: u64 = (1 << (WORD_BITS + NUMBER_BITS)) - 1;
const NUMBER_RANGE: u8 = 100;

pub const WORD_LIST: [&str; 64] = [
    "DRAGON", "BARON", "HERALD", "ELDER", "NEXUS", "TOWER", "INHIB", "JUNGLE", "RIVER", "BUFF",
    "GANK", "ROAM", "SPLIT", "PUSH", "WAVE", "FARM", "CARRY", "SUPPORT", "MIDLANE", "TOPLANE",
    "BOTLANE", "WARD", "VISION", "FLASH", "IGNITE", "SMITE", "TELEPORT", "ULT", "COMBO", "OUTPLAY",
    "PENTA", "QUADRA", "ACE", "SHUTDWN", "BOUNTY", "GOLD", "ITEMS", "SPIKE", "TEMPO", "MACRO",
    "MICRO", "DRAFT", "PICK", "BAN", "META", "PATCH", "SCRIM", "LEAGUE", "SEASON", "PLAYOFF",
    "FINALS", "BRACKET", "SEED", "ROSTER", "COACH", "SYNERGY", "FORM", "CLUTCH", "COMEBACK",
    "THROW", "SNOWBAL", "STOMP", "UPSET", "GG",
];

const _: () = assert!(WORD_LIST.len() == 1 << WORD_BITS);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareCodeError {
    #[error("share code {0:?} has no kind prefix")]
    MissingPrefix(String),
    #[error("unknown share code kind {0:?}")]
    UnknownKind(String),
    #[error("share code {0:?} must end in two digits")]
    BadNumber(String),
    #[error("unknown share code word {0:?}")]
    UnknownWord(String),
}

/// A decoded share code: match kind, word index, and two-digit number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShareCode {
    pub kind: MatchKind,
    word: u8,
    number: u8,
}

impl ShareCode {
    /// The code naming `seed`'s low bits. Numbers above 99 wrap, so only seeds built by
    /// [`ShareCode::seed`] are guaranteed to round-trip in full.
    #[must_use]
    pub fn from_seed(kind: MatchKind, seed: u64) -> Self {
        let word = u8::try_from(seed & WORD_MASK).unwrap_or(0);
        let number = u8::try_from((seed >> WORD_BITS) & NUMBER_MASK).unwrap_or(0) % NUMBER_RANGE;
        Self { kind, word, number }
    }

    #[must_use]
    pub fn word(&self) -> &'static str {
        WORD_LIST[usize::from(self.word) % WORD_LIST.len()]
    }

    #[must_use]
    pub const fn number(&self) -> u8 {
        self.number
    }

    fn packed(&self) -> u16 {
        u16::from(self.word) | (u16::from(self.number) << WORD_BITS)
    }

    /// Full simulation seed for this code.
    #[must_use]
    pub fn seed(&self) -> u64 {
        let packed = self.packed();
        let mut buf = [0_u8; 10];
        buf[..6].copy_from_slice(b"DRMLG-");
        buf[6] = self.kind.domain_byte();
        buf[7..9].copy_from_slice(&packed.to_le_bytes());
        buf[9] = 0xA5;
        (fnv1a64(&buf) & !SHARE_CODE_MASK) | u64::from(packed)
    }
}

impl fmt::Display for ShareCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}{:02}",
            self.kind.prefix(),
            self.word(),
            self.number
        )
    }
}

impl FromStr for ShareCode {
    type Err = ShareCodeError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let code = code.trim();
        let (prefix, rest) = code
            .split_once('-')
            .ok_or_else(|| ShareCodeError::MissingPrefix(code.to_string()))?;
        let kind = MatchKind::from_prefix(prefix)
            .ok_or_else(|| ShareCodeError::UnknownKind(prefix.to_string()))?;

        let split = rest.len().saturating_sub(2);
        let (word_part, digits) = match (rest.get(..split), rest.get(split..)) {
            (Some(word), Some(digits))
                if digits.len() == 2 && digits.bytes().all(|b| b.is_ascii_digit()) =>
            {
                (word, digits)
            }
            _ => return Err(ShareCodeError::BadNumber(code.to_string())),
        };
        let number = digits
            .parse::<u8>()
            .map_err(|_| ShareCodeError::BadNumber(code.to_string()))?;

        let wanted = sanitize_word(word_part);
        let word = WORD_LIST
            .iter()
            .position(|w| *w == wanted)
            .and_then(|idx| u8::try_from(idx).ok())
            .ok_or_else(|| ShareCodeError::UnknownWord(word_part.to_string()))?;
        Ok(Self { kind, word, number })
    }
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[must_use]
pub fn encode_friendly(kind: MatchKind, seed: u64) -> String {
    ShareCode::from_seed(kind, seed).to_string()
}

#[must_use]
pub fn decode_to_seed(code: &str) -> Option<(MatchKind, u64)> {
    let parsed: ShareCode = code.parse().ok()?;
    Some((parsed.kind, parsed.seed()))
}

/// A fresh share code drawn from arbitrary entropy (clock, OS randomness, ...).
#[must_use]
pub fn generate_code_from_entropy(kind: MatchKind, entropy: u64) -> String {
    let word = u8::try_from(entropy & WORD_MASK).unwrap_or(0);
    let number = u8::try_from((entropy >> 17) % u64::from(NUMBER_RANGE)).unwrap_or(0);
    ShareCode { kind, word, number }.to_string()
}

/// Parse a share code into its `MatchKind` and seed
#[must_use]
pub fn parse_share_code(code: &str) -> Option<(MatchKind, u64)> {
    decode_to_seed(code)
}
