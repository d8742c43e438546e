use serde::{Deserialize, Serialize};

/// One of the four bubble options. "Unset" is the absence of a map entry,
/// never a fifth variant. Serializes as the bare letter ("A".."D") to match
/// the persisted record format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    pub fn as_char(self) -> char {
        match self {
            Choice::A => 'A',
            Choice::B => 'B',
            Choice::C => 'C',
            Choice::D => 'D',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'A' => Some(Choice::A),
            'B' => Some(Choice::B),
            'C' => Some(Choice::C),
            'D' => Some(Choice::D),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_letter() {
        assert_eq!(serde_json::to_string(&Choice::A).unwrap(), "\"A\"");
        assert_eq!(serde_json::from_str::<Choice>("\"D\"").unwrap(), Choice::D);
    }

    #[test]
    fn test_rejects_unknown_letters() {
        assert!(serde_json::from_str::<Choice>("\"E\"").is_err());
        assert!(serde_json::from_str::<Choice>("\"a\"").is_err());
    }

    #[test]
    fn test_from_char_case_insensitive() {
        assert_eq!(Choice::from_char('c'), Some(Choice::C));
        assert_eq!(Choice::from_char('C'), Some(Choice::C));
        assert_eq!(Choice::from_char('e'), None);
    }
}
