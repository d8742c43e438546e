use crate::sheet::state::AnswerMap;

// One file per persisted record. The names are the original storage keys of
// the browser version of this sheet, so a record's bytes are portable between
// the two: answer maps are JSON objects keyed by the question number as a
// string, the mode is the JSON string literal "true" or "false".
pub const ANSWERS_FILE: &str = "toeic-student-answers.json";
pub const KEY_FILE: &str = "toeic-correct-answers.json";
pub const MODE_FILE: &str = "toeic-correction-mode.json";

/// Everything the sheet persists, as loaded at startup. Each field falls back
/// to its default independently when its record is missing or corrupt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistedSheet {
    pub answers: AnswerMap,
    pub key: AnswerMap,
    pub key_mode: bool,
}

pub fn encode_mode(key_mode: bool) -> &'static str {
    if key_mode { "true" } else { "false" }
}

/// Anything other than the exact literal "true" reads as answering mode.
pub fn decode_mode(raw: &str) -> bool {
    raw == "true"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_encoding_round_trips() {
        assert!(decode_mode(encode_mode(true)));
        assert!(!decode_mode(encode_mode(false)));
    }

    #[test]
    fn test_unknown_mode_literal_reads_as_answering() {
        assert!(!decode_mode("TRUE"));
        assert!(!decode_mode("1"));
        assert!(!decode_mode(""));
    }
}
