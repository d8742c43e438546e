use crate::sheet::choice::Choice;

/// Visual state of a single bubble, a pure function of the mode, the two
/// stored selections for its question, and which option the bubble carries.
/// Mutually exclusive; picked mode-first, then correctness, then selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BubbleDisplay {
    /// Key mode: this option is the stored key answer.
    KeySelected,
    /// Key mode: any other option.
    KeyUnselected,
    /// Graded: the student chose this option and it matches the key.
    CorrectChosen,
    /// Graded: the student chose this option and it differs from the key.
    IncorrectChosen,
    /// Graded: the key answer, shown as a hint when the student didn't pick it.
    CorrectHint,
    /// Ungraded: the student's selection.
    PlainChosen,
    /// Everything else.
    PlainUnchosen,
}

pub fn bubble_display(
    key_mode: bool,
    answer: Option<Choice>,
    key: Option<Choice>,
    option: Choice,
) -> BubbleDisplay {
    if key_mode {
        return if key == Some(option) {
            BubbleDisplay::KeySelected
        } else {
            BubbleDisplay::KeyUnselected
        };
    }
    if let Some(k) = key {
        if answer == Some(option) {
            return if k == option {
                BubbleDisplay::CorrectChosen
            } else {
                BubbleDisplay::IncorrectChosen
            };
        }
        if k == option {
            return BubbleDisplay::CorrectHint;
        }
        return BubbleDisplay::PlainUnchosen;
    }
    if answer == Some(option) {
        BubbleDisplay::PlainChosen
    } else {
        BubbleDisplay::PlainUnchosen
    }
}

/// Status glyph next to a question number, shown only in answering mode once
/// the question is keyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowMarker {
    Correct,
    Incorrect,
    Unanswered,
}

impl RowMarker {
    pub fn glyph(self) -> &'static str {
        match self {
            RowMarker::Correct => "\u{2713}",   // ✓
            RowMarker::Incorrect => "\u{2717}", // ✗
            RowMarker::Unanswered => "\u{2014}", // —
        }
    }
}

pub fn row_marker(key_mode: bool, answer: Option<Choice>, key: Option<Choice>) -> Option<RowMarker> {
    if key_mode {
        return None;
    }
    let k = key?;
    Some(match answer {
        Some(a) if a == k => RowMarker::Correct,
        Some(_) => RowMarker::Incorrect,
        None => RowMarker::Unanswered,
    })
}
