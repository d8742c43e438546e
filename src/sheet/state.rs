use std::collections::BTreeMap;

use crate::exam::TOTAL_QUESTIONS;
use crate::sheet::choice::Choice;

/// Question number -> selected option. An absent entry means unanswered.
pub type AnswerMap = BTreeMap<u16, Choice>;

/// The complete mutable state of the sheet: the student's answers, the
/// instructor's answer key, and which of the two the interface is capturing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetState {
    pub answers: AnswerMap,
    pub key: AnswerMap,
    pub key_mode: bool,
}

/// Every mutation of the sheet, as a tagged action applied through
/// [`SheetState::apply`]. No other mutation path exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Select { question: u16, choice: Choice },
    ClearAll,
    ClearSection { start: u16, end: u16 },
    ToggleMode,
    Reset,
}

/// Which persisted records an accepted action touched. The controller saves
/// exactly these, so persistence ordering is explicit rather than reactive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dirty {
    pub answers: bool,
    pub key: bool,
    pub mode: bool,
}

impl Dirty {
    pub fn any(self) -> bool {
        self.answers || self.key || self.mode
    }
}

impl SheetState {
    /// A question is locked once the key holds an entry for it and the sheet
    /// is back in answering mode. Asymmetric on purpose: key mode is never
    /// locked.
    pub fn locked(&self, question: u16) -> bool {
        !self.key_mode && self.key.contains_key(&question)
    }

    /// The store the current mode mutates.
    pub fn active(&self) -> &AnswerMap {
        if self.key_mode { &self.key } else { &self.answers }
    }

    fn active_mut(&mut self) -> &mut AnswerMap {
        if self.key_mode {
            &mut self.key
        } else {
            &mut self.answers
        }
    }

    /// Apply one action and report which records changed. Rejected actions
    /// (out-of-range question, locked select) leave the state untouched and
    /// return nothing dirty.
    pub fn apply(&mut self, action: Action) -> Dirty {
        match action {
            Action::Select { question, choice } => {
                if question == 0 || question > TOTAL_QUESTIONS {
                    return Dirty::default();
                }
                if !self.key_mode && self.locked(question) {
                    return Dirty::default();
                }
                let key_mode = self.key_mode;
                let map = self.active_mut();
                // Toggle rule: re-selecting the stored option removes it,
                // anything else overwrites. At most one option per question.
                if map.get(&question) == Some(&choice) {
                    map.remove(&question);
                } else {
                    map.insert(question, choice);
                }
                Dirty {
                    answers: !key_mode,
                    key: key_mode,
                    mode: false,
                }
            }
            Action::ClearAll => {
                let key_mode = self.key_mode;
                self.active_mut().clear();
                Dirty {
                    answers: !key_mode,
                    key: key_mode,
                    mode: false,
                }
            }
            Action::ClearSection { start, end } => {
                let key_mode = self.key_mode;
                self.active_mut().retain(|q, _| *q < start || *q > end);
                Dirty {
                    answers: !key_mode,
                    key: key_mode,
                    mode: false,
                }
            }
            Action::ToggleMode => {
                // Mode switches never touch either store.
                self.key_mode = !self.key_mode;
                Dirty {
                    answers: false,
                    key: false,
                    mode: true,
                }
            }
            Action::Reset => {
                self.answers.clear();
                self.key.clear();
                self.key_mode = false;
                Dirty {
                    answers: true,
                    key: true,
                    mode: true,
                }
            }
        }
    }
}
