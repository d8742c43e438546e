use crate::exam::{Part, Section, TOTAL_QUESTIONS};
use crate::sheet::state::AnswerMap;

/// Grading outcome for a single question. Ungraded means the student answered
/// but no key entry exists yet; it counts toward neither correct nor
/// incorrect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    Unanswered,
    Ungraded,
}

pub fn classify(answers: &AnswerMap, key: &AnswerMap, question: u16) -> Verdict {
    match (answers.get(&question), key.get(&question)) {
        (None, _) => Verdict::Unanswered,
        (Some(a), Some(k)) if a == k => Verdict::Correct,
        (Some(_), Some(_)) => Verdict::Incorrect,
        (Some(_), None) => Verdict::Ungraded,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub ungraded: usize,
}

impl Tally {
    pub fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Correct => self.correct += 1,
            Verdict::Incorrect => self.incorrect += 1,
            Verdict::Unanswered => self.unanswered += 1,
            Verdict::Ungraded => self.ungraded += 1,
        }
    }

    /// Always equals the length of the tallied range: every position is
    /// classified exactly once.
    pub fn total(&self) -> usize {
        self.correct + self.incorrect + self.unanswered + self.ungraded
    }
}

/// Tally a closed interval of question numbers.
pub fn tally_range(answers: &AnswerMap, key: &AnswerMap, start: u16, end: u16) -> Tally {
    let mut tally = Tally::default();
    for q in start..=end {
        tally.add(classify(answers, key, q));
    }
    tally
}

pub fn tally_all(answers: &AnswerMap, key: &AnswerMap) -> Tally {
    tally_range(answers, key, 1, TOTAL_QUESTIONS)
}

pub fn tally_section(answers: &AnswerMap, key: &AnswerMap, section: Section) -> Tally {
    let (start, end) = section.bounds();
    tally_range(answers, key, start, end)
}

pub fn tally_part(answers: &AnswerMap, key: &AnswerMap, part: &Part) -> Tally {
    tally_range(answers, key, part.start, part.end)
}

/// Percentage of `count` over `total`, for display with one decimal place.
pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// How many questions in [start, end] carry an entry in `map`. Used for the
/// progress display of whichever store is active.
pub fn answered_in(map: &AnswerMap, start: u16, end: u16) -> usize {
    map.range(start..=end).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::choice::Choice;

    fn map(entries: &[(u16, Choice)]) -> AnswerMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_matching_answer_is_correct() {
        let answers = map(&[(1, Choice::A)]);
        let key = map(&[(1, Choice::A)]);
        let tally = tally_all(&answers, &key);
        assert_eq!(tally.correct, 1);
        assert_eq!(tally.incorrect, 0);
    }

    #[test]
    fn test_mismatched_answer_is_incorrect() {
        let answers = map(&[(1, Choice::A)]);
        let key = map(&[(1, Choice::B)]);
        let tally = tally_all(&answers, &key);
        assert_eq!(tally.incorrect, 1);
        assert_eq!(tally.correct, 0);
    }

    #[test]
    fn test_keyed_but_unanswered_counts_as_unanswered() {
        let answers = AnswerMap::new();
        let key = map(&[(1, Choice::A)]);
        assert_eq!(classify(&answers, &key, 1), Verdict::Unanswered);
    }

    #[test]
    fn test_answered_without_key_is_ungraded() {
        let answers = map(&[(1, Choice::A)]);
        let key = AnswerMap::new();
        assert_eq!(classify(&answers, &key, 1), Verdict::Ungraded);
        let tally = tally_all(&answers, &key);
        assert_eq!(tally.ungraded, 1);
        assert_eq!(tally.correct + tally.incorrect, 0);
    }

    #[test]
    fn test_counts_always_sum_to_200() {
        let answers = map(&[
            (1, Choice::A),
            (2, Choice::B),
            (50, Choice::C),
            (150, Choice::D),
        ]);
        let key = map(&[(1, Choice::A), (2, Choice::C), (99, Choice::D)]);
        let tally = tally_all(&answers, &key);
        assert_eq!(tally.total(), 200);
        assert_eq!(tally.correct, 1);
        assert_eq!(tally.incorrect, 1);
        assert_eq!(tally.ungraded, 2);
        assert_eq!(tally.unanswered, 196);
    }

    #[test]
    fn test_section_tallies_sum_to_global() {
        let answers = map(&[(3, Choice::A), (100, Choice::B), (101, Choice::C)]);
        let key = map(&[(3, Choice::A), (100, Choice::A), (150, Choice::B)]);

        let listening = tally_section(&answers, &key, Section::Listening);
        let reading = tally_section(&answers, &key, Section::Reading);
        let global = tally_all(&answers, &key);

        assert_eq!(listening.total(), 100);
        assert_eq!(reading.total(), 100);
        assert_eq!(listening.correct + reading.correct, global.correct);
        assert_eq!(listening.incorrect + reading.incorrect, global.incorrect);
        assert_eq!(listening.unanswered + reading.unanswered, global.unanswered);
        assert_eq!(listening.ungraded + reading.ungraded, global.ungraded);
    }

    #[test]
    fn test_percent_one_decimal_rendering() {
        assert_eq!(format!("{:.1}", percent(1, 200)), "0.5");
        assert_eq!(format!("{:.1}", percent(100, 200)), "50.0");
        assert_eq!(format!("{:.1}", percent(0, 0)), "0.0");
    }

    #[test]
    fn test_answered_in_closed_interval() {
        let answers = map(&[(100, Choice::A), (101, Choice::A), (130, Choice::A)]);
        assert_eq!(answered_in(&answers, 101, 130), 2);
        assert_eq!(answered_in(&answers, 1, 100), 1);
    }
}
