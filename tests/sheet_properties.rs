use std::fs;

use marksheet::exam::{PARTS, Section, TOTAL_QUESTIONS, part_for, section_for};
use marksheet::sheet::choice::Choice;
use marksheet::sheet::scoring::{self, Verdict};
use marksheet::sheet::state::{Action, AnswerMap, Dirty, SheetState};
use marksheet::store::json_store::JsonStore;
use marksheet::store::schema::{ANSWERS_FILE, KEY_FILE, MODE_FILE};
use tempfile::TempDir;

fn select(question: u16, choice: Choice) -> Action {
    Action::Select { question, choice }
}

fn make_test_store() -> (TempDir, JsonStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

/// Selecting the stored value removes it, in both modes, for every question
/// and option. Two identical selects always return to the starting state.
#[test]
fn reselect_toggles_off_everywhere() {
    for key_mode in [false, true] {
        let mut state = SheetState::default();
        if key_mode {
            state.apply(Action::ToggleMode);
        }
        for q in 1..=TOTAL_QUESTIONS {
            for choice in Choice::ALL {
                let before = state.clone();
                state.apply(select(q, choice));
                assert_eq!(state.active().get(&q), Some(&choice));
                state.apply(select(q, choice));
                assert_eq!(state, before, "q{q} {choice:?} key_mode={key_mode}");
            }
        }
    }
}

#[test]
fn verdict_counts_partition_the_sheet() {
    let mut state = SheetState::default();
    state.apply(Action::ToggleMode);
    for q in 1..=150 {
        state.apply(select(q, Choice::B));
    }
    state.apply(Action::ToggleMode);
    for q in 1..=60 {
        state.apply(select(q, Choice::B)); // rejected: locked
    }
    for q in 151..=180 {
        state.apply(select(q, Choice::A)); // ungraded
    }

    let tally = scoring::tally_all(&state.answers, &state.key);
    assert_eq!(tally.total(), TOTAL_QUESTIONS as usize);
    assert_eq!(tally.correct, 0);
    assert_eq!(tally.incorrect, 0);
    assert_eq!(tally.ungraded, 30);
    assert_eq!(tally.unanswered, 170);
}

#[test]
fn section_tallies_sum_to_global() {
    let mut answers = AnswerMap::new();
    let mut key = AnswerMap::new();
    for q in (1..=TOTAL_QUESTIONS).step_by(3) {
        answers.insert(q, Choice::A);
    }
    for q in (1..=TOTAL_QUESTIONS).step_by(2) {
        key.insert(q, Choice::C);
    }

    let global = scoring::tally_all(&answers, &key);
    let listening = scoring::tally_section(&answers, &key, Section::Listening);
    let reading = scoring::tally_section(&answers, &key, Section::Reading);

    assert_eq!(listening.correct + reading.correct, global.correct);
    assert_eq!(listening.incorrect + reading.incorrect, global.incorrect);
    assert_eq!(listening.unanswered + reading.unanswered, global.unanswered);
    assert_eq!(listening.ungraded + reading.ungraded, global.ungraded);

    let part_total: usize = PARTS
        .iter()
        .map(|p| scoring::tally_part(&answers, &key, p).total())
        .sum();
    assert_eq!(part_total, TOTAL_QUESTIONS as usize);
}

#[test]
fn exam_structure_covers_every_question_once() {
    for q in 1..=TOTAL_QUESTIONS {
        assert!(section_for(q).is_some(), "q{q} has no section");
        assert!(part_for(q).is_some(), "q{q} has no part");
    }
    assert!(section_for(0).is_none());
    assert!(section_for(201).is_none());
}

#[test]
fn clear_section_is_a_closed_interval() {
    let mut state = SheetState::default();
    for q in [100, 101, 115, 130, 131] {
        state.apply(select(q, Choice::D));
    }
    state.apply(Action::ClearSection {
        start: 101,
        end: 130,
    });
    let remaining: Vec<u16> = state.answers.keys().copied().collect();
    assert_eq!(remaining, vec![100, 131]);
}

#[test]
fn reset_restores_a_usable_blank_sheet() {
    let mut state = SheetState::default();
    state.apply(Action::ToggleMode);
    state.apply(select(1, Choice::A));
    state.apply(Action::ToggleMode);

    state.apply(Action::Reset);
    assert!(state.answers.is_empty());
    assert!(state.key.is_empty());
    assert!(!state.key_mode);

    // Question 1 is no longer locked after the key is gone.
    let dirty = state.apply(select(1, Choice::B));
    assert!(dirty.answers);
    assert_eq!(scoring::classify(&state.answers, &state.key, 1), Verdict::Ungraded);
}

#[test]
fn locked_questions_reject_answering_but_not_keying() {
    let mut state = SheetState::default();
    state.apply(Action::ToggleMode);
    state.apply(select(31, Choice::C));
    state.apply(Action::ToggleMode);

    assert!(state.locked(31));
    assert_eq!(state.apply(select(31, Choice::A)), Dirty::default());

    state.apply(Action::ToggleMode);
    assert!(!state.locked(31));
    let dirty = state.apply(select(31, Choice::D));
    assert!(dirty.key);
    assert_eq!(state.key.get(&31), Some(&Choice::D));
}

#[test]
fn store_round_trips_full_sheet_state() {
    let (dir, store) = make_test_store();

    let mut answers = AnswerMap::new();
    let mut key = AnswerMap::new();
    for q in 1..=TOTAL_QUESTIONS {
        answers.insert(q, Choice::ALL[(q % 4) as usize]);
        if q % 2 == 0 {
            key.insert(q, Choice::ALL[(q % 3) as usize]);
        }
    }
    store.save_answers(&answers).unwrap();
    store.save_key(&key).unwrap();
    store.save_mode(true).unwrap();

    let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let loaded = reopened.load_all();
    assert_eq!(loaded.answers, answers);
    assert_eq!(loaded.key, key);
    assert!(loaded.key_mode);
}

#[test]
fn corrupt_answers_record_does_not_blank_the_key() {
    let (_dir, store) = make_test_store();
    let key: AnswerMap = [(5, Choice::B)].into_iter().collect();
    store.save_key(&key).unwrap();
    store.save_mode(true).unwrap();
    fs::write(store.file_path(ANSWERS_FILE), "{\"oops").unwrap();

    let loaded = store.load_all();
    assert!(loaded.answers.is_empty());
    assert_eq!(loaded.key, key);
    assert!(loaded.key_mode);
}

#[test]
fn persisted_records_use_the_expected_wire_format() {
    let (_dir, store) = make_test_store();
    let answers: AnswerMap = [(7, Choice::B), (147, Choice::D)].into_iter().collect();
    store.save_answers(&answers).unwrap();
    store.save_mode(true).unwrap();

    let raw = fs::read_to_string(store.file_path(ANSWERS_FILE)).unwrap();
    assert_eq!(raw, r#"{"7":"B","147":"D"}"#);
    let raw = fs::read_to_string(store.file_path(MODE_FILE)).unwrap();
    assert_eq!(raw, "\"true\"");
}

#[test]
fn only_exact_true_enables_key_mode() {
    let (_dir, store) = make_test_store();
    for raw in ["\"false\"", "\"True\"", "\"yes\"", "\"1\"", "\"\""] {
        fs::write(store.file_path(MODE_FILE), raw).unwrap();
        assert!(!store.load_mode().unwrap(), "raw {raw} decoded as true");
    }
    fs::write(store.file_path(MODE_FILE), "\"true\"").unwrap();
    assert!(store.load_mode().unwrap());
}

#[test]
fn remove_then_load_is_empty() {
    let (_dir, store) = make_test_store();
    store
        .save_answers(&[(1, Choice::A)].into_iter().collect())
        .unwrap();
    store
        .save_key(&[(2, Choice::B)].into_iter().collect())
        .unwrap();
    store.save_mode(true).unwrap();

    store.remove_answers().unwrap();
    store.remove_key().unwrap();
    store.remove_mode().unwrap();

    assert!(!store.file_path(ANSWERS_FILE).exists());
    assert!(!store.file_path(KEY_FILE).exists());
    assert!(!store.file_path(MODE_FILE).exists());
    let loaded = store.load_all();
    assert!(loaded.answers.is_empty() && loaded.key.is_empty() && !loaded.key_mode);
}
