//! Record normalization and default-lecturer resolution.

use crate::analyzers::types::{Field, NormalizedRecord, RawEntry};
use crate::config::{SENTINEL, SurveyConfig};

/// Collapses a raw response into one answer per question and fills the
/// `id`/`subject`/`lecturer` aliases.
///
/// Questions are matched byte-for-byte; variants that differ only in
/// whitespace stay separate. Repeated questions keep their longest answer,
/// the earliest one on a length tie.
pub fn normalize(entry: &RawEntry, config: &SurveyConfig) -> NormalizedRecord {
    let mut answers: Vec<(String, String)> = Vec::new();

    for (question, answer) in entry.iter() {
        match answers.iter_mut().find(|(q, _)| q == question) {
            Some((_, kept)) => {
                if answer.chars().count() > kept.chars().count() {
                    *kept = answer.to_string();
                }
            }
            None => answers.push((question.to_string(), answer.to_string())),
        }
    }

    let mut record = NormalizedRecord::new(answers);
    for (field, question) in config.questions.iter() {
        record.bind(field, question);
    }

    let [id, subject, lecturer] = [Field::Id, Field::Subject, Field::Lecturer].map(|field| {
        record
            .answer(config.questions.text(field))
            .unwrap_or(SENTINEL)
            .to_string()
    });
    record.id = id;
    record.subject = subject;
    record.lecturer = lecturer;

    resolve_default_lecturer(&mut record, config);
    record
}

/// Fills a blank lecturer from the subject's default, if the subject has one.
///
/// Only an empty answer or the sentinel counts as blank here.
pub fn resolve_default_lecturer(record: &mut NormalizedRecord, config: &SurveyConfig) {
    if !(record.lecturer.is_empty() || record.lecturer == SENTINEL) {
        return;
    }
    let Some(lecturer) = config.default_lecturer(&record.subject) else {
        return;
    };
    let lecturer = lecturer.to_string();
    record.set_field(Field::Lecturer, &config.questions.lecturer, &lecturer);
    record.lecturer = lecturer;
}

/// Normalizes every entry, preserving input order.
pub fn normalize_all(entries: &[RawEntry], config: &SurveyConfig) -> Vec<NormalizedRecord> {
    entries.iter().map(|e| normalize(e, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SurveyConfig {
        SurveyConfig::default()
    }

    fn entry(pairs: &[(&str, &str)]) -> RawEntry {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_single_answers_are_kept() {
        let q = cfg().questions;
        let record = normalize(
            &entry(&[(q.id.as_str(), "12"), (q.subject.as_str(), "Физика"), (q.lecturer.as_str(), "Иванов")]),
            &cfg(),
        );

        assert_eq!(record.id, "12");
        assert_eq!(record.subject, "Физика");
        assert_eq!(record.lecturer, "Иванов");
    }

    #[test]
    fn test_duplicate_question_keeps_longest_answer() {
        let record = normalize(
            &entry(&[("Теги", "аб"), ("Теги", "абвг"), ("Теги", "абв")]),
            &cfg(),
        );
        assert_eq!(record.answer("Теги"), Some("абвг"));
        assert_eq!(record.answers().count(), 1);
    }

    #[test]
    fn test_duplicate_question_tie_keeps_earliest() {
        let record = normalize(&entry(&[("Теги", "аа"), ("Теги", "бб"), ("Теги", "")]), &cfg());
        assert_eq!(record.answer("Теги"), Some("аа"));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // "abc" is 3 bytes and 3 chars, "жж" is 4 bytes but 2 chars
        let record = normalize(&entry(&[("Q", "жж"), ("Q", "abc")]), &cfg());
        assert_eq!(record.answer("Q"), Some("abc"));
    }

    #[test]
    fn test_missing_aliases_fall_back_to_sentinel() {
        let record = normalize(&entry(&[("Что-то", "ещё")]), &cfg());
        assert_eq!(record.id, SENTINEL);
        assert_eq!(record.subject, SENTINEL);
        assert_eq!(record.lecturer, SENTINEL);
    }

    #[test]
    fn test_whitespace_variant_is_not_merged() {
        let record = normalize(&entry(&[("Кто у тебя был лектором?", "Иванов")]), &cfg());
        assert_eq!(record.lecturer, SENTINEL);
        assert_eq!(record.answer("Кто у тебя был лектором?"), Some("Иванов"));
    }

    #[test]
    fn test_default_lecturer_fills_sentinel() {
        let q = cfg().questions;
        let record = normalize(
            &entry(&[(q.subject.as_str(), "Социальная история России"), (q.lecturer.as_str(), "—")]),
            &cfg(),
        );

        assert_eq!(record.lecturer, "Мунжукова Светлана Игоревна");
        assert_eq!(record.answer(&q.lecturer), Some("Мунжукова Светлана Игоревна"));
    }

    #[test]
    fn test_default_lecturer_fills_absent_question() {
        let q = cfg().questions;
        let record = normalize(&entry(&[(q.subject.as_str(), "История России и мира в ХХ веке")]), &cfg());

        assert_eq!(record.lecturer, "Пригодич Никита Дмитриевич");
        assert_eq!(record.field(Field::Lecturer), Some("Пригодич Никита Дмитриевич"));
        assert_eq!(record.answer(&q.lecturer), Some("Пригодич Никита Дмитриевич"));
    }

    #[test]
    fn test_default_lecturer_ignores_unknown_subject() {
        let q = cfg().questions;
        let record = normalize(&entry(&[(q.subject.as_str(), "Физика"), (q.lecturer.as_str(), "—")]), &cfg());
        assert_eq!(record.lecturer, SENTINEL);

        let record = normalize(&entry(&[(q.subject.as_str(), "Физика"), (q.lecturer.as_str(), "")]), &cfg());
        assert_eq!(record.lecturer, "");
    }

    #[test]
    fn test_named_lecturer_is_not_overwritten() {
        let q = cfg().questions;
        let record = normalize(
            &entry(&[(q.subject.as_str(), "Социальная история России"), (q.lecturer.as_str(), "Петров")]),
            &cfg(),
        );
        assert_eq!(record.lecturer, "Петров");
    }

    #[test]
    fn test_normalized_record_reloads_unchanged() {
        let q = cfg().questions;
        let record = normalize(
            &entry(&[
                (q.id.as_str(), "3"),
                (q.subject.as_str(), "Социальная история России"),
                ("Теги", "а"),
                ("Теги", "абв"),
            ]),
            &cfg(),
        );
        assert_eq!(normalize(&record.to_raw(), &cfg()), record);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn duplicate_answers_collapse_to_first_longest(
            answers in prop::collection::vec("[а-я ]{0,6}", 1..8)
        ) {
            let entry: RawEntry = answers.iter().map(|a| ("Вопрос", a.as_str())).collect();
            let record = normalize(&entry, &SurveyConfig::default());

            let longest = answers.iter().map(|a| a.chars().count()).max().unwrap_or(0);
            let expected = answers.iter().find(|a| a.chars().count() == longest).unwrap();
            prop_assert_eq!(record.answer("Вопрос"), Some(expected.as_str()));
        }
    }
}
