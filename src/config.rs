//! Static survey configuration.
//!
//! The canonical question strings must match the survey export byte-for-byte,
//! including any stray whitespace. [`SurveyConfig::default`] carries the strings
//! of the history-course feedback form; a JSON file can override any part:
//!
//! ```json
//! {
//!   "questions": { "lecturer": "Кто у тебя был лектором?" },
//!   "default_lecturers": { "Социальная история России": "Мунжукова Светлана Игоревна" },
//!   "subject_short_names": { "Социальная история России": "Социальная история" }
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::analyzers::types::Field;

/// Placeholder for an absent or empty display field.
pub const SENTINEL: &str = "—";

/// Appended to the overview subject list when a lecturer teaches more than two subjects.
pub const SUBJECT_OVERFLOW_SUFFIX: &str = "…";

/// Decimal places used for the teacher statistics table.
pub const STATS_PRECISION: u32 = 1;

/// Decimal places used for the lecturer overview list.
pub const OVERVIEW_PRECISION: u32 = 2;

/// Exact question texts as they appear in the survey export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Questions {
    pub id: String,
    pub subject: String,
    pub lecturer: String,
    pub practitioner: String,
    pub lecture_complexity: String,
    pub lecture_interest: String,
    pub lecture_feedback: String,
    pub practice_complexity: String,
    pub practice_interest: String,
    pub practice_feedback: String,
}

impl Default for Questions {
    fn default() -> Self {
        Self {
            id: "ID".into(),
            subject: "Какой предмет у тебя был?".into(),
            // two spaces after "Кто"
            lecturer: "Кто  у тебя был лектором?".into(),
            practitioner: "Кто у тебя был практиком?".into(),
            lecture_complexity: "Оцени степень сложности лекций".into(),
            // leading space
            lecture_interest: " Оцени степень интересности лекций".into(),
            lecture_feedback: "Что можешь рассказать о лекциях, преподавателе, что делали ? Тут можно расписать что угодно, всё что ты считаешь важным. Эта информация будет передана следующим поколениям.".into(),
            practice_complexity: "Оцени степень сложности практик".into(),
            practice_interest: "Оцени степень интересности практик".into(),
            practice_feedback: "Что можешь рассказать о практиках, преподавателе, чем занимались? Тут можно расписать что угодно, всё что ты считаешь важным. Эта информация будет передана следующим поколениям.".into(),
        }
    }
}

impl Questions {
    /// Returns the exact question text backing `field`.
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Subject => &self.subject,
            Field::Lecturer => &self.lecturer,
            Field::Practitioner => &self.practitioner,
            Field::LectureComplexity => &self.lecture_complexity,
            Field::LectureInterest => &self.lecture_interest,
            Field::LectureFeedback => &self.lecture_feedback,
            Field::PracticeComplexity => &self.practice_complexity,
            Field::PracticeInterest => &self.practice_interest,
            Field::PracticeFeedback => &self.practice_feedback,
        }
    }

    /// Iterates over `(field, question)` for every canonical field.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(move |f| (f, self.text(f)))
    }

    /// Fields whose question text has leading, trailing or repeated whitespace.
    pub fn irregular_whitespace(&self) -> Vec<(Field, &str)> {
        self.iter()
            .filter(|(_, q)| collapse_whitespace(q) != *q)
            .collect()
    }

    /// Returns the canonical field whose question equals `question` once
    /// whitespace is collapsed, but which does not match byte-for-byte.
    pub fn near_miss(&self, question: &str) -> Option<Field> {
        let collapsed = collapse_whitespace(question);
        self.iter()
            .find(|(_, q)| *q != question && collapse_whitespace(q) == collapsed)
            .map(|(f, _)| f)
    }
}

/// Trims and collapses internal runs of whitespace to a single space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Subject tables and question strings consumed by the aggregation core.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub questions: Questions,
    /// subject → lecturer used when a response leaves the lecturer blank.
    pub default_lecturers: BTreeMap<String, String>,
    /// subject → display name for the overview list.
    pub subject_short_names: BTreeMap<String, String>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        let default_lecturers = [
            (
                "Реформы и реформаторы в истории России",
                "Вычеров Дмитрий Александрович",
            ),
            (
                "Россия в истории современных международных отношений",
                "Богомазов Николай Иванович",
            ),
            (
                "История России и мира в ХХ веке",
                "Пригодич Никита Дмитриевич",
            ),
            ("Социальная история России", "Мунжукова Светлана Игоревна"),
            (
                "История русской культуры в контексте мировой культуры",
                "Жиркова Галина Петровна",
            ),
            (
                "История российской науки и техники",
                "Васильев Андрей Владимирович, Белоусов Александр Сергеевич",
            ),
        ];
        let subject_short_names = [
            ("Реформы и реформаторы в истории России", "Реформы и реформаторы"),
            (
                "Россия в истории современных международных отношений",
                "Международные отношения",
            ),
            ("История России и мира в ХХ веке", "ХХ век"),
            ("Социальная история России", "Социальная история"),
            (
                "История русской культуры в контексте мировой культуры",
                "Российская культуры",
            ),
            ("История российской науки и техники", "Наука и техника"),
        ];

        Self {
            questions: Questions::default(),
            default_lecturers: to_map(&default_lecturers),
            subject_short_names: to_map(&subject_short_names),
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl SurveyConfig {
    /// Loads an override file. Keys missing from the file keep their built-in values.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid JSON in config: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Returns the default lecturer for `subject`, if one is configured.
    pub fn default_lecturer(&self, subject: &str) -> Option<&str> {
        self.default_lecturers.get(subject).map(String::as_str)
    }

    /// Returns the short display name for `subject`, falling back to the subject itself.
    pub fn short_subject<'a>(&'a self, subject: &'a str) -> &'a str {
        self.subject_short_names
            .get(subject)
            .map(String::as_str)
            .unwrap_or(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_questions_keep_stray_whitespace() {
        let q = Questions::default();
        assert_eq!(q.lecturer, "Кто  у тебя был лектором?");
        assert!(q.lecture_interest.starts_with(' '));
    }

    #[test]
    fn test_irregular_whitespace_flags_known_questions() {
        let flagged: Vec<Field> = Questions::default()
            .irregular_whitespace()
            .into_iter()
            .map(|(f, _)| f)
            .collect();
        assert_eq!(flagged, vec![Field::Lecturer, Field::LectureInterest]);
    }

    #[test]
    fn test_near_miss_detects_whitespace_variant() {
        let q = Questions::default();
        assert_eq!(q.near_miss("Кто у тебя был лектором?"), Some(Field::Lecturer));
        assert_eq!(q.near_miss("Кто  у тебя был лектором?"), None);
        assert_eq!(q.near_miss("Совсем другой вопрос"), None);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let cfg = SurveyConfig::from_json(
            r#"{ "questions": { "id": "Номер" }, "default_lecturers": { "Физика": "Иванов" } }"#,
        )
        .unwrap();

        assert_eq!(cfg.questions.id, "Номер");
        assert_eq!(cfg.questions.subject, "Какой предмет у тебя был?");
        assert_eq!(cfg.default_lecturer("Физика"), Some("Иванов"));
        assert_eq!(cfg.default_lecturer("Социальная история России"), None);
        assert_eq!(cfg.subject_short_names.len(), 6);
    }

    #[test]
    fn test_short_subject_falls_back_to_full_name() {
        let cfg = SurveyConfig::default();
        assert_eq!(cfg.short_subject("История России и мира в ХХ веке"), "ХХ век");
        assert_eq!(cfg.short_subject("Неизвестный курс"), "Неизвестный курс");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = std::env::temp_dir().join("course_feedback_missing_config.json");
        let _ = std::fs::remove_file(&path);
        assert!(SurveyConfig::load(&path).is_err());
    }
}
