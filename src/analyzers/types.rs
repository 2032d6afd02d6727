//! Data types used by the aggregation pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::SENTINEL;
use crate::error::FieldError;

/// One `[question, answer]` pair as submitted.
///
/// Answers are nullable in some exports; `None` behaves like an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPair(pub String, pub Option<String>);

/// A single survey response: ordered pairs, possibly repeating a question
/// (multi-select fields).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEntry(pub Vec<RawPair>);

impl RawEntry {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|RawPair(q, a)| (q.as_str(), a.as_deref().unwrap_or("")))
    }
}

impl<Q: Into<String>, A: Into<String>> FromIterator<(Q, A)> for RawEntry {
    fn from_iter<I: IntoIterator<Item = (Q, A)>>(iter: I) -> Self {
        RawEntry(
            iter.into_iter()
                .map(|(q, a)| RawPair(q.into(), Some(a.into())))
                .collect(),
        )
    }
}

/// Canonical survey fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Subject,
    Lecturer,
    Practitioner,
    LectureComplexity,
    LectureInterest,
    LectureFeedback,
    PracticeComplexity,
    PracticeInterest,
    PracticeFeedback,
}

impl Field {
    pub const COUNT: usize = 10;

    pub const ALL: [Field; Field::COUNT] = [
        Field::Id,
        Field::Subject,
        Field::Lecturer,
        Field::Practitioner,
        Field::LectureComplexity,
        Field::LectureInterest,
        Field::LectureFeedback,
        Field::PracticeComplexity,
        Field::PracticeInterest,
        Field::PracticeFeedback,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Subject => "subject",
            Field::Lecturer => "lecturer",
            Field::Practitioner => "practitioner",
            Field::LectureComplexity => "lecture_complexity",
            Field::LectureInterest => "lecture_interest",
            Field::LectureFeedback => "lecture_feedback",
            Field::PracticeComplexity => "practice_complexity",
            Field::PracticeInterest => "practice_interest",
            Field::PracticeFeedback => "practice_feedback",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| FieldError::Unknown(s.to_string()))
    }
}

/// A response collapsed to exactly one answer per question.
///
/// `id`, `subject` and `lecturer` are always set; they hold the sentinel
/// when the source question was absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub id: String,
    pub subject: String,
    pub lecturer: String,
    answers: Vec<(String, String)>,
    #[serde(skip)]
    canonical: [Option<usize>; Field::COUNT],
}

impl NormalizedRecord {
    pub(crate) fn new(answers: Vec<(String, String)>) -> Self {
        Self {
            id: SENTINEL.to_string(),
            subject: SENTINEL.to_string(),
            lecturer: SENTINEL.to_string(),
            answers,
            canonical: [None; Field::COUNT],
        }
    }

    /// Records that `field` is answered by the question at `question`.
    pub(crate) fn bind(&mut self, field: Field, question: &str) {
        self.canonical[field.slot()] = self.answers.iter().position(|(q, _)| q == question);
    }

    /// Overwrites (or appends) the answer for `question` and binds it to `field`.
    pub(crate) fn set_field(&mut self, field: Field, question: &str, value: &str) {
        match self.answers.iter().position(|(q, _)| q == question) {
            Some(i) => self.answers[i].1 = value.to_string(),
            None => self.answers.push((question.to_string(), value.to_string())),
        }
        self.bind(field, question);
    }

    /// Answer to an exact question text.
    pub fn answer(&self, question: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, a)| a.as_str())
    }

    /// All collapsed answers in first-seen question order.
    pub fn answers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.answers.iter().map(|(q, a)| (q.as_str(), a.as_str()))
    }

    /// Value of a canonical field, `None` when the survey did not ask it.
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => Some(&self.id),
            Field::Subject => Some(&self.subject),
            Field::Lecturer => Some(&self.lecturer),
            _ => self.canonical[field.slot()].map(|i| self.answers[i].1.as_str()),
        }
    }

    /// Value of a canonical field, or the sentinel when absent.
    pub fn field_or_sentinel(&self, field: Field) -> &str {
        self.field(field).unwrap_or(SENTINEL)
    }

    /// The practice instructor, falling back to `lecturer` when unnamed.
    pub fn resolved_practitioner<'a>(&'a self, lecturer: &'a str) -> &'a str {
        match self.field(Field::Practitioner) {
            Some(p) if !is_blank(p) => p,
            _ => lecturer,
        }
    }

    /// Converts back into submission form; normalizing the result yields an equal record.
    pub fn to_raw(&self) -> RawEntry {
        self.answers().collect()
    }
}

/// Empty, whitespace-only or the sentinel.
pub fn is_blank(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == SENTINEL
}

/// Mean of the successfully parsed answers; `value` is `None` when none parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreAverage {
    pub value: Option<f64>,
    pub count: usize,
}

/// Complexity and interest averages for one teaching role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RoleScores {
    pub complexity: ScoreAverage,
    pub interest: ScoreAverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Lecturer,
    Practitioner,
    Both,
}

/// Per-person aggregate across both teaching roles, keyed by exact name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherStat {
    pub name: String,
    pub role: Role,
    pub lecture: Option<RoleScores>,
    pub practice: Option<RoleScores>,
}
