//! Page-level projections over the lecturer grouping.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::analyzers::aggregate::lecture_scores;
use crate::analyzers::group::Group;
use crate::analyzers::types::{Field, NormalizedRecord, TeacherStat, is_blank};
use crate::config::{OVERVIEW_PRECISION, SENTINEL, SUBJECT_OVERFLOW_SUFFIX, SurveyConfig};
use crate::error::LookupError;

/// Number of subjects spelled out in an overview row.
const OVERVIEW_SUBJECTS: usize = 2;

/// One lecturer in the overview list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub name: String,
    pub complexity_avg: Option<f64>,
    pub interest_avg: Option<f64>,
    pub reviews: usize,
    pub subjects: String,
}

/// Scores and free-text feedback for one part of a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub complexity: String,
    pub interest: String,
    pub feedback: String,
}

impl Section {
    fn lectures(record: &NormalizedRecord) -> Self {
        Self::from_fields(
            record,
            Field::LectureComplexity,
            Field::LectureInterest,
            Field::LectureFeedback,
        )
    }

    fn practices(record: &NormalizedRecord) -> Self {
        Self::from_fields(
            record,
            Field::PracticeComplexity,
            Field::PracticeInterest,
            Field::PracticeFeedback,
        )
    }

    fn from_fields(record: &NormalizedRecord, complexity: Field, interest: Field, feedback: Field) -> Self {
        Self {
            complexity: record.field_or_sentinel(complexity).to_string(),
            interest: record.field_or_sentinel(interest).to_string(),
            feedback: record.field_or_sentinel(feedback).to_string(),
        }
    }
}

/// One response in the review feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRow {
    pub id: String,
    pub lecturer: String,
    pub practitioner: String,
    pub subject: String,
    pub lectures: Section,
    pub practices: Section,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectReviews {
    pub subject: String,
    pub reviews: Vec<ReviewRow>,
}

/// A lecturer and everyone who ran practice sessions under them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterEntry {
    pub lecturer: String,
    pub practitioners: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectTeacher {
    pub lecturer: String,
    pub practitioners: Vec<String>,
    pub stats: Option<TeacherStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectTeachers {
    pub subject: String,
    pub lecturers: Vec<SubjectTeacher>,
}

/// Every response, flat and by subject, with the filter and statistics tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewFeed {
    pub reviews: Vec<ReviewRow>,
    pub by_subject: Vec<SubjectReviews>,
    pub filters: Vec<FilterEntry>,
    pub subjects: Vec<SubjectTeachers>,
    pub teacher_stats: BTreeMap<String, TeacherStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailResponse {
    pub id: String,
    pub practitioner: String,
    pub lectures: Section,
    pub practices: Section,
}

/// A single lecturer's page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LecturerDetail {
    pub name: String,
    pub responses: Vec<DetailResponse>,
    /// Explicitly named practitioners, sorted.
    pub practitioners: Vec<String>,
}

/// Builds the overview list, one row per lecturer in grouping order.
pub fn overview(lecturers: &Group, config: &SurveyConfig) -> Vec<OverviewRow> {
    lecturers
        .iter()
        .map(|(name, records)| {
            let scores = lecture_scores(records, OVERVIEW_PRECISION);
            let subjects: BTreeSet<&str> = records
                .iter()
                .map(|r| r.subject.as_str())
                .filter(|s| !s.is_empty() && *s != SENTINEL)
                .collect();

            OverviewRow {
                name: name.to_string(),
                complexity_avg: scores.complexity.value,
                interest_avg: scores.interest.value,
                reviews: records.len(),
                subjects: subject_summary(&subjects, config),
            }
        })
        .collect()
}

/// Short names of the first two subjects, with a suffix when more exist.
pub fn subject_summary(subjects: &BTreeSet<&str>, config: &SurveyConfig) -> String {
    let mut summary = subjects
        .iter()
        .take(OVERVIEW_SUBJECTS)
        .map(|s| config.short_subject(s))
        .collect::<Vec<_>>()
        .join(", ");
    if subjects.len() > OVERVIEW_SUBJECTS {
        summary.push_str(SUBJECT_OVERFLOW_SUFFIX);
    }
    summary
}

/// Sort key for response ids: the numeric value, or 0 for non-numeric ids.
pub fn id_sort_key(id: &str) -> u128 {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    id.parse().unwrap_or(u128::MAX)
}

/// Stable sort by numeric id.
pub fn sort_by_id(rows: &mut [ReviewRow]) {
    rows.sort_by_key(|r| id_sort_key(&r.id));
}

/// One row per response, in lecturer-grouping order.
pub fn review_rows(lecturers: &Group) -> Vec<ReviewRow> {
    lecturers
        .iter()
        .flat_map(|(lecturer, records)| {
            records.iter().map(move |r| ReviewRow {
                id: r.field_or_sentinel(Field::Id).to_string(),
                lecturer: lecturer.to_string(),
                practitioner: r.resolved_practitioner(lecturer).to_string(),
                subject: r.field_or_sentinel(Field::Subject).to_string(),
                lectures: Section::lectures(r),
                practices: Section::practices(r),
            })
        })
        .collect()
}

/// Assembles the review feed from the lecturer grouping and precomputed stats.
pub fn review_feed(lecturers: &Group, teacher_stats: &BTreeMap<String, TeacherStat>) -> ReviewFeed {
    let rows = review_rows(lecturers);

    let mut by_subject: Vec<SubjectReviews> = Vec::new();
    let mut subject_index: HashMap<String, usize> = HashMap::new();
    let mut practitioners_of: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for row in &rows {
        let i = *subject_index.entry(row.subject.clone()).or_insert_with(|| {
            by_subject.push(SubjectReviews {
                subject: row.subject.clone(),
                reviews: Vec::new(),
            });
            by_subject.len() - 1
        });
        by_subject[i].reviews.push(row.clone());

        practitioners_of
            .entry(row.lecturer.clone())
            .or_default()
            .insert(row.practitioner.clone());
    }
    for group in &mut by_subject {
        sort_by_id(&mut group.reviews);
    }

    let filters = practitioners_of
        .iter()
        .map(|(lecturer, practitioners)| FilterEntry {
            lecturer: lecturer.clone(),
            practitioners: practitioners.iter().cloned().collect(),
        })
        .collect();

    let subjects = by_subject
        .iter()
        .map(|group| {
            let mut seen = BTreeSet::new();
            let lecturers = group
                .reviews
                .iter()
                .filter(|row| seen.insert(row.lecturer.as_str()))
                .map(|row| SubjectTeacher {
                    lecturer: row.lecturer.clone(),
                    practitioners: practitioners_of
                        .get(&row.lecturer)
                        .map(|p| p.iter().cloned().collect())
                        .unwrap_or_default(),
                    stats: teacher_stats.get(&row.lecturer).cloned(),
                })
                .collect();
            SubjectTeachers {
                subject: group.subject.clone(),
                lecturers,
            }
        })
        .collect();

    let mut reviews = rows;
    sort_by_id(&mut reviews);

    ReviewFeed {
        reviews,
        by_subject,
        filters,
        subjects,
        teacher_stats: teacher_stats.clone(),
    }
}

/// Builds a lecturer's page, or [`LookupError::UnknownLecturer`] when the
/// name is not a key of the lecturer grouping.
pub fn lecturer_detail(lecturers: &Group, name: &str) -> Result<LecturerDetail, LookupError> {
    let records = lecturers
        .get(name)
        .ok_or_else(|| LookupError::UnknownLecturer(name.to_string()))?;

    let practitioners: BTreeSet<String> = records
        .iter()
        .filter_map(|r| r.field(Field::Practitioner))
        .map(str::trim)
        .filter(|p| !is_blank(p))
        .map(str::to_string)
        .collect();

    let responses = records
        .iter()
        .map(|r| DetailResponse {
            id: r.field_or_sentinel(Field::Id).to_string(),
            practitioner: r.resolved_practitioner(name).to_string(),
            lectures: Section::lectures(r),
            practices: Section::practices(r),
        })
        .collect();

    Ok(LecturerDetail {
        name: name.to_string(),
        responses,
        practitioners: practitioners.into_iter().collect(),
    })
}
