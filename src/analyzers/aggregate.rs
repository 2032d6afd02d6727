use crate::analyzers::group::Group;
use crate::analyzers::types::{Field, NormalizedRecord, Role, RoleScores, TeacherStat};
use crate::analyzers::utility::ScoreAccumulator;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Complexity/interest question pairs for each teaching role.
const LECTURE_FIELDS: (Field, Field) = (Field::LectureComplexity, Field::LectureInterest);
const PRACTICE_FIELDS: (Field, Field) = (Field::PracticeComplexity, Field::PracticeInterest);

/// Averages one role's complexity and interest answers over `records`.
///
/// Each answer is parsed on its own, so a garbage complexity score does not
/// drop the same record's interest score.
pub fn role_scores(
    records: &[Arc<NormalizedRecord>],
    (complexity_field, interest_field): (Field, Field),
    precision: u32,
) -> RoleScores {
    let mut complexity = ScoreAccumulator::default();
    let mut interest = ScoreAccumulator::default();

    for record in records {
        complexity.push(record.field(complexity_field));
        interest.push(record.field(interest_field));
    }

    RoleScores {
        complexity: complexity.finish(precision),
        interest: interest.finish(precision),
    }
}

pub fn lecture_scores(records: &[Arc<NormalizedRecord>], precision: u32) -> RoleScores {
    role_scores(records, LECTURE_FIELDS, precision)
}

pub fn practice_scores(records: &[Arc<NormalizedRecord>], precision: u32) -> RoleScores {
    role_scores(records, PRACTICE_FIELDS, precision)
}

/// Builds per-person statistics across both roles.
///
/// `lecturers` is the lecturer grouping and `practitioners` the grouping by
/// resolved practitioner. A name present in both gets both score pairs and
/// [`Role::Both`]; names are matched exactly.
pub fn teacher_stats(
    lecturers: &Group,
    practitioners: &Group,
    precision: u32,
) -> BTreeMap<String, TeacherStat> {
    let mut stats: BTreeMap<String, TeacherStat> = lecturers
        .iter()
        .map(|(name, records)| {
            (
                name.to_string(),
                TeacherStat {
                    name: name.to_string(),
                    role: Role::Lecturer,
                    lecture: Some(lecture_scores(records, precision)),
                    practice: None,
                },
            )
        })
        .collect();

    for (name, records) in practitioners.iter() {
        let scores = practice_scores(records, precision);
        stats
            .entry(name.to_string())
            .and_modify(|stat| {
                stat.role = Role::Both;
                stat.practice = Some(scores);
            })
            .or_insert_with(|| TeacherStat {
                name: name.to_string(),
                role: Role::Practitioner,
                lecture: None,
                practice: Some(scores),
            });
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::group::{group_by, group_by_resolved_practitioner};
    use crate::analyzers::normalize::normalize;
    use crate::analyzers::types::RawEntry;
    use crate::config::SurveyConfig;

    #[test]
    fn test_lecture_scores_exclude_bad_answers_per_field() {
        let records = create_records(&[
            Response { lecturer: "А", lecture: ("x", "8"), ..Default::default() },
            Response { lecturer: "А", lecture: ("4", "—"), ..Default::default() },
            Response { lecturer: "А", lecture: ("6", ""), ..Default::default() },
        ]);
        let scores = lecture_scores(&records, 1);

        assert_eq!(scores.complexity.value, Some(5.0));
        assert_eq!(scores.complexity.count, 2);
        assert_eq!(scores.interest.value, Some(8.0));
        assert_eq!(scores.interest.count, 1);
    }

    #[test]
    fn test_precision_is_per_call() {
        let records = create_records(&[
            Response { lecturer: "А", lecture: ("1", "1"), ..Default::default() },
            Response { lecturer: "А", lecture: ("2", "1"), ..Default::default() },
            Response { lecturer: "А", lecture: ("2", "1"), ..Default::default() },
        ]);

        assert_eq!(lecture_scores(&records, 1).complexity.value, Some(1.7));
        assert_eq!(lecture_scores(&records, 2).complexity.value, Some(1.67));
    }

    #[test]
    fn test_practitioner_also_lecturer_is_merged() {
        let records = create_records(&[
            Response { lecturer: "A", lecture: ("3", "5"), practice: ("—", "—"), practitioner: "—" },
            Response { lecturer: "B", lecture: ("7", "7"), practice: ("2", "9"), practitioner: "A" },
        ]);
        let stats = build_stats(&records);

        let a = &stats["A"];
        assert_eq!(a.role, Role::Both);
        assert_eq!(a.lecture.unwrap().complexity.value, Some(3.0));
        assert_eq!(a.practice.unwrap().complexity.value, Some(2.0));
        assert_eq!(a.practice.unwrap().interest.value, Some(9.0));
    }

    #[test]
    fn test_practitioner_only_entry() {
        let records = create_records(&[Response {
            lecturer: "B",
            lecture: ("7", "7"),
            practice: ("4", "x"),
            practitioner: "P",
        }]);
        let stats = build_stats(&records);

        let p = &stats["P"];
        assert_eq!(p.role, Role::Practitioner);
        assert!(p.lecture.is_none());
        assert_eq!(p.practice.unwrap().complexity.value, Some(4.0));
        assert_eq!(p.practice.unwrap().interest.value, None);

        assert_eq!(stats["B"].role, Role::Lecturer);
        assert!(stats["B"].practice.is_none());
    }

    #[test]
    fn test_unnamed_practitioner_counts_for_lecturer() {
        let records = create_records(&[Response {
            lecturer: "A",
            lecture: ("3", "5"),
            practice: ("6", "6"),
            practitioner: "",
        }]);
        let stats = build_stats(&records);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats["A"].role, Role::Both);
        assert_eq!(stats["A"].practice.unwrap().interest.value, Some(6.0));
    }

    #[test]
    fn test_names_are_matched_exactly() {
        let records = create_records(&[
            Response { lecturer: "A", practitioner: "a", ..Default::default() },
        ]);
        let stats = build_stats(&records);

        assert_eq!(stats["A"].role, Role::Lecturer);
        assert_eq!(stats["a"].role, Role::Practitioner);
    }

    // Helper functions for tests
    #[derive(Default)]
    struct Response {
        lecturer: &'static str,
        lecture: (&'static str, &'static str),
        practice: (&'static str, &'static str),
        practitioner: &'static str,
    }

    fn create_records(rows: &[Response]) -> Vec<Arc<NormalizedRecord>> {
        let cfg = SurveyConfig::default();
        let q = &cfg.questions;
        rows.iter()
            .map(|r| {
                let entry: RawEntry = [
                    (q.lecturer.as_str(), r.lecturer),
                    (q.lecture_complexity.as_str(), r.lecture.0),
                    (q.lecture_interest.as_str(), r.lecture.1),
                    (q.practice_complexity.as_str(), r.practice.0),
                    (q.practice_interest.as_str(), r.practice.1),
                    (q.practitioner.as_str(), r.practitioner),
                ]
                .into_iter()
                .collect();
                Arc::new(normalize(&entry, &cfg))
            })
            .collect()
    }

    fn build_stats(records: &[Arc<NormalizedRecord>]) -> BTreeMap<String, TeacherStat> {
        let lecturers = group_by(records, Field::Lecturer);
        let practitioners = group_by_resolved_practitioner(records);
        teacher_stats(&lecturers, &practitioners, 1)
    }
}
