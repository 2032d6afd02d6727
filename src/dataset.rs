//! The loaded survey as an immutable snapshot.
//!
//! A [`Dataset`] is built once from the input document and never mutated;
//! share it behind an `Arc`. Reloading means building a new one.

use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{info, warn};

use crate::analyzers::aggregate::teacher_stats;
use crate::analyzers::group::{Group, group_by, group_by_resolved_practitioner};
use crate::analyzers::normalize::normalize_all;
use crate::analyzers::types::{Field, NormalizedRecord, RawEntry, TeacherStat};
use crate::analyzers::views::{self, LecturerDetail, OverviewRow, ReviewFeed};
use crate::config::{Questions, STATS_PRECISION, SurveyConfig};
use crate::error::LookupError;
use crate::fetch::{HttpClient, load_bytes};
use crate::parser::parse_document;

pub struct Dataset {
    config: SurveyConfig,
    records: Vec<Arc<NormalizedRecord>>,
    lecturers: Group,
    practitioners: Group,
    teacher_stats: BTreeMap<String, TeacherStat>,
}

impl Dataset {
    /// Normalizes `entries` and precomputes the lecturer grouping and stats.
    pub fn from_entries(entries: &[RawEntry], config: SurveyConfig) -> Self {
        for (field, question) in config.questions.irregular_whitespace() {
            warn!(%field, question = ?question, "Canonical question has irregular whitespace");
        }
        for (question, field) in whitespace_near_misses(entries, &config.questions) {
            warn!(
                %field,
                question = ?question,
                "Question differs from a canonical question only in whitespace; not merged"
            );
        }

        let records: Vec<Arc<NormalizedRecord>> = normalize_all(entries, &config)
            .into_iter()
            .map(Arc::new)
            .collect();
        let lecturers = group_by(&records, Field::Lecturer);
        let practitioners = group_by_resolved_practitioner(&records);
        let teacher_stats = teacher_stats(&lecturers, &practitioners, STATS_PRECISION);

        info!(
            records = records.len(),
            lecturers = lecturers.len(),
            practitioners = practitioners.len(),
            "Survey dataset ready"
        );

        Self {
            config,
            records,
            lecturers,
            practitioners,
            teacher_stats,
        }
    }

    pub fn from_bytes(bytes: &[u8], config: SurveyConfig) -> Result<Self> {
        let entries = parse_document(bytes)?;
        Ok(Self::from_entries(&entries, config))
    }

    /// Loads and builds a snapshot from a path or URL. Any failure is fatal to the caller.
    #[tracing::instrument(skip(client, config))]
    pub async fn load<C: HttpClient>(
        client: &C,
        source: &str,
        config: SurveyConfig,
    ) -> Result<Arc<Self>> {
        let bytes = load_bytes(client, source).await?;
        Ok(Arc::new(Self::from_bytes(&bytes, config)?))
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// All records in input order.
    pub fn records(&self) -> &[Arc<NormalizedRecord>] {
        &self.records
    }

    /// Groups the records by any canonical field.
    pub fn group_by(&self, field: Field) -> Group {
        match field {
            Field::Lecturer => self.lecturers.clone(),
            _ => group_by(&self.records, field),
        }
    }

    pub fn lecturers(&self) -> &Group {
        &self.lecturers
    }

    /// Records grouped by resolved practitioner.
    pub fn practitioners(&self) -> &Group {
        &self.practitioners
    }

    /// Per-person statistics at the default one-decimal precision.
    pub fn teacher_stats(&self) -> &BTreeMap<String, TeacherStat> {
        &self.teacher_stats
    }

    pub fn teacher_stats_with_precision(&self, precision: u32) -> BTreeMap<String, TeacherStat> {
        teacher_stats(&self.lecturers, &self.practitioners, precision)
    }

    /// Responses filed under `name` in the lecturer grouping.
    pub fn lecturer_responses(&self, name: &str) -> Result<&[Arc<NormalizedRecord>], LookupError> {
        self.lecturers
            .get(name)
            .ok_or_else(|| LookupError::UnknownLecturer(name.to_string()))
    }

    pub fn overview(&self) -> Vec<OverviewRow> {
        views::overview(&self.lecturers, &self.config)
    }

    pub fn review_feed(&self) -> ReviewFeed {
        views::review_feed(&self.lecturers, &self.teacher_stats)
    }

    pub fn lecturer_detail(&self, name: &str) -> Result<LecturerDetail, LookupError> {
        views::lecturer_detail(&self.lecturers, name)
    }

    /// The normalized records in submission form, for export.
    pub fn to_raw(&self) -> Vec<RawEntry> {
        self.records.iter().map(|r| r.to_raw()).collect()
    }
}

/// Distinct raw questions that equal a canonical question only after
/// whitespace is collapsed, with the field they nearly match.
pub fn whitespace_near_misses(entries: &[RawEntry], questions: &Questions) -> Vec<(String, Field)> {
    let distinct: BTreeSet<&str> = entries.iter().flat_map(|e| e.iter().map(|(q, _)| q)).collect();
    distinct
        .into_iter()
        .filter_map(|q| questions.near_miss(q).map(|f| (q.to_string(), f)))
        .collect()
}
