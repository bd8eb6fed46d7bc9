use crate::model::{GroupId, LessonOccurrence, SchoolId, TeacherId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Changements applicables à un modèle hebdomadaire (jour/heures).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentChange {
    pub weekday: Option<u8>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl AssignmentChange {
    pub fn is_empty(&self) -> bool {
        self.weekday.is_none() && self.start_time.is_none() && self.end_time.is_none()
    }
}

/// Choix de couverture pour une occurrence touchée par une absence.
///
/// `Ignore` est un résultat légitime : le cours reste attribué à l'absent
/// (non couvert), ce n'est pas une erreur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionChoice {
    Assign(TeacherId),
    Ignore,
}

/// Périmètre d'un décalage de calendrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftScope {
    All,
    School(SchoolId),
    Group(GroupId),
}

impl ShiftScope {
    pub fn matches(&self, occurrence: &LessonOccurrence) -> bool {
        match self {
            ShiftScope::All => true,
            ShiftScope::School(id) => &occurrence.school == id,
            ShiftScope::Group(id) => &occurrence.group == id,
        }
    }
}

/// Bilan d'une génération : occurrences créées + créneaux ignorés car déjà
/// présents (issue normale d'une génération idempotente, pas une erreur).
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub created: Vec<LessonOccurrence>,
    pub skipped: usize,
}

/// Bilan d'une mutation en masse (cascade ou décalage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub updated_count: usize,
}

/// Fenêtre d'absence interrogée par le résolveur de remplacements.
#[derive(Debug, Clone, Copy)]
pub struct LeaveWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub full_day: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid time range: end must be after start")]
    InvalidTimeRange,
    #[error("invalid weekday {0}: expected 1..=7")]
    InvalidWeekday(u8),
    #[error("empty change set for assignment {0}")]
    EmptyChange(String),
    #[error("unknown teacher: {0}")]
    UnknownTeacher(String),
    #[error("unknown assignment: {0}")]
    UnknownAssignment(String),
    #[error("unknown occurrence: {0}")]
    UnknownOccurrence(String),
    #[error("unknown leave: {0}")]
    UnknownLeave(String),
    #[error("substitution invalid: {0}")]
    SubstitutionInvalid(&'static str),
    #[error("slot conflict on {0}: teacher already has a lesson at that time")]
    SlotConflict(chrono::NaiveDate),
    #[error("date arithmetic overflow")]
    DateOverflow,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
