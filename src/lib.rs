#![forbid(unsafe_code)]
//! Horaire — moteur de planification scolaire local (sans BD).
//!
//! - Expansion idempotente de modèles hebdomadaires en occurrences datées.
//! - Disponibilité enseignants (occupations + absences), règle de
//!   chevauchement unique et partagée.
//! - Édition de modèle en cascade (futur seulement), remplacements avec
//!   historique, décalages en bloc.
//! - Horodatages de notification par règle déclarative.
//! - Dates calendaires naïves (heure locale de l'école) ; heures "HH:MM".

pub mod engine;
pub mod io;
pub mod model;
pub mod notification;
pub mod storage;
pub mod timeutil;

pub use engine::{
    AssignmentChange, BatchReport, Engine, EngineError, GenerateReport, LeaveWindow, ShiftScope,
    SubstitutionChoice,
};
pub use model::{
    AssignmentId, GroupId, LeaveId, LeaveInterval, LeaveKind, LessonKind, LessonOccurrence,
    OccurrenceId, OccurrenceStatus, Schedule, SchoolId, Teacher, TeacherId, WeeklyAssignment,
};
pub use notification::{
    compute_fire_time, prepare_notice, Notice, NoticeRenderer, NotificationRule, TextNotice,
    Trigger,
};
pub use storage::{JsonStorage, Storage};
