mod availability;
mod cascade;
mod generate;
mod leave;
mod shift;
mod types;

pub use types::{
    AssignmentChange, BatchReport, EngineError, GenerateReport, LeaveWindow, ShiftScope,
    SubstitutionChoice,
};

use crate::model::{
    AssignmentId, GroupId, LeaveId, LeaveInterval, LeaveKind, LessonKind, LessonOccurrence,
    OccurrenceId, OccurrenceStatus, Schedule, SchoolId, Teacher, TeacherId, WeeklyAssignment,
};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;

/// Moteur : encapsule un Schedule en cours de manipulation.
///
/// Toutes les opérations sont synchrones et mono-thread ; les mutations en
/// masse valident tout avant d'écrire (tout ou rien).
#[derive(Debug, Default)]
pub struct Engine {
    schedule: Schedule,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            schedule: Schedule::default(),
        }
    }

    pub fn from_schedule(schedule: Schedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
    pub fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    pub fn add_teachers(&mut self, teachers: Vec<Teacher>) {
        self.schedule.teachers.extend(teachers);
    }

    /// Crée un modèle hebdomadaire après validation (enseignant connu,
    /// jour ISO, heures cohérentes).
    pub fn create_assignment(
        &mut self,
        school: SchoolId,
        group: GroupId,
        teacher: TeacherId,
        weekday: u8,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<AssignmentId, EngineError> {
        if self.schedule.find_teacher(&teacher).is_none() {
            return Err(EngineError::UnknownTeacher(teacher.as_str().to_string()));
        }
        if !(1..=7).contains(&weekday) {
            return Err(EngineError::InvalidWeekday(weekday));
        }
        if end_time <= start_time {
            return Err(EngineError::InvalidTimeRange);
        }
        let assignment = WeeklyAssignment::new(school, group, teacher, weekday, start_time, end_time)
            .map_err(|_| EngineError::InvalidTimeRange)?;
        let id = assignment.id.clone();
        self.schedule.assignments.push(assignment);
        Ok(id)
    }

    /// Insère manuellement une occurrence (rattrapage ou cours extra).
    /// Retourne `None` si le créneau `(date, start, teacher)` est déjà pris.
    pub fn add_occurrence(
        &mut self,
        school: SchoolId,
        group: GroupId,
        teacher: TeacherId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        kind: LessonKind,
    ) -> Result<Option<OccurrenceId>, EngineError> {
        if self.schedule.find_teacher(&teacher).is_none() {
            return Err(EngineError::UnknownTeacher(teacher.as_str().to_string()));
        }
        let occurrence =
            LessonOccurrence::new(school, group, teacher, date, start_time, end_time, kind)
                .map_err(|_| EngineError::InvalidTimeRange)?;
        let id = occurrence.id.clone();
        if self.schedule.insert_occurrence(occurrence) {
            Ok(Some(id))
        } else {
            Ok(None)
        }
    }

    /// Pose une absence. Ne modifie aucune occurrence : la couverture passe
    /// par `apply_substitutions`.
    pub fn add_leave(
        &mut self,
        teacher: TeacherId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
        kind: LeaveKind,
        reason: Option<String>,
    ) -> Result<LeaveId, EngineError> {
        if self.schedule.find_teacher(&teacher).is_none() {
            return Err(EngineError::UnknownTeacher(teacher.as_str().to_string()));
        }
        if let (Some(s), Some(e)) = (start_time, end_time) {
            if e <= s {
                return Err(EngineError::InvalidTimeRange);
            }
        }
        let mut interval = LeaveInterval::new(teacher, start_date, end_date, kind)
            .map_err(|_| EngineError::InvalidTimeRange)?;
        interval.start_time = start_time;
        interval.end_time = end_time;
        interval.reason = reason;
        let id = interval.id.clone();
        self.schedule.leaves.push(interval);
        Ok(id)
    }

    /// Expansion des modèles hebdomadaires sur `week_count` semaines à
    /// partir de `start_date` (idempotent).
    pub fn generate(
        &mut self,
        start_date: NaiveDate,
        week_count: u32,
    ) -> Result<GenerateReport, EngineError> {
        generate::generate(self, start_date, week_count)
    }

    /// Enseignants actifs libres sur `[start_time, end_time)` à `date`.
    /// Liste vide = personne de libre, pas une erreur.
    pub fn find_available_teachers(
        &self,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Vec<TeacherId> {
        availability::find_available_teachers(&self.schedule, date, start_time, end_time)
    }

    /// Édite un modèle ; avec `cascade`, répercute le nouveau jour/horaire sur
    /// les occurrences futures encore planifiées (jamais sur le passé).
    pub fn update_assignment(
        &mut self,
        id: &AssignmentId,
        change: AssignmentChange,
        cascade: bool,
        cutoff: NaiveDate,
    ) -> Result<BatchReport, EngineError> {
        cascade::update_assignment(self, id, change, cascade, cutoff)
    }

    /// Occurrences non annulées touchées par une fenêtre d'absence.
    pub fn find_affected_occurrences(
        &self,
        teacher: &TeacherId,
        window: LeaveWindow,
    ) -> Vec<&LessonOccurrence> {
        leave::find_affected_occurrences(&self.schedule, teacher, window)
    }

    /// Occurrences touchées par une absence déjà enregistrée.
    pub fn affected_by_leave(
        &self,
        leave_id: &LeaveId,
    ) -> Result<Vec<&LessonOccurrence>, EngineError> {
        let interval = self
            .schedule
            .find_leave(leave_id)
            .ok_or_else(|| EngineError::UnknownLeave(leave_id.as_str().to_string()))?;
        let window = LeaveWindow {
            start_date: interval.start_date,
            end_date: interval.end_date,
            full_day: interval.is_full_day(),
            start_time: interval.start_time,
            end_time: interval.end_time,
        };
        Ok(leave::find_affected_occurrences(
            &self.schedule,
            &interval.teacher,
            window,
        ))
    }

    /// Applique les choix de couverture d'une absence. Retourne le nombre
    /// d'occurrences effectivement re-staffées (les `Ignore` ne comptent pas).
    pub fn apply_substitutions(
        &mut self,
        leave_id: &LeaveId,
        choices: &HashMap<OccurrenceId, SubstitutionChoice>,
    ) -> Result<usize, EngineError> {
        leave::apply_substitutions(self, leave_id, choices)
    }

    /// Décale en bloc les occurrences planifiées datées à partir de `cutoff`.
    pub fn shift_schedule(
        &mut self,
        scope: &ShiftScope,
        cutoff: NaiveDate,
        day_delta: i64,
    ) -> Result<BatchReport, EngineError> {
        shift::shift_schedule(self, scope, cutoff, day_delta)
    }

    /// Annulation explicite (seule voie de sortie d'une occurrence : les
    /// opérations en cascade ne suppriment jamais rien en silence).
    pub fn cancel_occurrence(
        &mut self,
        id: &OccurrenceId,
        reason: Option<String>,
    ) -> Result<(), EngineError> {
        let occurrence = self
            .schedule
            .find_occurrence_mut(id)
            .ok_or_else(|| EngineError::UnknownOccurrence(id.as_str().to_string()))?;
        occurrence.status = OccurrenceStatus::Cancelled;
        occurrence.cancel_reason = reason;
        Ok(())
    }

    /// Horodatage de déclenchement d'une règle de notification pour une
    /// occurrence donnée (`None` = règle sans objet ce jour-là).
    pub fn compute_fire_time(
        &self,
        rule: &crate::notification::NotificationRule,
        occurrence_id: &OccurrenceId,
    ) -> Result<Option<chrono::NaiveDateTime>, EngineError> {
        let occurrence = self
            .schedule
            .find_occurrence(occurrence_id)
            .ok_or_else(|| EngineError::UnknownOccurrence(occurrence_id.as_str().to_string()))?;
        Ok(crate::notification::compute_fire_time(
            rule,
            occurrence,
            &self.schedule.occurrences,
        ))
    }
}
