use super::{types::EngineError, AssignmentChange, BatchReport, Engine};
use crate::model::{AssignmentId, OccurrenceStatus, TeacherId};
use crate::timeutil;
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Édition d'un modèle hebdomadaire, avec répercussion optionnelle.
///
/// La cascade ne touche que les occurrences liées au modèle (lien
/// `source_assignment`), encore `scheduled` et datées STRICTEMENT après
/// `cutoff` : le passé, le terminé et l'annulé sont intouchables. La date est
/// recalculée dans la semaine d'itération de chaque occurrence ; identité,
/// statut, sujet et historique de remplacement sont préservés. Tout est
/// validé avant la première écriture (tout ou rien), y compris la clé
/// d'unicité `(date, start, teacher)` des créneaux d'arrivée.
pub(super) fn update_assignment(
    engine: &mut Engine,
    id: &AssignmentId,
    change: AssignmentChange,
    cascade: bool,
    cutoff: NaiveDate,
) -> Result<BatchReport, EngineError> {
    if change.is_empty() {
        return Err(EngineError::EmptyChange(id.as_str().to_string()));
    }

    let assignment = engine
        .schedule
        .find_assignment(id)
        .ok_or_else(|| EngineError::UnknownAssignment(id.as_str().to_string()))?;

    let new_weekday = change.weekday.unwrap_or(assignment.weekday);
    let new_start = change.start_time.unwrap_or(assignment.start_time);
    let new_end = change.end_time.unwrap_or(assignment.end_time);
    if !(1..=7).contains(&new_weekday) {
        return Err(EngineError::InvalidWeekday(new_weekday));
    }
    if new_end <= new_start {
        return Err(EngineError::InvalidTimeRange);
    }

    let planned: Vec<(usize, NaiveDate)> = if cascade {
        engine
            .schedule
            .occurrences
            .iter()
            .enumerate()
            .filter(|(_, o)| {
                o.source_assignment.as_ref() == Some(id)
                    && o.status == OccurrenceStatus::Scheduled
                    && o.date > cutoff
            })
            .map(|(idx, o)| {
                let week_start = timeutil::start_of_week(o.date);
                (idx, week_start + Duration::days(i64::from(new_weekday) - 1))
            })
            .collect()
    } else {
        Vec::new()
    };

    // collision possible avec une ligne hors cascade (rattrapage, ligne déjà
    // donnée ou annulée) ou au sein du lot ; rien n'est écrit en cas de refus
    let moving: HashSet<usize> = planned.iter().map(|(idx, _)| *idx).collect();
    let mut batch_keys: HashSet<(NaiveDate, TeacherId)> = HashSet::new();
    for (idx, new_date) in planned.iter() {
        let row = &engine.schedule.occurrences[*idx];
        if !batch_keys.insert((*new_date, row.teacher.clone())) {
            return Err(EngineError::SlotConflict(*new_date));
        }
        let collision = engine.schedule.occurrences.iter().enumerate().any(|(j, o)| {
            !moving.contains(&j)
                && o.date == *new_date
                && o.start_time == new_start
                && o.teacher == row.teacher
        });
        if collision {
            return Err(EngineError::SlotConflict(*new_date));
        }
    }

    let assignment = engine
        .schedule
        .find_assignment_mut(id)
        .ok_or_else(|| EngineError::UnknownAssignment(id.as_str().to_string()))?;
    assignment.weekday = new_weekday;
    assignment.start_time = new_start;
    assignment.end_time = new_end;

    for (idx, new_date) in planned.iter() {
        let occurrence = &mut engine.schedule.occurrences[*idx];
        occurrence.date = *new_date;
        occurrence.start_time = new_start;
        occurrence.end_time = new_end;
    }

    Ok(BatchReport {
        updated_count: planned.len(),
    })
}
