use super::{types::EngineError, BatchReport, Engine, ShiftScope};
use crate::model::OccurrenceStatus;
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Décalage en bloc du calendrier (gestion des jours fériés).
///
/// Déplace chaque occurrence `scheduled` du périmètre datée au plus tôt à
/// `cutoff` de `day_delta` jours calendaires — le jour de semaine est donc
/// recalculé, pas conservé. Les occurrences `completed`/`cancelled` ne
/// bougent jamais. Chaque date d'arrivée est contrôlée contre la clé
/// `(date, start, teacher)` des lignes qui ne bougent pas avant la première
/// écriture. Passage unique, tout ou rien, nombre de lignes déplacées en
/// retour.
pub(super) fn shift_schedule(
    engine: &mut Engine,
    scope: &ShiftScope,
    cutoff: NaiveDate,
    day_delta: i64,
) -> Result<BatchReport, EngineError> {
    if day_delta == 0 {
        return Ok(BatchReport { updated_count: 0 });
    }

    let planned: Vec<(usize, NaiveDate)> = engine
        .schedule
        .occurrences
        .iter()
        .enumerate()
        .filter(|(_, o)| {
            o.status == OccurrenceStatus::Scheduled && o.date >= cutoff && scope.matches(o)
        })
        .map(|(idx, o)| {
            o.date
                .checked_add_signed(Duration::days(day_delta))
                .map(|d| (idx, d))
                .ok_or(EngineError::DateOverflow)
        })
        .collect::<Result<_, _>>()?;

    // les lignes déplacées gardent leurs écarts relatifs (même delta) : seules
    // les lignes immobiles peuvent entrer en collision
    let moving: HashSet<usize> = planned.iter().map(|(idx, _)| *idx).collect();
    for (idx, new_date) in planned.iter() {
        let row = &engine.schedule.occurrences[*idx];
        let collision = engine.schedule.occurrences.iter().enumerate().any(|(j, o)| {
            !moving.contains(&j)
                && o.date == *new_date
                && o.start_time == row.start_time
                && o.teacher == row.teacher
        });
        if collision {
            return Err(EngineError::SlotConflict(*new_date));
        }
    }

    for (idx, new_date) in planned.iter() {
        engine.schedule.occurrences[*idx].date = *new_date;
    }

    Ok(BatchReport {
        updated_count: planned.len(),
    })
}
