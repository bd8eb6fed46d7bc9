use super::{types::EngineError, Engine, LeaveWindow, SubstitutionChoice};
use crate::model::{LeaveId, LessonOccurrence, OccurrenceId, TeacherId};
use crate::timeutil;
use std::collections::HashMap;

/// Occurrences non annulées d'un enseignant dans une fenêtre d'absence.
///
/// Dates bornes incluses ; en absence partielle, seules les occurrences
/// chevauchant l'horaire (règle partagée de `timeutil::overlaps`) comptent.
pub(super) fn find_affected_occurrences<'a>(
    schedule: &'a crate::model::Schedule,
    teacher: &TeacherId,
    window: LeaveWindow,
) -> Vec<&'a LessonOccurrence> {
    schedule
        .occurrences
        .iter()
        .filter(|o| {
            &o.teacher == teacher
                && !o.is_cancelled()
                && o.date >= window.start_date
                && o.date <= window.end_date
        })
        .filter(|o| {
            if window.full_day {
                return true;
            }
            match (window.start_time, window.end_time) {
                (Some(w_start), Some(w_end)) => {
                    timeutil::overlaps(o.start_time, o.end_time, w_start, w_end)
                }
                _ => true,
            }
        })
        .collect()
}

/// Applique les choix de couverture d'une absence enregistrée.
///
/// `Assign(sub)` re-staffe l'occurrence en gardant la trace de l'absent
/// (`original_teacher` + `is_substitute`) ; `Ignore` laisse le cours attribué
/// à l'absent, résultat voulu et non une erreur. Toutes les références sont
/// vérifiées avant la première écriture.
pub(super) fn apply_substitutions(
    engine: &mut Engine,
    leave_id: &LeaveId,
    choices: &HashMap<OccurrenceId, SubstitutionChoice>,
) -> Result<usize, EngineError> {
    let absent = engine
        .schedule
        .find_leave(leave_id)
        .map(|l| l.teacher.clone())
        .ok_or_else(|| EngineError::UnknownLeave(leave_id.as_str().to_string()))?;

    for (occurrence_id, choice) in choices.iter() {
        let occurrence = engine
            .schedule
            .find_occurrence(occurrence_id)
            .ok_or_else(|| EngineError::UnknownOccurrence(occurrence_id.as_str().to_string()))?;
        if occurrence.teacher != absent {
            return Err(EngineError::SubstitutionInvalid(
                "occurrence not taught by the absent teacher",
            ));
        }
        if let SubstitutionChoice::Assign(substitute) = choice {
            if engine.schedule.find_teacher(substitute).is_none() {
                return Err(EngineError::UnknownTeacher(substitute.as_str().to_string()));
            }
            if substitute == &absent {
                return Err(EngineError::SubstitutionInvalid(
                    "substitute is the absent teacher",
                ));
            }
        }
    }

    let mut covered = 0usize;
    for (occurrence_id, choice) in choices.iter() {
        let SubstitutionChoice::Assign(substitute) = choice else {
            continue;
        };
        // vérifié ci-dessus
        if let Some(occurrence) = engine.schedule.find_occurrence_mut(occurrence_id) {
            occurrence.original_teacher = Some(absent.clone());
            occurrence.teacher = substitute.clone();
            occurrence.is_substitute = true;
            covered += 1;
        }
    }

    Ok(covered)
}
