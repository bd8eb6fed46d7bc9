use super::{types::EngineError, Engine, GenerateReport};
use crate::model::{LessonKind, LessonOccurrence, OccurrenceId, OccurrenceStatus};
use crate::timeutil;
use chrono::{Duration, NaiveDate};

/// Expansion des modèles hebdomadaires en occurrences concrètes.
///
/// Parcourt `week_count` semaines à partir du lundi de `start_date` ; chaque
/// modèle produit au plus une occurrence par semaine. Jamais de date avant
/// `start_date`, jamais de doublon sur `(date, start, teacher)` — ni contre
/// l'état persisté, ni au sein du lot en cours, donc rejouable à volonté.
/// Aucun contrôle de disponibilité des autres enseignants : le modèle est
/// réputé validé à sa création.
pub(super) fn generate(
    engine: &mut Engine,
    start_date: NaiveDate,
    week_count: u32,
) -> Result<GenerateReport, EngineError> {
    let mut report = GenerateReport::default();
    let first_monday = timeutil::start_of_week(start_date);

    for week in 0..i64::from(week_count) {
        let week_start = first_monday
            .checked_add_signed(Duration::weeks(week))
            .ok_or(EngineError::DateOverflow)?;

        for assignment in engine.schedule.assignments.iter() {
            let candidate = week_start + Duration::days(i64::from(assignment.weekday) - 1);
            if candidate < start_date {
                continue;
            }

            let slot_taken = engine
                .schedule
                .slot_taken(candidate, assignment.start_time, &assignment.teacher)
                || report.created.iter().any(|o| {
                    o.date == candidate
                        && o.start_time == assignment.start_time
                        && o.teacher == assignment.teacher
                });
            if slot_taken {
                report.skipped += 1;
                continue;
            }

            report.created.push(LessonOccurrence {
                id: OccurrenceId::random(),
                school: assignment.school.clone(),
                group: assignment.group.clone(),
                teacher: assignment.teacher.clone(),
                date: candidate,
                start_time: assignment.start_time,
                end_time: assignment.end_time,
                status: OccurrenceStatus::Scheduled,
                kind: LessonKind::Regular,
                topic: None,
                notes: None,
                original_teacher: None,
                is_substitute: false,
                cancel_reason: None,
                source_assignment: Some(assignment.id.clone()),
            });
        }
    }

    // Insertion sous la garde d'unicité de l'agrégat : en mémoire la
    // vérification ci-dessus suffit, mais la garde reste l'autorité finale
    // (pendant de l'index unique côté base).
    for occurrence in report.created.iter() {
        engine.schedule.insert_occurrence(occurrence.clone());
    }

    Ok(report)
}
