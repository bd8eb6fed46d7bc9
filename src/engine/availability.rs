use crate::model::{LeaveInterval, Schedule, TeacherId};
use crate::timeutil;
use chrono::{NaiveDate, NaiveTime};

/// Enseignants actifs libres sur le créneau demandé.
///
/// Un enseignant est occupé si une occurrence non annulée chevauche le
/// créneau ce jour-là, ou si une absence couvre la date (journée entière, ou
/// partielle avec chevauchement horaire). La règle de chevauchement est
/// celle de `timeutil::overlaps`, unique dans tout le moteur.
pub(super) fn find_available_teachers(
    schedule: &Schedule,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Vec<TeacherId> {
    schedule
        .teachers
        .iter()
        .filter(|t| t.active)
        .filter(|t| teacher_is_free(schedule, &t.id, date, start_time, end_time))
        .map(|t| t.id.clone())
        .collect()
}

pub(super) fn teacher_is_free(
    schedule: &Schedule,
    teacher: &TeacherId,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> bool {
    let busy = schedule.occurrences.iter().any(|o| {
        &o.teacher == teacher
            && o.date == date
            && !o.is_cancelled()
            && timeutil::overlaps(o.start_time, o.end_time, start_time, end_time)
    });
    if busy {
        return false;
    }

    !schedule
        .leaves
        .iter()
        .filter(|l| &l.teacher == teacher)
        .any(|l| leave_blocks(l, date, start_time, end_time))
}

fn leave_blocks(
    leave: &LeaveInterval,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> bool {
    if !leave.covers_date(date) {
        return false;
    }
    match (leave.start_time, leave.end_time) {
        (Some(l_start), Some(l_end)) => timeutil::overlaps(l_start, l_end, start_time, end_time),
        // journée entière
        _ => true,
    }
}
