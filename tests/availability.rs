#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use horaire::{
    model::{GroupId, LeaveKind, LessonKind, SchoolId, Teacher, TeacherId},
    Engine,
};

#[test]
fn overlapping_occurrence_blocks_teacher() {
    let (mut engine, t1, t2) = engine_with_two_teachers();
    add_occurrence(&mut engine, &t1, date(2024, 2, 5), 9, 0, 10, 0);

    let free = engine.find_available_teachers(date(2024, 2, 5), time(9, 30), time(10, 30));
    assert!(!free.contains(&t1));
    assert!(free.contains(&t2));
}

#[test]
fn back_to_back_does_not_block() {
    let (mut engine, t1, _) = engine_with_two_teachers();
    add_occurrence(&mut engine, &t1, date(2024, 2, 5), 9, 0, 10, 0);

    let free = engine.find_available_teachers(date(2024, 2, 5), time(10, 0), time(11, 0));
    assert!(free.contains(&t1));
}

#[test]
fn cancelled_occurrence_does_not_block() {
    let (mut engine, t1, _) = engine_with_two_teachers();
    let occ = add_occurrence(&mut engine, &t1, date(2024, 2, 5), 9, 0, 10, 0);
    engine.cancel_occurrence(&occ, Some("sortie scolaire".into())).unwrap();

    let free = engine.find_available_teachers(date(2024, 2, 5), time(9, 0), time(10, 0));
    assert!(free.contains(&t1));
}

#[test]
fn full_day_leave_blocks_whole_day() {
    let (mut engine, t1, t2) = engine_with_two_teachers();
    engine
        .add_leave(
            t1.clone(),
            date(2024, 2, 5),
            date(2024, 2, 6),
            None,
            None,
            LeaveKind::Sick,
            None,
        )
        .unwrap();

    let free = engine.find_available_teachers(date(2024, 2, 6), time(8, 0), time(9, 0));
    assert!(!free.contains(&t1));
    assert!(free.contains(&t2));

    // hors de la plage d'absence
    let free = engine.find_available_teachers(date(2024, 2, 7), time(8, 0), time(9, 0));
    assert!(free.contains(&t1));
}

#[test]
fn partial_leave_blocks_only_overlapping_window() {
    let (mut engine, t1, _) = engine_with_two_teachers();
    engine
        .add_leave(
            t1.clone(),
            date(2024, 2, 5),
            date(2024, 2, 5),
            Some(time(13, 0)),
            Some(time(16, 0)),
            LeaveKind::Training,
            None,
        )
        .unwrap();

    let free = engine.find_available_teachers(date(2024, 2, 5), time(14, 0), time(15, 0));
    assert!(!free.contains(&t1));
    let free = engine.find_available_teachers(date(2024, 2, 5), time(9, 0), time(10, 0));
    assert!(free.contains(&t1));
    // dos à dos avec la fin de l'absence
    let free = engine.find_available_teachers(date(2024, 2, 5), time(16, 0), time(17, 0));
    assert!(free.contains(&t1));
}

#[test]
fn inactive_teachers_are_not_listed() {
    let mut engine = Engine::new();
    let mut retired = Teacher::new("Retired");
    retired.active = false;
    let retired_id = retired.id.clone();
    engine.add_teachers(vec![retired]);

    let free = engine.find_available_teachers(date(2024, 2, 5), time(9, 0), time(10, 0));
    assert!(!free.contains(&retired_id));
    assert!(free.is_empty()); // liste vide = réponse valide, pas une erreur
}

fn engine_with_two_teachers() -> (Engine, TeacherId, TeacherId) {
    let mut engine = Engine::new();
    let t1 = Teacher::new("T1");
    let t2 = Teacher::new("T2");
    let (i1, i2) = (t1.id.clone(), t2.id.clone());
    engine.add_teachers(vec![t1, t2]);
    (engine, i1, i2)
}

fn add_occurrence(
    engine: &mut Engine,
    teacher: &TeacherId,
    on: NaiveDate,
    sh: u32,
    sm: u32,
    eh: u32,
    em: u32,
) -> horaire::OccurrenceId {
    engine
        .add_occurrence(
            SchoolId::new("s1"),
            GroupId::new("c1"),
            teacher.clone(),
            on,
            time(sh, sm),
            time(eh, em),
            LessonKind::Regular,
        )
        .unwrap()
        .expect("slot free")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
