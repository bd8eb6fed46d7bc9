#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use horaire::{
    compute_fire_time,
    model::{
        GroupId, LessonKind, LessonOccurrence, OccurrenceStatus, Schedule, SchoolId, Teacher,
    },
    notification::{prepare_notice, TextNotice},
    NotificationRule, Trigger,
};

#[test]
fn lesson_start_with_negative_offset() {
    let occ = occurrence("s1", "c1", date(2024, 2, 5), time(9, 0), time(10, 0));
    let mut rule = NotificationRule::new(Trigger::LessonStart);
    rule.offset_minutes = -15;

    let fire = compute_fire_time(&rule, &occ, std::slice::from_ref(&occ)).unwrap();
    assert_eq!(fire, date(2024, 2, 5).and_time(time(8, 45)));
}

#[test]
fn lesson_end_default_offset() {
    let occ = occurrence("s1", "c1", date(2024, 2, 5), time(9, 0), time(10, 0));
    let rule = NotificationRule::new(Trigger::LessonEnd);

    let fire = compute_fire_time(&rule, &occ, std::slice::from_ref(&occ)).unwrap();
    assert_eq!(fire, date(2024, 2, 5).and_time(time(10, 0)));
}

#[test]
fn fixed_time_ignores_lesson_hours() {
    let occ = occurrence("s1", "c1", date(2024, 2, 5), time(9, 0), time(10, 0));
    let mut rule = NotificationRule::new(Trigger::FixedTime { at: time(7, 30) });
    rule.offset_minutes = 60; // sans effet sur une heure fixe

    let fire = compute_fire_time(&rule, &occ, std::slice::from_ref(&occ)).unwrap();
    assert_eq!(fire, date(2024, 2, 5).and_time(time(7, 30)));
}

#[test]
fn last_lesson_end_looks_across_siblings() {
    let early = occurrence("s1", "c1", date(2024, 2, 5), time(9, 0), time(10, 0));
    let late = occurrence("s1", "c2", date(2024, 2, 5), time(15, 0), time(16, 30));
    let other_school = occurrence("s2", "c9", date(2024, 2, 5), time(17, 0), time(18, 0));
    let mut cancelled = occurrence("s1", "c3", date(2024, 2, 5), time(18, 0), time(19, 0));
    cancelled.status = OccurrenceStatus::Cancelled;

    let siblings = vec![early.clone(), late, other_school, cancelled];
    let mut rule = NotificationRule::new(Trigger::LastLessonEnd);
    rule.offset_minutes = 10;

    // évaluée sur le cours du matin, la règle vise la fin du dernier cours
    // non annulé de la même école
    let fire = compute_fire_time(&rule, &early, &siblings).unwrap();
    assert_eq!(fire, date(2024, 2, 5).and_time(time(16, 40)));
}

#[test]
fn days_filter_skips_excluded_weekdays() {
    let occ = occurrence("s1", "c1", date(2024, 2, 5), time(9, 0), time(10, 0)); // lundi
    let mut rule = NotificationRule::new(Trigger::LessonStart);
    rule.days_filter = Some(vec![2, 4]);
    assert!(compute_fire_time(&rule, &occ, std::slice::from_ref(&occ)).is_none());

    rule.days_filter = Some(vec![1]);
    assert!(compute_fire_time(&rule, &occ, std::slice::from_ref(&occ)).is_some());
}

#[test]
fn cancelled_occurrence_never_fires() {
    let mut occ = occurrence("s1", "c1", date(2024, 2, 5), time(9, 0), time(10, 0));
    occ.status = OccurrenceStatus::Cancelled;
    let rule = NotificationRule::new(Trigger::LessonStart);
    assert!(compute_fire_time(&rule, &occ, std::slice::from_ref(&occ)).is_none());
}

#[test]
fn scoped_rule_ignores_foreign_occurrences() {
    let occ = occurrence("s1", "c1", date(2024, 2, 5), time(9, 0), time(10, 0));
    let mut rule = NotificationRule::new(Trigger::LessonStart);
    rule.group = Some(GroupId::new("c2"));
    assert!(compute_fire_time(&rule, &occ, std::slice::from_ref(&occ)).is_none());
}

#[test]
fn notice_renders_through_the_seam() {
    let teacher = Teacher::new("Mme Dupont");
    let mut occ = occurrence("s1", "c1", date(2024, 2, 5), time(9, 0), time(10, 0));
    occ.teacher = teacher.id.clone();
    let occ_id = occ.id.clone();

    let schedule = Schedule {
        teachers: vec![teacher],
        assignments: Vec::new(),
        occurrences: vec![occ],
        leaves: Vec::new(),
    };

    let mut rule = NotificationRule::new(Trigger::LessonStart);
    rule.offset_minutes = -30;
    let notice = prepare_notice(&schedule, &rule, &occ_id, &TextNotice)
        .unwrap()
        .expect("rule applies");
    assert_eq!(notice.teacher_name, "Mme Dupont");
    assert_eq!(notice.fire_at, date(2024, 2, 5).and_time(time(8, 30)));
    assert!(notice.content.contains("Mme Dupont"));
}

fn occurrence(
    school: &str,
    group: &str,
    on: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> LessonOccurrence {
    LessonOccurrence::new(
        SchoolId::new(school),
        GroupId::new(group),
        horaire::TeacherId::random(),
        on,
        start,
        end,
        LessonKind::Regular,
    )
    .unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
