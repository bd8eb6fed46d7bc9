use crate::model::{GroupId, LessonOccurrence, OccurrenceId, Schedule, SchoolId, Teacher};
use crate::timeutil;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Déclencheur d'une règle de notification — un variant par forme, évalué
/// par filtrage exhaustif (pas de champs "peut-être présents").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Au début du cours (modulo `offset_minutes`).
    LessonStart,
    /// À la fin du cours (modulo `offset_minutes`).
    LessonEnd,
    /// À heure fixe le jour du cours, indépendamment de ses horaires.
    FixedTime { at: NaiveTime },
    /// Relatif à la fin du dernier cours non annulé du même jour et du même
    /// périmètre (modulo `offset_minutes`).
    LastLessonEnd,
}

/// Règle de notification : configuration pure, consommée en lecture seule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<SchoolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
    pub trigger: Trigger,
    /// Décalage signé en minutes (négatif = avant).
    #[serde(default)]
    pub offset_minutes: i64,
    /// Jours ISO (1..=7) où la règle s'applique ; absent = tous les jours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_filter: Option<Vec<u8>>,
}

impl NotificationRule {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            school: None,
            group: None,
            trigger,
            offset_minutes: 0,
            days_filter: None,
        }
    }

    fn applies_to(&self, occurrence: &LessonOccurrence) -> bool {
        if let Some(school) = &self.school {
            if &occurrence.school != school {
                return false;
            }
        }
        if let Some(group) = &self.group {
            if &occurrence.group != group {
                return false;
            }
        }
        if let Some(days) = &self.days_filter {
            if !days.contains(&timeutil::iso_weekday(occurrence.date)) {
                return false;
            }
        }
        true
    }

    /// Vrai si `other` appartient au même périmètre que `occurrence` au sens
    /// de la règle : groupe si la règle en fixe un, sinon école.
    fn same_scope(&self, occurrence: &LessonOccurrence, other: &LessonOccurrence) -> bool {
        if self.group.is_some() {
            other.group == occurrence.group
        } else {
            other.school == occurrence.school
        }
    }
}

/// Horodatage absolu de déclenchement d'une règle pour une occurrence.
///
/// `None` = la règle est sans objet (occurrence annulée, jour filtré,
/// périmètre étranger). `siblings` doit contenir les occurrences du même
/// calendrier : `LastLessonEnd` regarde la fin la plus tardive du jour.
pub fn compute_fire_time(
    rule: &NotificationRule,
    occurrence: &LessonOccurrence,
    siblings: &[LessonOccurrence],
) -> Option<NaiveDateTime> {
    if occurrence.is_cancelled() || !rule.applies_to(occurrence) {
        return None;
    }

    let offset = Duration::minutes(rule.offset_minutes);
    match &rule.trigger {
        Trigger::LessonStart => Some(occurrence.date.and_time(occurrence.start_time) + offset),
        Trigger::LessonEnd => Some(occurrence.date.and_time(occurrence.end_time) + offset),
        Trigger::FixedTime { at } => Some(occurrence.date.and_time(*at)),
        Trigger::LastLessonEnd => {
            let latest_end = siblings
                .iter()
                .filter(|o| {
                    o.date == occurrence.date
                        && !o.is_cancelled()
                        && rule.same_scope(occurrence, o)
                })
                .map(|o| o.end_time)
                .max()?;
            Some(occurrence.date.and_time(latest_end) + offset)
        }
    }
}

/// Avis généré pour un enseignant.
#[derive(Debug, Clone)]
pub struct Notice {
    pub teacher_name: String,
    pub occurrence_id: String,
    pub fire_at: NaiveDateTime,
    pub content: String,
}

/// Permet de customiser le rendu du message (texte, SMS, etc.).
pub trait NoticeRenderer {
    fn render(&self, teacher: &Teacher, occurrence: &LessonOccurrence, fire_at: NaiveDateTime)
        -> String;
}

/// Gabarit texte simple destiné à un futur mail/SMS.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNotice;

impl NoticeRenderer for TextNotice {
    fn render(
        &self,
        teacher: &Teacher,
        occurrence: &LessonOccurrence,
        fire_at: NaiveDateTime,
    ) -> String {
        format!(
            "Bonjour {name},\n\nCours du {date} de {start} à {end} (groupe {group}).\nCe message est prévu pour le {fire}.\n\nMerci de préparer ta séance.\n",
            name = teacher.name,
            date = occurrence.date,
            start = occurrence.start_time.format("%H:%M"),
            end = occurrence.end_time.format("%H:%M"),
            group = occurrence.group.as_str(),
            fire = fire_at,
        )
    }
}

/// Prépare un avis pour une occurrence donnée.
///
/// `Ok(None)` quand la règle ne s'applique pas ce jour-là.
pub fn prepare_notice(
    schedule: &Schedule,
    rule: &NotificationRule,
    occurrence_id: &OccurrenceId,
    renderer: &dyn NoticeRenderer,
) -> Result<Option<Notice>> {
    let occurrence = schedule
        .find_occurrence(occurrence_id)
        .with_context(|| format!("unknown occurrence: {}", occurrence_id.as_str()))?;
    let teacher = schedule
        .find_teacher(&occurrence.teacher)
        .with_context(|| format!("unknown teacher: {}", occurrence.teacher.as_str()))?;

    let Some(fire_at) = compute_fire_time(rule, occurrence, &schedule.occurrences) else {
        return Ok(None);
    };

    let content = renderer.render(teacher, occurrence, fire_at);
    Ok(Some(Notice {
        teacher_name: teacher.name.clone(),
        occurrence_id: occurrence.id.as_str().to_string(),
        fire_at,
        content,
    }))
}
