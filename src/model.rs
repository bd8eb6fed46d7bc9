use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour Teacher
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeacherId(String);

impl TeacherId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour WeeklyAssignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(String);

impl AssignmentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour LessonOccurrence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccurrenceId(String);

impl OccurrenceId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour LeaveInterval
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaveId(String);

impl LeaveId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant opaque d'école (fourni par le collaborateur, jamais généré ici).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchoolId(String);

impl SchoolId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant opaque de groupe-classe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Enseignant (référence non-possédante, consultation seulement)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Teacher {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            id: TeacherId::random(),
            name: name.into(),
            active: true,
        }
    }
}

/// Modèle hebdomadaire : "tel enseignant donne tel cours chaque mardi 14:00–15:00".
///
/// Les occurrences générées ne sont PAS possédées par le modèle : elles
/// survivent à ses éditions et à sa suppression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyAssignment {
    pub id: AssignmentId,
    pub school: SchoolId,
    pub group: GroupId,
    pub teacher: TeacherId,
    /// 1=lundi .. 7=dimanche (ISO)
    pub weekday: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl WeeklyAssignment {
    /// Crée un modèle en validant `end_time > start_time` et le jour ISO.
    pub fn new(
        school: SchoolId,
        group: GroupId,
        teacher: TeacherId,
        weekday: u8,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, String> {
        if !(1..=7).contains(&weekday) {
            return Err(format!("weekday must be in 1..=7, got {weekday}"));
        }
        if end_time <= start_time {
            return Err("end time must be strictly after start time".to_string());
        }
        Ok(Self {
            id: AssignmentId::random(),
            school,
            group,
            teacher,
            weekday,
            start_time,
            end_time,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Regular,
    Makeup,
    Extra,
}

/// Occurrence concrète et datée d'un cours.
///
/// Clé d'unicité (dédoublonnage) : `(date, start_time, teacher)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonOccurrence {
    pub id: OccurrenceId,
    pub school: SchoolId,
    pub group: GroupId,
    pub teacher: TeacherId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: OccurrenceStatus,
    pub kind: LessonKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Enseignant d'origine quand le cours est couvert par un remplaçant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_teacher: Option<TeacherId>,
    #[serde(default)]
    pub is_substitute: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    /// Lien explicite vers le modèle générateur (None pour rattrapage/extra manuel).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_assignment: Option<AssignmentId>,
}

impl LessonOccurrence {
    /// Crée une occurrence en validant `end_time > start_time`.
    pub fn new(
        school: SchoolId,
        group: GroupId,
        teacher: TeacherId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        kind: LessonKind,
    ) -> Result<Self, String> {
        if end_time <= start_time {
            return Err("end time must be strictly after start time".to_string());
        }
        Ok(Self {
            id: OccurrenceId::random(),
            school,
            group,
            teacher,
            date,
            start_time,
            end_time,
            status: OccurrenceStatus::Scheduled,
            kind,
            topic: None,
            notes: None,
            original_teacher: None,
            is_substitute: false,
            cancel_reason: None,
            source_assignment: None,
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OccurrenceStatus::Cancelled
    }
}

/// Type d'absence — `Other` reste libre côté collaborateur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    Sick,
    Personal,
    Training,
    Other(String),
}

/// Absence d'un enseignant sur `[start_date, end_date]` (bornes incluses).
///
/// Journée entière quand les heures sont absentes. La pose d'une absence ne
/// modifie jamais les occurrences : le remplacement est une action explicite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveInterval {
    pub id: LeaveId,
    pub teacher: TeacherId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    pub kind: LeaveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LeaveInterval {
    pub fn new(
        teacher: TeacherId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: LeaveKind,
    ) -> Result<Self, String> {
        if end_date < start_date {
            return Err("leave end date must not precede start date".to_string());
        }
        Ok(Self {
            id: LeaveId::random(),
            teacher,
            start_date,
            end_date,
            start_time: None,
            end_time: None,
            kind,
            reason: None,
        })
    }

    pub fn is_full_day(&self) -> bool {
        self.start_time.is_none() || self.end_time.is_none()
    }

    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Agrégat complet manipulé par le moteur.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Schedule {
    pub teachers: Vec<Teacher>,
    pub assignments: Vec<WeeklyAssignment>,
    pub occurrences: Vec<LessonOccurrence>,
    pub leaves: Vec<LeaveInterval>,
}

impl Schedule {
    pub fn find_teacher<'a>(&'a self, id: &TeacherId) -> Option<&'a Teacher> {
        self.teachers.iter().find(|t| &t.id == id)
    }
    pub fn find_teacher_by_name<'a>(&'a self, name: &str) -> Option<&'a Teacher> {
        self.teachers.iter().find(|t| t.name == name)
    }
    pub fn find_assignment<'a>(&'a self, id: &AssignmentId) -> Option<&'a WeeklyAssignment> {
        self.assignments.iter().find(|a| &a.id == id)
    }
    pub fn find_assignment_mut(&mut self, id: &AssignmentId) -> Option<&mut WeeklyAssignment> {
        self.assignments.iter_mut().find(|a| &a.id == id)
    }
    pub fn find_occurrence<'a>(&'a self, id: &OccurrenceId) -> Option<&'a LessonOccurrence> {
        self.occurrences.iter().find(|o| &o.id == id)
    }
    pub fn find_occurrence_mut(&mut self, id: &OccurrenceId) -> Option<&mut LessonOccurrence> {
        self.occurrences.iter_mut().find(|o| &o.id == id)
    }
    pub fn find_leave<'a>(&'a self, id: &LeaveId) -> Option<&'a LeaveInterval> {
        self.leaves.iter().find(|l| &l.id == id)
    }

    /// Vrai si le créneau `(date, start_time, teacher)` est déjà pris.
    pub fn slot_taken(&self, date: NaiveDate, start_time: NaiveTime, teacher: &TeacherId) -> bool {
        self.occurrences
            .iter()
            .any(|o| o.date == date && o.start_time == start_time && &o.teacher == teacher)
    }

    /// Insère une occurrence sous la contrainte d'unicité
    /// `(date, start_time, teacher)`. Retourne `false` (no-op) si le créneau
    /// est déjà pris — équivalent mémoire d'un index unique en base.
    pub fn insert_occurrence(&mut self, occurrence: LessonOccurrence) -> bool {
        if self.slot_taken(occurrence.date, occurrence.start_time, &occurrence.teacher) {
            return false;
        }
        self.occurrences.push(occurrence);
        true
    }
}
