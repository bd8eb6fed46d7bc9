use crate::model::{Schedule, Teacher};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import d'enseignants depuis CSV: header `name[,active]`
pub fn import_teachers_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Teacher>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid teacher row (empty name)");
        }
        let mut teacher = Teacher::new(name);
        if let Some(flag) = rec.get(1) {
            let flag = flag.trim();
            if !flag.is_empty() {
                teacher.active = parse_bool(flag)
                    .with_context(|| format!("invalid active value for teacher {name}"))?;
            }
        }
        out.push(teacher);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export JSON du calendrier (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(schedule)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des occurrences:
/// header `id,date,start,end,group,teacher_name,status,kind,substitute`
pub fn export_occurrences_csv<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "id", "date", "start", "end", "group", "teacher_name", "status", "kind", "substitute",
    ])?;
    for o in &schedule.occurrences {
        let teacher_name = schedule
            .find_teacher(&o.teacher)
            .map(|t| t.name.as_str())
            .unwrap_or("");
        let date = o.date.to_string();
        let start = o.start_time.format("%H:%M").to_string();
        let end = o.end_time.format("%H:%M").to_string();
        let status = match o.status {
            crate::model::OccurrenceStatus::Scheduled => "scheduled",
            crate::model::OccurrenceStatus::Completed => "completed",
            crate::model::OccurrenceStatus::Cancelled => "cancelled",
        };
        let kind = match o.kind {
            crate::model::LessonKind::Regular => "regular",
            crate::model::LessonKind::Makeup => "makeup",
            crate::model::LessonKind::Extra => "extra",
        };
        let substitute = if o.is_substitute { "yes" } else { "" };
        w.write_record([
            o.id.as_str(),
            date.as_str(),
            start.as_str(),
            end.as_str(),
            o.group.as_str(),
            teacher_name,
            status,
            kind,
            substitute,
        ])?;
    }
    w.flush()?;
    Ok(())
}
