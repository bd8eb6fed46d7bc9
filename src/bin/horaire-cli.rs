#![forbid(unsafe_code)]
use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use horaire::{
    io,
    model::{AssignmentId, GroupId, LeaveId, LeaveKind, OccurrenceId, SchoolId, Teacher},
    notification::{prepare_notice, NotificationRule, TextNotice, Trigger},
    storage::{JsonStorage, Storage},
    timeutil, AssignmentChange, Engine, ShiftScope, SubstitutionChoice,
};
use std::collections::HashMap;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de planification scolaire (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de calendrier
    #[arg(long, global = true, default_value = "schedule.json")]
    schedule: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un enseignant
    AddTeacher {
        #[arg(long)]
        name: String,
    },

    /// Importer des enseignants depuis un CSV
    ImportTeachers {
        #[arg(long)]
        csv: String,
    },

    /// Créer un modèle hebdomadaire
    AddAssignment {
        #[arg(long)]
        school: String,
        #[arg(long)]
        group: String,
        /// Nom d'enseignant connu du calendrier
        #[arg(long)]
        teacher: String,
        /// 1=lundi .. 7=dimanche
        #[arg(long)]
        weekday: u8,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
    },

    /// Générer les occurrences sur une fenêtre de semaines
    Generate {
        /// AAAA-MM-JJ
        #[arg(long)]
        start: String,
        #[arg(long, default_value_t = 4)]
        weeks: u32,
    },

    /// Enseignants libres sur un créneau
    Availability {
        #[arg(long)]
        date: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },

    /// Éditer un modèle (jour/horaires), en cascade ou non
    UpdateAssignment {
        #[arg(long)]
        assignment_id: String,
        #[arg(long)]
        weekday: Option<u8>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Répercuter sur les occurrences futures encore planifiées
        #[arg(long)]
        cascade: bool,
        /// AAAA-MM-JJ ; défaut = aujourd'hui
        #[arg(long)]
        cutoff: Option<String>,
    },

    /// Poser une absence
    AddLeave {
        #[arg(long)]
        teacher: String,
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        end_date: String,
        /// HH:MM (absence partielle)
        #[arg(long)]
        start: Option<String>,
        /// HH:MM (absence partielle)
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Occurrences touchées par une absence
    Affected {
        #[arg(long)]
        leave_id: String,
    },

    /// Appliquer des remplacements: `--choice occ_id=NomRemplaçant` ou
    /// `--choice occ_id=ignore` (cours laissé non couvert, voulu)
    Substitute {
        #[arg(long)]
        leave_id: String,
        #[arg(long = "choice")]
        choices: Vec<String>,
    },

    /// Décaler le calendrier de N jours à partir d'une date
    Shift {
        /// AAAA-MM-JJ
        #[arg(long)]
        cutoff: String,
        #[arg(long)]
        days: i64,
        #[arg(long)]
        school: Option<String>,
        #[arg(long)]
        group: Option<String>,
    },

    /// Annuler une occurrence (avec motif)
    Cancel {
        #[arg(long)]
        occurrence_id: String,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Horodatage de déclenchement d'une règle pour une occurrence
    FireTime {
        #[arg(long)]
        occurrence_id: String,
        /// lesson_start | lesson_end | fixed:HH:MM | last_lesson_end
        #[arg(long)]
        trigger: String,
        #[arg(long, default_value_t = 0)]
        offset: i64,
        /// Jours ISO autorisés, ex. "1,3,5"
        #[arg(long)]
        days: Option<String>,
    },

    /// Générer un avis texte pour l'enseignant d'une occurrence
    Notify {
        #[arg(long)]
        occurrence_id: String,
        /// lesson_start | lesson_end | fixed:HH:MM | last_lesson_end
        #[arg(long, default_value = "lesson_start")]
        trigger: String,
        #[arg(long, default_value_t = 0)]
        offset: i64,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: String,
    },

    /// Lister et optionnellement exporter
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| anyhow!("invalid date {raw:?}: {e}"))
}

fn parse_opt_time(raw: Option<&String>) -> Result<Option<NaiveTime>> {
    raw.map(|s| timeutil::parse_time(s)).transpose()
}

fn parse_trigger(raw: &str) -> Result<Trigger> {
    match raw {
        "lesson_start" => Ok(Trigger::LessonStart),
        "lesson_end" => Ok(Trigger::LessonEnd),
        "last_lesson_end" => Ok(Trigger::LastLessonEnd),
        other => {
            if let Some(at) = other.strip_prefix("fixed:") {
                return Ok(Trigger::FixedTime {
                    at: timeutil::parse_time(at)?,
                });
            }
            bail!("unknown trigger {other:?}");
        }
    }
}

fn teacher_id_by_name(engine: &Engine, name: &str) -> Result<horaire::TeacherId> {
    engine
        .schedule()
        .find_teacher_by_name(name)
        .map(|t| t.id.clone())
        .ok_or_else(|| anyhow!("unknown teacher: {name}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.schedule)?;
    let mut engine = match storage.load() {
        Ok(s) => Engine::from_schedule(s),
        Err(_) => Engine::new(),
    };

    let code = match cli.cmd {
        Commands::AddTeacher { name } => {
            engine.add_teachers(vec![Teacher::new(name)]);
            storage.save(engine.schedule())?;
            0
        }
        Commands::ImportTeachers { csv } => {
            let teachers = io::import_teachers_csv(csv)?;
            engine.add_teachers(teachers);
            storage.save(engine.schedule())?;
            0
        }
        Commands::AddAssignment {
            school,
            group,
            teacher,
            weekday,
            start,
            end,
        } => {
            let teacher = teacher_id_by_name(&engine, &teacher)?;
            let id = engine.create_assignment(
                SchoolId::new(school),
                GroupId::new(group),
                teacher,
                weekday,
                timeutil::parse_time(&start)?,
                timeutil::parse_time(&end)?,
            )?;
            storage.save(engine.schedule())?;
            println!("{}", id.as_str());
            0
        }
        Commands::Generate { start, weeks } => {
            let report = engine.generate(parse_date(&start)?, weeks)?;
            storage.save(engine.schedule())?;
            println!(
                "{} occurrence(s) created, {} slot(s) already present",
                report.created.len(),
                report.skipped
            );
            if report.created.is_empty() {
                2
            } else {
                0
            }
        }
        Commands::Availability { date, start, end } => {
            let free = engine.find_available_teachers(
                parse_date(&date)?,
                timeutil::parse_time(&start)?,
                timeutil::parse_time(&end)?,
            );
            for id in &free {
                let name = engine
                    .schedule()
                    .find_teacher(id)
                    .map(|t| t.name.as_str())
                    .unwrap_or("-");
                println!("{} | {}", id.as_str(), name);
            }
            if free.is_empty() {
                eprintln!("no teacher available");
                2
            } else {
                0
            }
        }
        Commands::UpdateAssignment {
            assignment_id,
            weekday,
            start,
            end,
            cascade,
            cutoff,
        } => {
            let change = AssignmentChange {
                weekday,
                start_time: parse_opt_time(start.as_ref())?,
                end_time: parse_opt_time(end.as_ref())?,
            };
            let cutoff = match cutoff {
                Some(raw) => parse_date(&raw)?,
                None => chrono::Local::now().date_naive(),
            };
            let report = engine.update_assignment(
                &AssignmentId::new(assignment_id),
                change,
                cascade,
                cutoff,
            )?;
            storage.save(engine.schedule())?;
            println!("{} occurrence(s) recadrée(s)", report.updated_count);
            0
        }
        Commands::AddLeave {
            teacher,
            start_date,
            end_date,
            start,
            end,
            reason,
        } => {
            let teacher = teacher_id_by_name(&engine, &teacher)?;
            let id = engine.add_leave(
                teacher,
                parse_date(&start_date)?,
                parse_date(&end_date)?,
                parse_opt_time(start.as_ref())?,
                parse_opt_time(end.as_ref())?,
                LeaveKind::Other("unspecified".to_string()),
                reason,
            )?;
            storage.save(engine.schedule())?;
            println!("{}", id.as_str());
            0
        }
        Commands::Affected { leave_id } => {
            let affected = engine.affected_by_leave(&LeaveId::new(leave_id))?;
            for o in &affected {
                println!(
                    "{} | {} {} → {} | {}",
                    o.id.as_str(),
                    o.date,
                    o.start_time.format("%H:%M"),
                    o.end_time.format("%H:%M"),
                    o.group.as_str()
                );
            }
            if affected.is_empty() {
                2
            } else {
                0
            }
        }
        Commands::Substitute { leave_id, choices } => {
            let mut map = HashMap::new();
            for raw in &choices {
                let (occ, who) = raw
                    .split_once('=')
                    .ok_or_else(|| anyhow!("invalid choice {raw:?}: expected occ_id=name"))?;
                let choice = if who.eq_ignore_ascii_case("ignore") {
                    SubstitutionChoice::Ignore
                } else {
                    SubstitutionChoice::Assign(teacher_id_by_name(&engine, who.trim())?)
                };
                map.insert(OccurrenceId::new(occ.trim()), choice);
            }
            let covered = engine.apply_substitutions(&LeaveId::new(leave_id), &map)?;
            storage.save(engine.schedule())?;
            println!("{covered} occurrence(s) couverte(s)");
            0
        }
        Commands::Shift {
            cutoff,
            days,
            school,
            group,
        } => {
            let scope = match (school, group) {
                (Some(s), _) => ShiftScope::School(SchoolId::new(s)),
                (None, Some(g)) => ShiftScope::Group(GroupId::new(g)),
                (None, None) => ShiftScope::All,
            };
            let report = engine.shift_schedule(&scope, parse_date(&cutoff)?, days)?;
            storage.save(engine.schedule())?;
            println!("{} occurrence(s) décalée(s)", report.updated_count);
            0
        }
        Commands::Cancel {
            occurrence_id,
            reason,
        } => {
            engine.cancel_occurrence(&OccurrenceId::new(occurrence_id), reason)?;
            storage.save(engine.schedule())?;
            0
        }
        Commands::FireTime {
            occurrence_id,
            trigger,
            offset,
            days,
        } => {
            let mut rule = NotificationRule::new(parse_trigger(&trigger)?);
            rule.offset_minutes = offset;
            if let Some(raw) = days {
                let parsed: Result<Vec<u8>> = raw
                    .split(',')
                    .map(|d| {
                        d.trim()
                            .parse::<u8>()
                            .map_err(|e| anyhow!("invalid day {d:?}: {e}"))
                    })
                    .collect();
                rule.days_filter = Some(parsed?);
            }
            match engine.compute_fire_time(&rule, &OccurrenceId::new(occurrence_id))? {
                Some(ts) => {
                    println!("{ts}");
                    0
                }
                None => {
                    println!("skip");
                    2
                }
            }
        }
        Commands::Notify {
            occurrence_id,
            trigger,
            offset,
            out,
        } => {
            let mut rule = NotificationRule::new(parse_trigger(&trigger)?);
            rule.offset_minutes = offset;
            let renderer = TextNotice;
            match prepare_notice(
                engine.schedule(),
                &rule,
                &OccurrenceId::new(occurrence_id),
                &renderer,
            )? {
                Some(notice) => {
                    std::fs::write(&out, notice.content)?;
                    println!(
                        "Notice generated for {} (occurrence {}) at {}",
                        notice.teacher_name, notice.occurrence_id, notice.fire_at
                    );
                    0
                }
                None => {
                    eprintln!("rule does not apply to this occurrence");
                    2
                }
            }
        }
        Commands::List { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_schedule_json(path, engine.schedule())?;
            }
            if let Some(path) = out_csv {
                io::export_occurrences_csv(path, engine.schedule())?;
            }
            // impression compacte
            for o in &engine.schedule().occurrences {
                let teacher = engine
                    .schedule()
                    .find_teacher(&o.teacher)
                    .map(|t| t.name.as_str())
                    .unwrap_or("-");
                println!(
                    "{} | {} {} → {} | {} | {}",
                    o.id.as_str(),
                    o.date,
                    o.start_time.format("%H:%M"),
                    o.end_time.format("%H:%M"),
                    o.group.as_str(),
                    teacher
                );
            }
            0
        }
    };

    std::process::exit(code);
}
