//! Utilitaires d'intervalles : heures "HH:MM", chevauchements, jours ISO.
//!
//! Tout le moteur passe par `overlaps` pour la notion libre/occupé ; la
//! règle n'est implémentée qu'ici.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

/// Parse "HH:MM" (24h, zéro-paddé) en minutes depuis minuit.
pub fn parse_hhmm(raw: &str) -> Result<u32> {
    let Some((h, m)) = raw.split_once(':') else {
        bail!("invalid time {raw:?}: expected HH:MM");
    };
    if h.len() != 2 || m.len() != 2 {
        bail!("invalid time {raw:?}: expected HH:MM");
    }
    let hours: u32 = h
        .parse()
        .with_context(|| format!("invalid hours in {raw:?}"))?;
    let minutes: u32 = m
        .parse()
        .with_context(|| format!("invalid minutes in {raw:?}"))?;
    if hours > 23 || minutes > 59 {
        bail!("time {raw:?} out of range");
    }
    Ok(hours * 60 + minutes)
}

/// Parse "HH:MM" en `NaiveTime`.
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let total = parse_hhmm(raw)?;
    NaiveTime::from_hms_opt(total / 60, total % 60, 0).context("time out of range")
}

/// Chevauchement d'intervalles semi-ouverts `[a_start, a_end)` / `[b_start, b_end)`.
/// Deux créneaux dos à dos (`a_end == b_start`) ne se chevauchent pas.
pub fn overlaps(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start < b_end && b_start < a_end
}

/// Jour ISO d'une date : 1=lundi .. 7=dimanche.
pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Normalise une convention native "dimanche=0" en ISO (0 devient 7).
pub fn normalize_weekday(raw: u8) -> Result<u8> {
    match raw {
        0 => Ok(7),
        1..=7 => Ok(raw),
        _ => bail!("weekday {raw} out of range (expected 0..=7)"),
    }
}

/// Lundi de la semaine contenant `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(iso_weekday(date)) - 1)
}

/// Prochaine date tombant sur `weekday` (ISO) : la semaine courante si le
/// jour n'est pas encore passé (le jour même compte), sinon la suivante.
pub fn next_occurrence_of_weekday(from: NaiveDate, weekday: u8) -> Result<NaiveDate> {
    if !(1..=7).contains(&weekday) {
        bail!("weekday {weekday} out of range (expected 1..=7)");
    }
    let delta = (i64::from(weekday) - i64::from(iso_weekday(from))).rem_euclid(7);
    Ok(from + Duration::days(delta))
}
