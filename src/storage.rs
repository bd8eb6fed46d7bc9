use crate::model::Schedule;
use anyhow::{bail, Context};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un calendrier depuis un support, clé d'unicité des
    /// occurrences vérifiée.
    fn load(&self) -> anyhow::Result<Schedule>;
    /// Sauvegarde de manière atomique.
    fn save(&self, schedule: &Schedule) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Schedule> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let schedule: Schedule =
            serde_json::from_slice(&data).with_context(|| "parsing schedule.json")?;
        // un fichier édité à la main peut violer la clé (date, start, teacher)
        let mut seen = HashSet::new();
        for o in &schedule.occurrences {
            if !seen.insert((o.date, o.start_time, o.teacher.clone())) {
                bail!(
                    "duplicate occurrence slot ({} {} teacher {}) in {}",
                    o.date,
                    o.start_time.format("%H:%M"),
                    o.teacher.as_str(),
                    self.path.display()
                );
            }
        }
        Ok(schedule)
    }

    fn save(&self, schedule: &Schedule) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(schedule)?;
        let mut tmp =
            NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
                .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
