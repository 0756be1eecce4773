use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::session::quiz::QuizSession;
use crate::store::SessionStore;
use crate::store::schema::SessionFile;

/// File-backed session store, one JSON file per session key.
pub struct JsonStore {
    base_dir: PathBuf,
    key: String,
}

impl JsonStore {
    pub fn new(key: &str) -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocab-quiz")
            .join("sessions");
        Self::with_base_dir(base_dir, key)
    }

    pub fn with_base_dir(base_dir: PathBuf, key: &str) -> Result<Self> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("Invalid session key {key:?}: use letters, digits, '-' or '_'");
        }
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating {}", base_dir.display()))?;
        Ok(Self {
            base_dir,
            key: key.to_string(),
        })
    }

    fn file_path(&self) -> PathBuf {
        self.base_dir.join(format!("{}.json", self.key))
    }

    pub fn exists(&self) -> bool {
        self.file_path().exists()
    }
}

impl SessionStore for JsonStore {
    /// A missing file is an empty session. A file that no longer parses,
    /// carries an old schema or fails layout validation is discarded.
    fn load(&self) -> Result<Option<QuizSession>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        match serde_json::from_str::<SessionFile>(&content) {
            Ok(file) if !file.needs_reset() => match file.session.validate() {
                Ok(()) => Ok(Some(file.session)),
                Err(e) => {
                    log::warn!("discarding inconsistent session {}: {e}", path.display());
                    Ok(None)
                }
            },
            Ok(file) => {
                log::warn!(
                    "discarding session {} with schema version {}",
                    path.display(),
                    file.schema_version
                );
                Ok(None)
            }
            Err(e) => {
                log::warn!("discarding unreadable session {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    fn save(&mut self, session: &QuizSession) -> Result<()> {
        let path = self.file_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(&SessionFile::new(session.clone()))?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let path = self.file_path();
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        }
        Ok(())
    }
}
