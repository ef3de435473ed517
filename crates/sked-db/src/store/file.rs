use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use sked_core::constants::{EVENT_FILE_EXTENSION, EVENT_FILE_SUFFIX};
use sked_core::model::{Event, EventId};

use super::EventStore;
use crate::error::{DbError, DbResult};

/// Stores each event as a pretty-printed JSON document `<id>.json` in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// ## Summary
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// ## Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> DbResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| DbError::io(&root, err))?;
        tracing::debug!(path = %root.display(), "Opened event file store");
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, id: EventId) -> PathBuf {
        self.root.join(format!("{id}{EVENT_FILE_SUFFIX}"))
    }

    fn read_path(path: &Path) -> DbResult<Event> {
        let file = fs::File::open(path).map_err(|err| DbError::io(path, err))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

impl EventStore for JsonFileStore {
    #[tracing::instrument(skip(self, event), fields(event_id = %event.id()))]
    fn write(&self, event: &Event) -> DbResult<()> {
        let path = self.path_of(event.id());
        let file = fs::File::create(&path).map_err(|err| DbError::io(&path, err))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, event)?;
        writer.flush().map_err(|err| DbError::io(&path, err))?;
        tracing::trace!(path = %path.display(), "Event written");
        Ok(())
    }

    fn read(&self, id: EventId) -> DbResult<Option<Event>> {
        let path = self.path_of(id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_path(&path).map(Some)
    }

    /// Reads every `*.json` document in the directory.
    ///
    /// Documents that cannot be parsed are skipped with a warning so that one
    /// corrupt file does not prevent startup.
    fn read_all(&self) -> DbResult<Vec<Event>> {
        let entries = fs::read_dir(&self.root).map_err(|err| DbError::io(&self.root, err))?;

        let mut events = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| DbError::io(&self.root, err))?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(EVENT_FILE_EXTENSION)
            {
                continue;
            }

            match Self::read_path(&path) {
                Ok(event) => events.push(event),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable event file");
                }
            }
        }

        tracing::debug!(count = events.len(), "Read stored events");
        Ok(events)
    }

    fn delete(&self, id: EventId) -> DbResult<bool> {
        let path = self.path_of(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(DbError::io(&path, err)),
        }
    }
}
