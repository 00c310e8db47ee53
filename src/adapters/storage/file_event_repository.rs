//! File-based Event Repository Adapter
//!
//! Stores each round snapshot as a YAML file on disk, one directory per
//! event:
//!
//! ```text
//! <base>/REQ-20250725-0A1B2C/round-0001.yaml
//! <base>/REQ-20250725-0A1B2C/round-0002.yaml
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::event::EventRecord;
use crate::domain::foundation::EventId;
use crate::ports::{check_save, EventRepository, RepositoryError, SaveOutcome};

const ROUND_PREFIX: &str = "round-";
const ROUND_SUFFIX: &str = ".yaml";

/// File-based storage for event round snapshots
#[derive(Debug)]
pub struct FileEventRepository {
    base_path: PathBuf,
    /// Serializes check-and-insert in `save_round`.
    write_lock: Mutex<()>,
}

impl FileEventRepository {
    /// Create a new file repository with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let repo = FileEventRepository::new("./data/events");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Get the directory path for a specific event
    fn event_dir(&self, id: &EventId) -> PathBuf {
        self.base_path.join(id.as_str())
    }

    fn round_file_path(&self, id: &EventId, round_number: u32) -> PathBuf {
        self.event_dir(id)
            .join(format!("{}{:04}{}", ROUND_PREFIX, round_number, ROUND_SUFFIX))
    }

    async fn read_record(path: &Path) -> Result<EventRecord, RepositoryError> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?;
        serde_yaml::from_str(&yaml).map_err(|e| RepositoryError::DeserializationFailed(e.to_string()))
    }

    /// Round numbers stored for an event, ascending.
    async fn stored_rounds(&self, id: &EventId) -> Result<Vec<u32>, RepositoryError> {
        let dir = self.event_dir(id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::IoError(e.to_string())),
        };

        let mut rounds = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?
        {
            let name = entry.file_name();
            let round = name
                .to_str()
                .and_then(|n| n.strip_prefix(ROUND_PREFIX))
                .and_then(|n| n.strip_suffix(ROUND_SUFFIX))
                .and_then(|n| n.parse::<u32>().ok());
            if let Some(round) = round {
                rounds.push(round);
            }
        }
        rounds.sort_unstable();
        Ok(rounds)
    }
}

#[async_trait]
impl EventRepository for FileEventRepository {
    async fn save_round(&self, record: &EventRecord) -> Result<SaveOutcome, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let id = record.event_id();

        let existing = self.load_round(id, record.round_number()).await?;
        let latest = self.load_latest(id).await?;
        if let Some(outcome) = check_save(record, latest.as_ref(), existing.as_ref())? {
            return Ok(outcome);
        }

        let yaml = serde_yaml::to_string(record)
            .map_err(|e| RepositoryError::SerializationFailed(e.to_string()))?;
        fs::create_dir_all(self.event_dir(id))
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?;
        fs::write(self.round_file_path(id, record.round_number()), yaml)
            .await
            .map_err(|e| RepositoryError::IoError(e.to_string()))?;

        Ok(SaveOutcome::Inserted)
    }

    async fn load_latest(&self, id: &EventId) -> Result<Option<EventRecord>, RepositoryError> {
        match self.stored_rounds(id).await?.last() {
            Some(round) => self.load_round(id, *round).await,
            None => Ok(None),
        }
    }

    async fn load_round(
        &self,
        id: &EventId,
        round_number: u32,
    ) -> Result<Option<EventRecord>, RepositoryError> {
        let path = self.round_file_path(id, round_number);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_record(&path).await.map(Some)
    }

    async fn history(&self, id: &EventId) -> Result<Vec<EventRecord>, RepositoryError> {
        let mut history = Vec::new();
        for round in self.stored_rounds(id).await? {
            history.push(Self::read_record(&self.round_file_path(id, round)).await?);
        }
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{apply_reply, open_round, FieldKey, PartialFieldMap, RoundInput};
    use crate::domain::foundation::{Language, Timestamp};
    use tempfile::TempDir;

    fn first_round() -> EventRecord {
        let partial = PartialFieldMap::new()
            .with(FieldKey::Location, "Chennai")
            .with(FieldKey::Budget, "$50,000")
            .with(FieldKey::EventStartDate, "2025-07-25");
        open_round(
            EventId::new(),
            Language::Spanish,
            &partial,
            RoundInput::from_text("Hola, see agenda.pdf", Timestamp::now()),
        )
        .unwrap()
        .record
    }

    fn reply(prior: &EventRecord, text: &str) -> EventRecord {
        apply_reply(
            prior,
            prior.round_number(),
            &PartialFieldMap::new().with(FieldKey::NumberOfAttendees, 200),
            RoundInput::from_text(text, Timestamp::now()),
        )
        .unwrap()
        .record
    }

    #[tokio::test]
    async fn round_trips_record_through_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileEventRepository::new(temp_dir.path());
        let record = first_round();

        repo.save_round(&record).await.unwrap();
        let loaded = repo.load_latest(record.event_id()).await.unwrap().unwrap();

        assert_eq!(loaded, record);
        assert!(temp_dir
            .path()
            .join(record.event_id().as_str())
            .join("round-0001.yaml")
            .exists());
    }

    #[tokio::test]
    async fn history_is_in_round_order() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileEventRepository::new(temp_dir.path());
        let first = first_round();
        let second = reply(&first, "two hundred people");

        repo.save_round(&first).await.unwrap();
        repo.save_round(&second).await.unwrap();

        let rounds: Vec<u32> = repo
            .history(first.event_id())
            .await
            .unwrap()
            .iter()
            .map(EventRecord::round_number)
            .collect();
        assert_eq!(rounds, vec![1, 2]);
        assert_eq!(
            repo.load_latest(first.event_id()).await.unwrap().unwrap(),
            second
        );
    }

    #[tokio::test]
    async fn missing_event_directory_is_empty_history() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileEventRepository::new(temp_dir.path());
        let id = EventId::new();

        assert!(repo.history(&id).await.unwrap().is_empty());
        assert!(repo.load_latest(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_round_is_idempotent_or_conflicting() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileEventRepository::new(temp_dir.path());
        let first = first_round();
        repo.save_round(&first).await.unwrap();
        let second = reply(&first, "reply");
        repo.save_round(&second).await.unwrap();

        let same = repo.save_round(&reply(&first, "reply")).await.unwrap();
        assert_eq!(same, SaveOutcome::AlreadyPresent(Box::new(second)));

        let err = repo.save_round(&reply(&first, "other")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::RoundConflict { .. }));
    }

    #[tokio::test]
    async fn corrupt_snapshot_surfaces_deserialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileEventRepository::new(temp_dir.path());
        let id = EventId::new();
        let dir = temp_dir.path().join(id.as_str());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("round-0001.yaml"), "not: [valid").unwrap();

        let err = repo.load_latest(&id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DeserializationFailed(_)));
    }
}
