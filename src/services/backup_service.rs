use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Backup and restore of the underlying store as a raw file copy. The WAL
/// is checkpointed into the main database file before copying so the copy
/// is self-contained.
#[derive(Clone)]
pub struct BackupService {
    db: DbPool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupSummary {
    pub path: String,
    pub size_bytes: u64,
    pub created_at: String,
}

impl BackupService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn backup_to(&self, destination: &str) -> AppResult<BackupSummary> {
        let destination = PathBuf::from(destination);
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        self.checkpoint()?;
        fs::copy(self.db.path(), &destination)?;
        let size_bytes = fs::metadata(&destination)?.len();

        info!(
            target: "app::backup",
            destination = %destination.display(),
            size_bytes,
            "database backed up"
        );
        Ok(BackupSummary {
            path: destination.display().to_string(),
            size_bytes,
            created_at: Utc::now().to_rfc3339(),
        })
    }

    pub fn restore_from(&self, source: &str) -> AppResult<BackupSummary> {
        let source = Path::new(source);
        if !source.is_file() {
            return Err(AppError::validation_with_details(
                "backup file does not exist",
                json!({ "path": source.display().to_string() }),
            ));
        }

        // Fold any pending WAL pages away and drop the sidecar files so the
        // copied image is the whole database.
        self.checkpoint()?;
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = self.db.path().as_os_str().to_owned();
            sidecar.push(suffix);
            let sidecar = PathBuf::from(sidecar);
            if sidecar.exists() {
                if let Err(err) = fs::remove_file(&sidecar) {
                    warn!(
                        target: "app::backup",
                        sidecar = %sidecar.display(),
                        error = %err,
                        "failed to remove wal sidecar before restore"
                    );
                }
            }
        }

        fs::copy(source, self.db.path())?;

        // Reopen to verify the restored file is a usable database.
        self.db.get_connection()?;
        let size_bytes = fs::metadata(self.db.path())?.len();

        info!(
            target: "app::backup",
            source = %source.display(),
            size_bytes,
            "database restored"
        );
        Ok(BackupSummary {
            path: self.db.path().display().to_string(),
            size_bytes,
            created_at: Utc::now().to_rfc3339(),
        })
    }

    fn checkpoint(&self) -> AppResult<()> {
        self.db.with_connection(|conn| {
            conn.pragma_update(None, "wal_checkpoint", &"TRUNCATE")?;
            Ok(())
        })
    }
}
