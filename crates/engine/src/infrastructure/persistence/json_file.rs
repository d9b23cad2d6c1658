//! JSON file entity repository.
//!
//! Layout: `<root>/<entity id>.json`, pretty-printed. Writes go to a sibling
//! `.tmp` file first and are renamed into place so a crash never leaves a
//! half-written snapshot behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use emberhold_domain::{EntityId, EntitySnapshot};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::infrastructure::ports::{EntityRepo, RepoError};

const SNAPSHOT_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct JsonFileEntityRepo {
    root: PathBuf,
}

impl JsonFileEntityRepo {
    /// Open (creating if needed) a snapshot directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| RepoError::storage("open", format!("{}: {e}", root.display())))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: EntityId) -> PathBuf {
        self.root.join(format!("{id}.{SNAPSHOT_EXTENSION}"))
    }

    async fn read_snapshot(path: &Path) -> Result<EntitySnapshot, RepoError> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| RepoError::storage("load", format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| RepoError::serialization(format!("{}: {e}", path.display())))
    }
}

#[async_trait]
impl EntityRepo for JsonFileEntityRepo {
    async fn load(&self, id: EntityId) -> Result<Option<EntitySnapshot>, RepoError> {
        let path = self.path_for(id);
        if !fs::try_exists(&path)
            .await
            .map_err(|e| RepoError::storage("load", e))?
        {
            return Ok(None);
        }
        Self::read_snapshot(&path).await.map(Some)
    }

    async fn save(&self, snapshot: &EntitySnapshot) -> Result<(), RepoError> {
        let json = serde_json::to_vec_pretty(snapshot).map_err(RepoError::serialization)?;
        let path = self.path_for(snapshot.id);
        let tmp = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp)
            .await
            .map_err(|e| RepoError::storage("save", e))?;
        file.write_all(&json)
            .await
            .map_err(|e| RepoError::storage("save", e))?;
        file.flush().await.map_err(|e| RepoError::storage("save", e))?;
        drop(file);

        fs::rename(&tmp, &path)
            .await
            .map_err(|e| RepoError::storage("save", e))
    }

    async fn delete(&self, id: EntityId) -> Result<(), RepoError> {
        match fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepoError::storage("delete", e)),
        }
    }

    async fn load_all(&self) -> Result<Vec<EntitySnapshot>, RepoError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| RepoError::storage("load_all", e))?;

        let mut snapshots = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepoError::storage("load_all", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            match Self::read_snapshot(&path).await {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot");
                }
            }
        }
        Ok(snapshots)
    }
}
