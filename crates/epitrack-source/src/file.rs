//! [`FileLoader`]: reads the upstream CSV from a local path.

use std::path::{Path, PathBuf};

use epitrack_core::{snapshot::Snapshot, store::SnapshotLoader};

use crate::{Error, Result, columns::ColumnMap, normalize::parse_csv};

#[derive(Debug, Clone)]
pub struct FileLoader {
  path:    PathBuf,
  columns: ColumnMap,
}

impl FileLoader {
  pub fn new(path: impl Into<PathBuf>, columns: ColumnMap) -> Self {
    Self {
      path: path.into(),
      columns,
    }
  }

  pub fn path(&self) -> &Path { &self.path }
}

impl SnapshotLoader for FileLoader {
  type Error = Error;

  async fn load(&self) -> Result<Snapshot> {
    let body = tokio::fs::read(&self.path).await.map_err(|source| Error::Io {
      path: self.path.clone(),
      source,
    })?;
    parse_csv(body.as_slice(), &self.columns)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("epitrack-{}-{name}", std::process::id()))
  }

  #[tokio::test]
  async fn loads_snapshot_from_disk() {
    let path = temp_path("report.csv");
    tokio::fs::write(
      &path,
      "countryName,lat,lon,day,confirmed,death,recovered\nChad,15,19,2020-05-01,3,0,1\n",
    )
    .await
    .unwrap();

    let snapshot = FileLoader::new(&path, ColumnMap::default()).load().await.unwrap();
    assert_eq!(snapshot.countries(), ["Chad"]);

    tokio::fs::remove_file(&path).await.unwrap();
  }

  #[tokio::test]
  async fn missing_file_is_a_fetch_error() {
    let err = FileLoader::new(temp_path("absent.csv"), ColumnMap::default())
      .load()
      .await
      .unwrap_err();
    assert!(err.is_fetch(), "{err}");
  }
}
