use std::collections::HashSet;
use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use landreg_core::{Application, CatalogDocument};
use landreg_generate::sink::first_collision;
use landreg_generate::{ApplicationSink, GenerationError};

const APPLICATIONS_FILE: &str = "applications.jsonl";
const CATALOG_FILE: &str = "catalog.json";

/// Directory-backed store: one JSON application per line plus a snapshot of
/// the catalog the applications were generated from.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    catalog: CatalogDocument,
    references: HashSet<String>,
}

impl FileStore {
    /// Open the store at `root`, keeping what it already holds.
    ///
    /// A store that holds applications must have been written with the same
    /// catalog; otherwise opening fails and the store is left untouched.
    pub fn open(root: &Path, catalog: CatalogDocument) -> Result<Self, GenerationError> {
        Self::open_with(root, catalog, false)
    }

    /// Open the store at `root` and clear it, recording `catalog` as its
    /// snapshot.
    pub fn open_fresh(root: &Path, catalog: CatalogDocument) -> Result<Self, GenerationError> {
        Self::open_with(root, catalog, true)
    }

    fn open_with(
        root: &Path,
        catalog: CatalogDocument,
        reset: bool,
    ) -> Result<Self, GenerationError> {
        create_dir_all(root)?;
        let mut store = Self {
            root: root.to_path_buf(),
            catalog,
            references: HashSet::new(),
        };
        if reset {
            store.reset()?;
        } else {
            store.references = store.load_references()?;
            if store.references.is_empty() || !store.snapshot_path().exists() {
                store.write_catalog_snapshot()?;
            } else {
                store.check_catalog_snapshot()?;
            }
        }
        info!(
            store = %root.display(),
            stored = store.references.len(),
            "application store opened"
        );
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stored(&self) -> usize {
        self.references.len()
    }

    pub fn applications_path(&self) -> PathBuf {
        self.root.join(APPLICATIONS_FILE)
    }

    /// Read back every stored application.
    pub fn load_applications(&self) -> Result<Vec<Application>, GenerationError> {
        let path = self.applications_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&path)?);
        let mut applications = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            applications.push(serde_json::from_str(&line)?);
        }
        Ok(applications)
    }

    fn load_references(&self) -> Result<HashSet<String>, GenerationError> {
        Ok(self
            .load_applications()?
            .into_iter()
            .map(|application| application.reference)
            .collect())
    }

    fn snapshot_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    fn write_catalog_snapshot(&self) -> Result<(), GenerationError> {
        let data = serde_json::to_vec_pretty(&self.catalog)?;
        write_bytes_atomic(&self.snapshot_path(), &data)?;
        Ok(())
    }

    fn check_catalog_snapshot(&self) -> Result<(), GenerationError> {
        let stored: Value = serde_json::from_slice(&std::fs::read(self.snapshot_path())?)?;
        if stored != serde_json::to_value(&self.catalog)? {
            return Err(GenerationError::Sink(format!(
                "{} holds applications generated from a different catalog; reset the store to switch",
                self.root.display()
            )));
        }
        Ok(())
    }
}

impl ApplicationSink for FileStore {
    fn reset(&mut self) -> Result<(), GenerationError> {
        let path = self.applications_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        self.references.clear();
        self.write_catalog_snapshot()?;
        info!(store = %self.root.display(), "application store reset");
        Ok(())
    }

    fn store(&mut self, applications: &[Application]) -> Result<usize, GenerationError> {
        if let Some(reference) = first_collision(&self.references, applications) {
            return Err(GenerationError::Sink(format!(
                "reference {reference} already exists in {}",
                self.root.display()
            )));
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.applications_path())?;
        let mut writer = BufWriter::new(file);
        for application in applications {
            serde_json::to_writer(&mut writer, application)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        self.references
            .extend(applications.iter().map(|application| application.reference.clone()));
        info!(
            store = %self.root.display(),
            stored = applications.len(),
            total = self.references.len(),
            "applications stored"
        );
        Ok(applications.len())
    }
}

fn write_bytes_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid path for atomic write"))?;
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name.to_string_lossy()));

    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)
}
