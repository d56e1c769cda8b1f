use std::collections::HashSet;

use landreg_core::Application;

use crate::errors::GenerationError;

/// Destination for generated batches.
///
/// Sinks accept validated records as-is; they add no business meaning.
pub trait ApplicationSink {
    /// Drop everything stored so far.
    fn reset(&mut self) -> Result<(), GenerationError>;

    /// Store a batch, returning how many records were accepted.
    fn store(&mut self, applications: &[Application]) -> Result<usize, GenerationError>;
}

/// In-memory sink with the same collision rule as the file store.
#[derive(Debug, Default)]
pub struct MemorySink {
    applications: Vec<Application>,
    references: HashSet<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

impl ApplicationSink for MemorySink {
    fn reset(&mut self) -> Result<(), GenerationError> {
        self.applications.clear();
        self.references.clear();
        Ok(())
    }

    fn store(&mut self, applications: &[Application]) -> Result<usize, GenerationError> {
        if let Some(reference) = first_collision(&self.references, applications) {
            return Err(GenerationError::Sink(format!(
                "reference {reference} is already stored"
            )));
        }
        for application in applications {
            self.references.insert(application.reference.clone());
        }
        self.applications.extend_from_slice(applications);
        Ok(applications.len())
    }
}

/// First reference in `batch` that is already in `stored` or repeated within
/// the batch itself.
pub fn first_collision<'b>(stored: &HashSet<String>, batch: &'b [Application]) -> Option<&'b str> {
    let mut seen = HashSet::with_capacity(batch.len());
    batch
        .iter()
        .map(|application| application.reference.as_str())
        .find(|reference| stored.contains(*reference) || !seen.insert(*reference))
}
