//! Results directory store
//!
//! Filesystem implementation of the [`TraceRepository`] port. Each
//! subdirectory of the results root is one configuration, laid out either as
//! `<configuration>/<problem>/<instance>.csv` or as a single
//! `<configuration>/results.csv` holding every run.

use crate::trace_source::{parse_trace, split_combined, TraceSchema};
use async_trait::async_trait;
use parking_lot::RwLock;
use solverbench_application::{RunCatalog, TraceRepository};
use solverbench_common::{InputConfig, ResultsLayout};
use solverbench_domain::{
    AnalysisError, AnalysisResult, ConfigurationId, ExcludedTrace, InstanceKey, RunKey, Trace,
    TraceError,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// File name of a combined results file
pub const COMBINED_FILE_NAME: &str = "results.csv";

const TRACE_EXTENSION: &str = "csv";

/// Trace repository reading a results directory
pub struct ResultsStore {
    root: PathBuf,
    layout: ResultsLayout,
    schema: TraceSchema,
    /// Traces split out of combined files during the last catalog
    combined: RwLock<BTreeMap<RunKey, Result<Trace, TraceError>>>,
}

impl ResultsStore {
    /// Create a store over `root`
    pub fn new(root: impl Into<PathBuf>, layout: ResultsLayout, schema: TraceSchema) -> Self {
        Self {
            root: root.into(),
            layout,
            schema,
            combined: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a store from the input configuration
    pub fn from_config(config: &InputConfig) -> Self {
        Self::new(
            config.results_dir.clone(),
            config.layout,
            TraceSchema::from(config),
        )
    }

    /// Results root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a per-instance trace file
    pub fn trace_path(&self, run: &RunKey) -> PathBuf {
        self.root
            .join(run.configuration.as_str())
            .join(run.instance.problem.as_str())
            .join(format!("{}.{}", run.instance.instance, TRACE_EXTENSION))
    }

    async fn layout_of(&self, dir: &Path) -> ResultsLayout {
        match self.layout {
            ResultsLayout::Auto => {
                if is_file(&dir.join(COMBINED_FILE_NAME)).await {
                    ResultsLayout::Combined
                } else {
                    ResultsLayout::PerInstance
                }
            }
            layout => layout,
        }
    }

    async fn catalog_per_instance(
        &self,
        configuration: &ConfigurationId,
        dir: &Path,
        catalog: &mut RunCatalog,
    ) -> AnalysisResult<()> {
        for (problem, problem_dir) in sorted_entries(dir, EntryKind::Directory).await? {
            for (file_name, _) in sorted_entries(&problem_dir, EntryKind::File).await? {
                let Some(instance) = file_name.strip_suffix(&format!(".{}", TRACE_EXTENSION))
                else {
                    continue;
                };
                catalog.runs.push(RunKey::new(
                    configuration.clone(),
                    InstanceKey::new(problem.as_str(), instance),
                ));
            }
        }
        Ok(())
    }

    async fn catalog_combined(
        &self,
        configuration: &ConfigurationId,
        dir: &Path,
        catalog: &mut RunCatalog,
    ) {
        let path = dir.join(COMBINED_FILE_NAME);
        let split = match tokio::fs::read(&path).await {
            Ok(contents) => split_combined(contents.as_slice(), &self.schema),
            Err(error) => Err(TraceError::Source {
                path: path.display().to_string(),
                message: error.to_string(),
            }),
        };

        match split {
            Ok(traces) => {
                debug!(
                    configuration = %configuration,
                    instances = traces.len(),
                    "Split combined results file"
                );
                let mut cache = self.combined.write();
                for (instance, trace) in traces {
                    let run = RunKey::new(configuration.clone(), instance);
                    catalog.runs.push(run.clone());
                    cache.insert(run, trace);
                }
            }
            Err(error) => {
                warn!(
                    configuration = %configuration,
                    path = %path.display(),
                    error = %error,
                    "Rejecting combined results file"
                );
                catalog.rejected.push(ExcludedTrace::source(
                    configuration.clone(),
                    error.error_code(),
                    format!("{}: {}", path.display(), error),
                ));
            }
        }
    }
}

#[async_trait]
impl TraceRepository for ResultsStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn catalog(&self) -> AnalysisResult<RunCatalog> {
        if !is_dir(&self.root).await {
            return Err(AnalysisError::Source(format!(
                "results directory {} does not exist",
                self.root.display()
            )));
        }

        self.combined.write().clear();
        let mut catalog = RunCatalog::default();

        for (name, dir) in sorted_entries(&self.root, EntryKind::Directory).await? {
            let configuration = ConfigurationId::new(name);
            catalog.configurations.push(configuration.clone());

            match self.layout_of(&dir).await {
                ResultsLayout::Combined => {
                    self.catalog_combined(&configuration, &dir, &mut catalog)
                        .await
                }
                _ => {
                    self.catalog_per_instance(&configuration, &dir, &mut catalog)
                        .await?
                }
            }
        }

        catalog.runs.sort();
        catalog.rejected.sort();
        info!(
            configurations = catalog.configurations.len(),
            runs = catalog.runs.len(),
            rejected = catalog.rejected.len(),
            "Catalogued results directory"
        );
        Ok(catalog)
    }

    async fn load_trace(&self, run: &RunKey) -> Result<Trace, TraceError> {
        let cached = self.combined.read().get(run).cloned();
        if let Some(cached) = cached {
            return cached;
        }

        let path = self.trace_path(run);
        let contents = tokio::fs::read(&path)
            .await
            .map_err(|error| TraceError::Source {
                path: path.display().to_string(),
                message: error.to_string(),
            })?;
        parse_trace(contents.as_slice(), &self.schema)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Visible entries of a directory of one kind, ordered by name
async fn sorted_entries(dir: &Path, kind: EntryKind) -> AnalysisResult<Vec<(String, PathBuf)>> {
    let source_error = |error: std::io::Error| {
        AnalysisError::Source(format!("cannot read directory {}: {}", dir.display(), error))
    };

    let mut reader = tokio::fs::read_dir(dir).await.map_err(source_error)?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(source_error)? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        let matches = match kind {
            EntryKind::File => is_file(&path).await,
            EntryKind::Directory => is_dir(&path).await,
        };
        if matches {
            entries.push((name, path));
        }
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn test_per_instance_catalog() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b/jobshop/ft06.csv", "time,objective\n2,8\n");
        write(dir.path(), "a/jobshop/ft06.csv", "time,objective\n1,10\n3,4\n");
        write(dir.path(), "a/jobshop/notes.txt", "ignored");
        write(dir.path(), ".hidden/jobshop/ft06.csv", "time,objective\n");

        let store = ResultsStore::new(dir.path(), ResultsLayout::Auto, TraceSchema::default());
        let catalog = store.catalog().await.unwrap();

        let names: Vec<&str> = catalog.configurations.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(catalog.runs.len(), 2);
        assert_eq!(catalog.runs[0].to_string(), "a@jobshop/ft06");

        let trace = store.load_trace(&catalog.runs[0]).await.unwrap();
        assert_eq!(trace.len(), 2);
    }

    #[tokio::test]
    async fn test_combined_catalog() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "a/results.csv",
            "problem,flatzinc,type,time,objective\njobshop,ft06,new_solution,1,10\njobshop,ft10,new_solution,2,30\n",
        );
        write(dir.path(), "broken/results.csv", "problem,time,objective\njobshop,1,4\n");

        let store = ResultsStore::new(dir.path(), ResultsLayout::Auto, TraceSchema::default());
        let catalog = store.catalog().await.unwrap();

        assert_eq!(catalog.configurations.len(), 2);
        assert_eq!(catalog.runs.len(), 2);
        assert_eq!(catalog.rejected.len(), 1);
        assert_eq!(catalog.rejected[0].code, "SCHEMA_ERROR");
        assert_eq!(catalog.rejected[0].instance, None);

        let run = RunKey::new("a", InstanceKey::new("jobshop", "ft10"));
        let trace = store.load_trace(&run).await.unwrap();
        assert_eq!(trace.first_time(), Some(2.0));
    }

    #[tokio::test]
    async fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(
            dir.path().join("missing"),
            ResultsLayout::Auto,
            TraceSchema::default(),
        );
        let error = store.catalog().await.unwrap_err();
        assert_eq!(error.error_code(), "SOURCE_ERROR");
    }

    #[tokio::test]
    async fn test_unreadable_trace() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(dir.path(), ResultsLayout::PerInstance, TraceSchema::default());
        let run = RunKey::new("a", InstanceKey::new("jobshop", "ft06"));

        let error = store.load_trace(&run).await.unwrap_err();
        assert_eq!(error.error_code(), "SOURCE_ERROR");
    }
}
