//! Datasets and streams declared by a package, plus their validation.
//!
//! A dataset lives in `<package>/dataset/<dir>/manifest.yml`. Its ingest
//! pipelines live next to it in `elasticsearch/ingest-pipeline/` and must be
//! consistent with the `ingest_pipeline` field of the manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

const DEFAULT_PIPELINE: &str = "default";
const PIPELINE_EXTENSIONS: [&str; 2] = ["json", "yml"];

/// A loosely typed variable value as written in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<VarValue>),
    Map(BTreeMap<String, VarValue>),
    Null,
}

/// One named variable definition, e.g. `{name: paths, type: text, multi: true}`.
pub type VarDefinition = BTreeMap<String, VarValue>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stream {
    #[serde(default)]
    pub input: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vars: Vec<VarDefinition>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dataset: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub dataset_type: String,
    #[serde(default)]
    pub release: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingest_pipeline: Option<String>,
    #[serde(default)]
    pub streams: Vec<Stream>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub package: String,

    /// Name of the dataset directory.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,

    #[serde(skip)]
    pub base_path: PathBuf,
}

impl Dataset {
    /// Build a dataset from its manifest and fill in the defaults.
    ///
    /// `base_path` is the dataset directory; its file name becomes `path`
    /// and the default id suffix.
    pub fn from_manifest(content: &str, package: &str, base_path: &Path) -> Result<Self> {
        let dir_name = base_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let mut dataset: Dataset = serde_yaml_ng::from_str(content).with_context(|| {
            format!(
                "error building dataset (path: {}) in package: {}",
                dir_name, package
            )
        })?;

        dataset.package = package.to_string();
        dataset.path = dir_name;
        dataset.base_path = base_path.to_path_buf();

        if dataset.id.is_empty() {
            dataset.id = format!("{}.{}", package, dataset.path);
        }
        if dataset.release.is_empty() {
            dataset.release = "beta".to_string();
        }
        if dataset
            .ingest_pipeline
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            dataset.ingest_pipeline = None;
        }

        dataset.check_required_fields()?;
        Ok(dataset)
    }

    fn check_required_fields(&self) -> Result<(), CatalogError> {
        let missing = |field| CatalogError::MissingField {
            field,
            context: format!("dataset {}", self.id),
        };

        if self.title.trim().is_empty() {
            return Err(missing("title"));
        }
        if self.dataset_type.trim().is_empty() {
            return Err(missing("type"));
        }
        if self.streams.is_empty() {
            return Err(missing("streams"));
        }
        if self.streams.iter().any(|s| s.input.trim().is_empty()) {
            return Err(missing("streams.input"));
        }
        Ok(())
    }

    /// Directory holding the custom ingest pipelines of this dataset.
    pub fn pipeline_dir(&self) -> PathBuf {
        self.base_path.join("elasticsearch").join("ingest-pipeline")
    }

    /// Check the identifier and the ingest pipeline wiring.
    ///
    /// `pipeline_files` are the file names found in [`Self::pipeline_dir`].
    /// A `default.json`/`default.yml` file is picked up implicitly when no
    /// pipeline is declared.
    pub fn validate(&mut self, pipeline_files: &[String]) -> Result<(), CatalogError> {
        if self.id.contains('-') {
            return Err(CatalogError::InvalidIdentifier(self.id.clone()));
        }

        if self.ingest_pipeline.is_none() && has_pipeline_file(pipeline_files, DEFAULT_PIPELINE)
        {
            self.ingest_pipeline = Some(DEFAULT_PIPELINE.to_string());
        }

        match &self.ingest_pipeline {
            None if !pipeline_files.is_empty() => Err(CatalogError::UnusedPipelines {
                dataset: self.id.clone(),
                files: pipeline_files.to_vec(),
            }),
            None => Ok(()),
            Some(pipeline) if !has_pipeline_file(pipeline_files, pipeline) => {
                Err(CatalogError::MissingPipeline {
                    dataset: self.id.clone(),
                    pipeline: pipeline.clone(),
                    dir: self.pipeline_dir(),
                })
            }
            Some(_) => Ok(()),
        }
    }
}

fn has_pipeline_file(files: &[String], pipeline: &str) -> bool {
    PIPELINE_EXTENSIONS
        .iter()
        .any(|ext| files.iter().any(|f| *f == format!("{}.{}", pipeline, ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_MANIFEST: &str = r#"
title: Nginx access logs
type: logs
streams:
  - input: logs
    title: Access logs
    vars:
      - name: paths
        type: text
        multi: true
        default:
          - /var/log/nginx/access.log*
      - name: period
        default: 10
      - name: ratio
        default: 0.5
      - name: ssl
        default: ~
"#;

    fn dataset(id: &str, pipeline: Option<&str>) -> Dataset {
        Dataset {
            id: id.to_string(),
            title: "Access".into(),
            dataset_type: "logs".into(),
            release: "beta".into(),
            ingest_pipeline: pipeline.map(String::from),
            streams: vec![Stream {
                input: "logs".into(),
                ..Default::default()
            }],
            base_path: PathBuf::from("/pkg/nginx/1.0.0/dataset/access"),
            ..Default::default()
        }
    }

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_manifest_defaults() {
        let base = PathBuf::from("/pkg/nginx/1.0.0/dataset/access");
        let ds = Dataset::from_manifest(ACCESS_MANIFEST, "nginx", &base).unwrap();

        assert_eq!(ds.id, "nginx.access");
        assert_eq!(ds.release, "beta");
        assert_eq!(ds.package, "nginx");
        assert_eq!(ds.path, "access");
        assert_eq!(ds.base_path, base);
        assert_eq!(ds.ingest_pipeline, None);
        assert_eq!(ds.streams.len(), 1);
    }

    #[test]
    fn test_from_manifest_typed_vars() {
        let base = PathBuf::from("/pkg/nginx/1.0.0/dataset/access");
        let ds = Dataset::from_manifest(ACCESS_MANIFEST, "nginx", &base).unwrap();
        let vars = &ds.streams[0].vars;

        assert_eq!(vars[0]["name"], VarValue::String("paths".into()));
        assert_eq!(vars[0]["multi"], VarValue::Bool(true));
        assert_eq!(
            vars[0]["default"],
            VarValue::List(vec![VarValue::String("/var/log/nginx/access.log*".into())])
        );
        assert_eq!(vars[1]["default"], VarValue::Integer(10));
        assert_eq!(vars[2]["default"], VarValue::Float(0.5));
        assert_eq!(vars[3]["default"], VarValue::Null);
    }

    #[test]
    fn test_from_manifest_keeps_explicit_values() {
        let manifest = r#"
id: nginx.custom
title: Custom
type: metrics
release: ga
ingest_pipeline: access
streams:
  - input: nginx/metrics
"#;
        let base = PathBuf::from("/pkg/nginx/1.0.0/dataset/other");
        let ds = Dataset::from_manifest(manifest, "nginx", &base).unwrap();
        assert_eq!(ds.id, "nginx.custom");
        assert_eq!(ds.release, "ga");
        assert_eq!(ds.ingest_pipeline.as_deref(), Some("access"));
    }

    #[test]
    fn test_from_manifest_missing_required_fields() {
        let base = PathBuf::from("/pkg/nginx/1.0.0/dataset/access");

        let cases = [
            ("type: logs\nstreams:\n  - input: logs\n", "title"),
            ("title: A\nstreams:\n  - input: logs\n", "type"),
            ("title: A\ntype: logs\n", "streams"),
            ("title: A\ntype: logs\nstreams:\n  - title: x\n", "streams.input"),
        ];

        for (manifest, expected) in cases {
            let err = Dataset::from_manifest(manifest, "nginx", &base).unwrap_err();
            match err.downcast_ref::<CatalogError>() {
                Some(CatalogError::MissingField { field, .. }) => assert_eq!(*field, expected),
                other => panic!("unexpected error for {expected}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_manifest_invalid_yaml() {
        let base = PathBuf::from("/pkg/nginx/1.0.0/dataset/access");
        let err = Dataset::from_manifest("title: [unclosed", "nginx", &base).unwrap_err();
        assert!(err.to_string().contains("error building dataset"));
    }

    #[test]
    fn test_validate_rejects_hyphen() {
        let mut ds = dataset("my-dataset", None);
        let err = ds.validate(&[]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidIdentifier(id) if id == "my-dataset"));
    }

    #[test]
    fn test_validate_no_pipelines() {
        let mut ds = dataset("nginx.access", None);
        ds.validate(&[]).unwrap();
        assert_eq!(ds.ingest_pipeline, None);
    }

    #[test]
    fn test_validate_picks_up_default_pipeline() {
        for name in ["default.json", "default.yml"] {
            let mut ds = dataset("nginx.access", None);
            ds.validate(&files(&[name])).unwrap();
            assert_eq!(ds.ingest_pipeline.as_deref(), Some("default"));
        }
    }

    #[test]
    fn test_validate_unused_pipelines() {
        let mut ds = dataset("nginx.access", None);
        let err = ds.validate(&files(&["custom.json"])).unwrap_err();
        match err {
            CatalogError::UnusedPipelines { dataset, files } => {
                assert_eq!(dataset, "nginx.access");
                assert_eq!(files, vec!["custom.json".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_explicit_pipeline_present() {
        let mut ds = dataset("nginx.access", Some("access"));
        ds.validate(&files(&["access.yml"])).unwrap();
        assert_eq!(ds.ingest_pipeline.as_deref(), Some("access"));

        let mut ds = dataset("nginx.access", Some("access"));
        ds.validate(&files(&["access.json", "helper.json"])).unwrap();
    }

    #[test]
    fn test_validate_explicit_pipeline_missing() {
        let mut ds = dataset("nginx.access", Some("access"));
        let err = ds.validate(&files(&["default.json"])).unwrap_err();
        match err {
            CatalogError::MissingPipeline { pipeline, dir, .. } => {
                assert_eq!(pipeline, "access");
                assert_eq!(
                    dir,
                    PathBuf::from("/pkg/nginx/1.0.0/dataset/access/elasticsearch/ingest-pipeline")
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_explicit_pipeline_no_directory() {
        let mut ds = dataset("nginx.access", Some("access"));
        let err = ds.validate(&[]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingPipeline { .. }));
    }

    #[test]
    fn test_base_path_not_serialized() {
        let ds = dataset("nginx.access", None);
        let json = serde_json::to_value(&ds).unwrap();
        assert!(json.get("base_path").is_none());
        assert_eq!(json["type"], "logs");
    }
}
