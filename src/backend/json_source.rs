//! JSON file traffic source
//!
//! Reads a document that another process rewrites periodically (for example
//! a script scraping a proxy client's API). The file is re-read on every
//! fetch. Expected shape:
//!
//! ```json
//! {
//!   "traffic": {
//!     "HK-01": { "upload": 1024, "download": 4096, "connections": 3 }
//!   },
//!   "proxies": {
//!     "HK-01": { "type": "Shadowsocks" }
//!   }
//! }
//! ```
//!
//! Record names are taken from the map keys.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ResultExt, TrafficVisError};
use crate::types::{RegistryMap, TrafficMap};

use super::source::TrafficSource;

/// On-disk document layout
#[derive(Debug, Default, Deserialize)]
pub struct TrafficDocument {
    #[serde(default)]
    pub traffic: TrafficMap,
    #[serde(default)]
    pub proxies: RegistryMap,
}

impl TrafficDocument {
    /// Parse a document, filling record names from their keys
    pub fn parse(content: &str) -> Result<Self> {
        let mut doc: TrafficDocument = serde_json::from_str(content)?;
        for (name, record) in doc.traffic.iter_mut() {
            if record.node_name.is_empty() {
                record.node_name = name.clone();
            }
        }
        Ok(doc)
    }
}

/// Traffic source backed by a JSON file
#[derive(Debug)]
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
    connected: bool,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "JSON".to_string());
        Self {
            name,
            path,
            connected: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<TrafficDocument> {
        if !self.connected {
            return Err(TrafficVisError::Source(format!(
                "{} is not connected",
                self.path.display()
            )));
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(TrafficVisError::from)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        TrafficDocument::parse(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }
}

impl TrafficSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn connect(&mut self) -> Result<()> {
        if !self.path.is_file() {
            return Err(TrafficVisError::Source(format!(
                "Snapshot file {} does not exist",
                self.path.display()
            )));
        }
        tracing::info!("Reading traffic from {}", self.path.display());
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn fetch_traffic(&mut self) -> Result<TrafficMap> {
        Ok(self.read_document()?.traffic)
    }

    fn fetch_registry(&mut self) -> Result<RegistryMap> {
        Ok(self.read_document()?.proxies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC: &str = r#"{
        "traffic": {
            "HK-01": { "upload": 1024, "download": 4096, "connections": 3 },
            "MATCH": { "upload": 10, "download": 20, "total": 30, "connection_count": 1 }
        },
        "proxies": {
            "HK-01": { "type": "Shadowsocks" },
            "Auto": { "type": "URLTest" }
        }
    }"#;

    fn write_doc(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_fills_names_from_keys() {
        let doc = TrafficDocument::parse(DOC).unwrap();
        let names: Vec<_> = doc.traffic.values().map(|r| r.node_name.as_str()).collect();
        assert_eq!(names, vec!["HK-01", "MATCH"]);
        assert_eq!(doc.traffic["HK-01"].connection_count, 3);
        assert_eq!(doc.traffic["MATCH"].total, Some(30.0));
        assert_eq!(doc.proxies["Auto"].node_type, "URLTest");
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let doc = TrafficDocument::parse("{}").unwrap();
        assert!(doc.traffic.is_empty());
        assert!(doc.proxies.is_empty());
    }

    #[test]
    fn test_fetch_from_file() {
        let file = write_doc(DOC);
        let mut source = JsonFileSource::new(file.path());
        source.connect().unwrap();

        assert_eq!(source.fetch_traffic().unwrap().len(), 2);
        assert_eq!(source.fetch_registry().unwrap().len(), 2);
    }

    #[test]
    fn test_connect_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = JsonFileSource::new(dir.path().join("absent.json"));
        assert!(source.connect().is_err());
        assert!(!source.is_connected());
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let file = write_doc("{ not json");
        let mut source = JsonFileSource::new(file.path());
        source.connect().unwrap();

        let err = source.fetch_traffic().unwrap_err();
        assert!(matches!(err.root(), TrafficVisError::Serialization(_)));
    }
}
