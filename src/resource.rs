//! Concourse resource protocol
//!
//! Requests arrive as JSON on stdin and responses leave as JSON on stdout.
//! Everything here is generic over `Read`/`Write` so it can be exercised
//! without a process boundary.

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{OutParams, Source};
use crate::error::ResourceError;

/// A version token: the repository path of an artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Version {
    pub path: String,
}

impl Version {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CheckRequest {
    pub source: Source,
    #[serde(default)]
    pub version: Option<Version>,
}

impl CheckRequest {
    /// Path of the version last emitted, or empty when there is none
    pub fn previous_path(&self) -> &str {
        self.version.as_ref().map(|v| v.path.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutRequest {
    pub source: Source,
    #[serde(default)]
    pub params: OutParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub value: String,
}

impl Metadata {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutResponse {
    pub version: Version,
    pub metadata: Vec<Metadata>,
}

pub fn read_request<T: DeserializeOwned>(reader: impl Read) -> Result<T, ResourceError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_response<T: Serialize>(
    mut writer: impl Write,
    response: &T,
) -> Result<(), ResourceError> {
    serde_json::to_writer(&mut writer, response)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_request_without_version_has_empty_previous() {
        let request: CheckRequest = read_request(
            r#"{"source": {"url": "https://art.example.com", "version": ">=1.0.0"}}"#.as_bytes(),
        )
        .unwrap();

        assert_eq!(request.previous_path(), "");
        assert_eq!(request.source.version, ">=1.0.0");
    }

    #[test]
    fn check_request_with_null_version_has_empty_previous() {
        let request: CheckRequest = read_request(
            r#"{"source": {"url": "https://art.example.com"}, "version": null}"#.as_bytes(),
        )
        .unwrap();

        assert_eq!(request.previous_path(), "");
    }

    #[test]
    fn check_request_with_version_exposes_previous_path() {
        let request: CheckRequest = read_request(
            r#"{"source": {"url": "u"}, "version": {"path": "repo/app-1.0.0.zip"}}"#.as_bytes(),
        )
        .unwrap();

        assert_eq!(request.previous_path(), "repo/app-1.0.0.zip");
    }

    #[test]
    fn out_request_parses_params() {
        let request: OutRequest = read_request(
            r#"{
                "source": {"url": "u"},
                "params": {"target": "repo/dir/", "source": "build/*.zip", "threads": 5}
            }"#
            .as_bytes(),
        )
        .unwrap();

        assert_eq!(
            request.params,
            OutParams {
                target: "repo/dir/".to_string(),
                source: "build/*.zip".to_string(),
                threads: 5,
                explode_archive: false,
            }
        );
    }

    #[test]
    fn read_request_reports_malformed_json() {
        let result: Result<CheckRequest, _> = read_request("{not json".as_bytes());
        assert!(matches!(result, Err(ResourceError::Protocol(_))));
    }

    #[test]
    fn write_response_emits_version_list() {
        let mut out = Vec::new();
        let versions = vec![Version::new("a-1.0.0.zip"), Version::new("a-1.1.0.zip")];
        write_response(&mut out, &versions).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[{\"path\":\"a-1.0.0.zip\"},{\"path\":\"a-1.1.0.zip\"}]\n"
        );
    }

    #[test]
    fn write_response_emits_out_metadata() {
        let response = OutResponse {
            version: Version::new("repo/dir/app-1.0.0.zip"),
            metadata: vec![
                Metadata::new("total_uploaded", "1"),
                Metadata::new("upload_time", "1.5s"),
            ],
        };
        let mut out = Vec::new();
        write_response(&mut out, &response).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "version": {"path": "repo/dir/app-1.0.0.zip"},
                "metadata": [
                    {"name": "total_uploaded", "value": "1"},
                    {"name": "upload_time", "value": "1.5s"}
                ]
            })
        );
    }
}
