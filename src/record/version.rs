//! Installed wperf version detection.

use super::collaborators::VersionGate;
use crate::parser::validator::{validate, Field, Shape};
use crate::process::{CancellationToken, CommandExecutor, CommandLine, RunOptions};
use crate::utils::config::SUPPORTED_WPERF_VERSION;
use crate::utils::error::ParseError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use std::path::PathBuf;

/// One entry of `wperf --version --json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComponentVersion {
    #[serde(rename = "Component")]
    pub component: String,
    #[serde(rename = "Version")]
    pub version: String,
}

#[derive(Debug, Deserialize)]
struct VersionOutput {
    #[serde(rename = "Version")]
    version: Vec<ComponentVersion>,
}

fn version_shape() -> Shape {
    Shape::object(vec![Field::required(
        "Version",
        Shape::array(Shape::object(vec![
            Field::required("Component", Shape::String),
            Field::required("Version", Shape::String),
        ])),
    )])
}

/// Parse `wperf --version --json` output
pub fn parse_version_output(text: &str) -> Result<Vec<ComponentVersion>, ParseError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let output: VersionOutput = validate(&version_shape(), value)?;
    Ok(output.version)
}

/// `"3.8.0"` -> `(3, 8, 0)`, tolerating a missing patch and a suffix
pub fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
    let core = version.trim().trim_start_matches('v');
    let core = core.split(['-', '+', ' ']).next()?;
    let mut parts = core.split('.');

    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    Some((major, minor, patch))
}

/// Every component reports the supported `major.minor`
pub fn is_supported(components: &[ComponentVersion], supported: (u32, u32)) -> bool {
    !components.is_empty()
        && components.iter().all(|c| match parse_version(&c.version) {
            Some((major, minor, _)) => (major, minor) == supported,
            None => false,
        })
}

/// Run `wperf --version --json` and parse the result
pub async fn query_versions(
    executor: &dyn CommandExecutor,
    wperf: &std::path::Path,
    cancel: &CancellationToken,
) -> Result<Vec<ComponentVersion>> {
    let command = CommandLine::new(wperf).args(["--version", "--json"]);
    let output = executor
        .execute(&command, &RunOptions::default(), cancel)
        .await
        .context("Failed to run wperf --version")?;

    parse_version_output(&output.stdout).context("Failed to parse wperf version output")
}

/// Compatibility gate backed by the installed wperf
pub struct WperfVersionGate<'a> {
    executor: &'a dyn CommandExecutor,
    wperf: PathBuf,
    enabled: bool,
}

impl<'a> WperfVersionGate<'a> {
    pub fn new(
        executor: &'a dyn CommandExecutor,
        wperf: impl Into<PathBuf>,
        enabled: bool,
    ) -> Self {
        Self {
            executor,
            wperf: wperf.into(),
            enabled,
        }
    }
}

#[async_trait]
impl VersionGate for WperfVersionGate<'_> {
    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn is_compatible(&self) -> bool {
        let cancel = CancellationToken::new();
        match query_versions(self.executor, &self.wperf, &cancel).await {
            Ok(components) => {
                debug!("wperf components: {:?}", components);
                let supported = is_supported(&components, SUPPORTED_WPERF_VERSION);
                if !supported {
                    warn!(
                        "Unsupported wperf version(s) {:?}, expected {}.{}.x",
                        components, SUPPORTED_WPERF_VERSION.0, SUPPORTED_WPERF_VERSION.1
                    );
                }
                supported
            }
            Err(e) => {
                warn!("Version check failed: {:#}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("3.8.0"), Some((3, 8, 0)));
        assert_eq!(parse_version("v3.7"), Some((3, 7, 0)));
        assert_eq!(parse_version("4.0.1-rc1"), Some((4, 0, 1)));
        assert_eq!(parse_version("three"), None);
    }

    #[test]
    fn test_is_supported() {
        let components = parse_version_output(
            r#"{"Version":[
                {"Component":"wperf","Version":"3.8.0","FeatureString":"+etw-app"},
                {"Component":"wperf-driver","Version":"3.8.2"}
            ]}"#,
        )
        .unwrap();

        assert!(is_supported(&components, (3, 8)));
        assert!(!is_supported(&components, (3, 7)));
        assert!(!is_supported(&[], (3, 8)));
    }

    #[test]
    fn test_parse_version_output_rejects_bad_shape() {
        let err = parse_version_output(r#"{"Version":[{"Component":"wperf"}]}"#).unwrap_err();
        assert!(matches!(err, ParseError::Validation(_)));
    }
}
