//! External tool capability check
//!
//! Run once at startup; adapters are built from the resulting report.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::adapters::process::ToolCommand;
use crate::config_initialization::ToolPaths;
use crate::domain::errors::*;

/// Role an external tool plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolRole {
    Prober,
    Extractor,
    Converter,
}

impl ToolRole {
    pub fn name(&self) -> &'static str {
        match self {
            ToolRole::Prober => "prober",
            ToolRole::Extractor => "extractor",
            ToolRole::Converter => "converter",
        }
    }
}

/// Result of checking one tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStatus {
    pub role: ToolRole,
    pub program: String,
    pub available: bool,
    /// First line of `-version` output
    pub version: Option<String>,
    pub error: Option<String>,
}

/// Availability of every external tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainReport {
    pub tools: Vec<ToolStatus>,
}

impl ToolchainReport {
    pub fn status(&self, role: ToolRole) -> Option<&ToolStatus> {
        self.tools.iter().find(|tool| tool.role == role)
    }

    pub fn all_available(&self) -> bool {
        self.tools.iter().all(|tool| tool.available)
    }

    /// Fail with the first missing tool among `roles`
    pub fn require(&self, roles: &[ToolRole]) -> Result<(), DomainError> {
        for role in roles {
            match self.status(*role) {
                Some(status) if status.available => {}
                Some(status) => {
                    return Err(DomainError::ToolUnavailable {
                        tool: status.program.clone(),
                        message: status
                            .error
                            .clone()
                            .unwrap_or_else(|| format!("{} not usable", role.name())),
                    })
                }
                None => {
                    return Err(DomainError::ToolUnavailable {
                        tool: role.name().to_string(),
                        message: "not checked".to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

/// Tool detection entry point
pub struct Toolchain;

impl Toolchain {
    /// Check every configured tool by running `<program> -version`
    pub async fn detect(paths: &ToolPaths) -> ToolchainReport {
        let mut tools = Vec::with_capacity(3);
        for (role, program) in [
            (ToolRole::Prober, &paths.ffprobe),
            (ToolRole::Extractor, &paths.ffmpeg),
            (ToolRole::Converter, &paths.magick),
        ] {
            tools.push(Self::check(role, program).await);
        }
        ToolchainReport { tools }
    }

    async fn check(role: ToolRole, program: &str) -> ToolStatus {
        match ToolCommand::new(program).arg("-version").run().await {
            Ok(output) if output.success() => {
                let version = output
                    .combined()
                    .lines()
                    .find(|line| !line.trim().is_empty())
                    .map(|line| line.trim().to_string());
                debug!("{} available: {:?}", program, version);
                ToolStatus {
                    role,
                    program: program.to_string(),
                    available: true,
                    version,
                    error: None,
                }
            }
            Ok(output) => {
                warn!("{} exited with {}", program, output.status_label());
                ToolStatus {
                    role,
                    program: program.to_string(),
                    available: false,
                    version: None,
                    error: Some(output.status_label()),
                }
            }
            Err(e) => {
                warn!("{} not installed? {}", program, e);
                ToolStatus {
                    role,
                    program: program.to_string(),
                    available: false,
                    version: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
