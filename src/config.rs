//! Post function argument parsing, host setting keys and diagnostics.

use std::collections::HashMap;

use crate::error::{Result, WorkflowError};

/// Host setting key holding the name of the clone relationship link type.
pub const CLONE_LINK_TYPE_NAME_KEY: &str = "tracker.clone.linktype.name";
/// Host setting key holding the summary prefix applied to clones.
pub const CLONE_PREFIX_KEY: &str = "tracker.clone.prefix";

/// Argument key for the requested clone count.
pub const CLONE_COUNT_ARG: &str = "cloneCount";
/// Argument key for the attachment duplication flag.
pub const CLONE_ATTACHMENTS_ARG: &str = "cloneAttachments";
/// Argument key for the link duplication flag.
pub const CLONE_LINKS_ARG: &str = "cloneLinks";

/// Fixed diagnostic surfaced for every malformed-configuration case.
pub const INVALID_SETTINGS_MESSAGE: &str = "Invalid 'Issue Clone Post Function' settings";

/// Validated post function arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneParams {
    pub count: u32,
    pub copy_attachments: bool,
    pub copy_links: bool,
}

impl CloneParams {
    /// Parses and validates the string-keyed argument map supplied by the
    /// workflow engine. Missing, blank or malformed values fail with the
    /// fixed settings diagnostic before any issue is created.
    pub fn from_args(args: &HashMap<String, String>) -> Result<Self> {
        let count = parse_count(arg(args, CLONE_COUNT_ARG)?)?;
        let copy_attachments = parse_flag(arg(args, CLONE_ATTACHMENTS_ARG)?)?;
        let copy_links = parse_flag(arg(args, CLONE_LINKS_ARG)?)?;
        Ok(Self {
            count,
            copy_attachments,
            copy_links,
        })
    }
}

fn arg<'a>(args: &'a HashMap<String, String>, key: &str) -> Result<&'a str> {
    match args.get(key).map(|value| value.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(invalid_settings()),
    }
}

fn parse_count(raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(invalid_settings()),
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid_settings()),
    }
}

fn invalid_settings() -> WorkflowError {
    WorkflowError::Configuration(INVALID_SETTINGS_MESSAGE.to_string())
}
