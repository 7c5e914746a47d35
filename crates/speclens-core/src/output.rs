//! Lens records and JSON output types for CLI responses.
//!
//! ## Lens Records
//!
//! Every recognized call site produces three [`LensRecord`]s, one per
//! [`LensKind`]. The records share their name, path and location and differ in
//! title, command identifier and `data.type`:
//!
//! | Kind | Title | Command | Command text |
//! |------|-------|---------|--------------|
//! | `test` | `Run` | `rubyLsp.runTest` | runner command |
//! | `test_in_terminal` | `Run In Terminal` | `rubyLsp.runTestInTerminal` | terminal command |
//! | `debug` | `Debug` | `rubyLsp.debugTest` | runner command |
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input -> same output (field order, array ordering)
//! 3. **Nullable vs absent:** `group_id` is an explicit `null` at top level;
//!    `id` is absent on anything that is not a group
//! 4. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::command::{BaseCommand, RunCommands};
use crate::error::{LensError, OutputErrorCode};
use crate::types::{GroupId, LensLocation, Range};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// Host command that runs a test through the editor's test runner.
pub const RUN_TEST_COMMAND: &str = "rubyLsp.runTest";

/// Host command that runs a test in an integrated terminal.
pub const RUN_TEST_IN_TERMINAL_COMMAND: &str = "rubyLsp.runTestInTerminal";

/// Host command that runs a test under the debugger.
pub const DEBUG_TEST_COMMAND: &str = "rubyLsp.debugTest";

// ============================================================================
// Lens Records
// ============================================================================

/// Kind of affordance a lens record offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LensKind {
    /// Run through the editor's test runner.
    Test,
    /// Run in a terminal.
    TestInTerminal,
    /// Run under the debugger.
    Debug,
}

impl LensKind {
    /// All kinds, in emission order.
    pub const ALL: [LensKind; 3] = [LensKind::Test, LensKind::TestInTerminal, LensKind::Debug];

    /// Title shown in the editor.
    pub fn title(self) -> &'static str {
        match self {
            LensKind::Test => "Run",
            LensKind::TestInTerminal => "Run In Terminal",
            LensKind::Debug => "Debug",
        }
    }

    /// Host command identifier.
    pub fn command_id(self) -> &'static str {
        match self {
            LensKind::Test => RUN_TEST_COMMAND,
            LensKind::TestInTerminal => RUN_TEST_IN_TERMINAL_COMMAND,
            LensKind::Debug => DEBUG_TEST_COMMAND,
        }
    }

    /// Pick the command text this kind carries.
    pub fn command_text(self, commands: &RunCommands) -> &str {
        match self {
            LensKind::TestInTerminal => &commands.terminal,
            LensKind::Test | LensKind::Debug => &commands.runner,
        }
    }
}

/// Arguments passed to the host command.
///
/// Serialized as a positional array: `[path, name, command, location]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensArguments(
    /// Workspace-relative path of the spec file.
    pub String,
    /// Display name of the example or group.
    pub String,
    /// Shell command text.
    pub String,
    /// Location of the call, 0-indexed lines.
    pub LensLocation,
);

impl LensArguments {
    pub fn path(&self) -> &str {
        &self.0
    }

    pub fn name(&self) -> &str {
        &self.1
    }

    pub fn command(&self) -> &str {
        &self.2
    }

    pub fn location(&self) -> &LensLocation {
        &self.3
    }
}

/// Grouping payload attached to every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensData {
    /// Kind of the record.
    #[serde(rename = "type")]
    pub kind: LensKind,
    /// Innermost enclosing group, `null` at top level.
    pub group_id: Option<GroupId>,
    /// The call's own group id; present only when the call is a group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<GroupId>,
}

/// One run/debug affordance anchored to a source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensRecord {
    /// Title shown in the editor.
    pub title: String,
    /// Host command identifier.
    pub command: String,
    /// Host command arguments.
    pub arguments: LensArguments,
    /// Grouping payload.
    pub data: LensData,
    /// Anchor of the lens in the document.
    pub range: Range,
}

impl LensRecord {
    /// Create a record of `kind` for one call site.
    pub fn new(
        kind: LensKind,
        path: &str,
        name: &str,
        commands: &RunCommands,
        location: LensLocation,
        group_id: Option<GroupId>,
        id: Option<GroupId>,
    ) -> Self {
        LensRecord {
            title: kind.title().to_string(),
            command: kind.command_id().to_string(),
            arguments: LensArguments(
                path.to_string(),
                name.to_string(),
                kind.command_text(commands).to_string(),
                location,
            ),
            data: LensData {
                kind,
                group_id,
                id,
            },
            range: Range::from(&location),
        }
    }

    /// Kind of the record.
    pub fn kind(&self) -> LensKind {
        self.data.kind
    }

    /// Display name of the example or group.
    pub fn name(&self) -> &str {
        self.arguments.name()
    }

    /// Whether the record belongs to a group rather than an example.
    pub fn is_group(&self) -> bool {
        self.data.id.is_some()
    }
}

/// Destination for lens records produced during a traversal.
pub trait LensSink {
    /// Append one record.
    fn push_lens(&mut self, record: LensRecord);
}

impl LensSink for Vec<LensRecord> {
    fn push_lens(&mut self, record: LensRecord) {
        self.push(record);
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Lenses computed for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLenses {
    /// Workspace-relative path.
    pub path: String,
    /// Records in emission order.
    pub lenses: Vec<LensRecord>,
}

/// Response for the `lens` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// One entry per requested file, in request order.
    pub files: Vec<FileLenses>,
}

impl LensResponse {
    pub fn new(files: Vec<FileLenses>) -> Self {
        LensResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            files,
        }
    }

    /// Total number of records across all files.
    pub fn lens_count(&self) -> usize {
        self.files.iter().map(|f| f.lenses.len()).sum()
    }
}

/// Response for the `base-command` command.
#[derive(Debug, Clone, Serialize)]
pub struct BaseCommandResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// The resolved command.
    pub base_command: BaseCommand,
}

impl BaseCommandResponse {
    pub fn new(base_command: BaseCommand) -> Self {
        BaseCommandResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            base_command,
        }
    }
}

/// Error information for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a LensError.
    pub fn from_error(err: &LensError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let details = match err {
            LensError::FileOutsideWorkspace {
                file,
                workspace_root,
            } => Some(serde_json::json!({
                "file": file.display().to_string(),
                "workspace_root": workspace_root.display().to_string(),
            })),
            LensError::FileNotFound { path } => Some(serde_json::json!({ "path": path })),
            _ => None,
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a LensError.
    pub fn from_error(err: &LensError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
