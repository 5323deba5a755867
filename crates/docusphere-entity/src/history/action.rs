//! History action and target enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of action a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "history_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// A file was uploaded.
    Upload,
    /// A resource was deleted.
    Delete,
    /// A resource was shared with accounts.
    Share,
    /// Accounts were removed from a share list.
    Unshare,
    /// Metadata of a resource changed.
    Modify,
    /// A folder was created.
    CreateFolder,
    /// A resource moved to another folder.
    Move,
    /// A resource was renamed.
    Rename,
    /// A download URL was issued.
    Download,
    /// A preview URL was issued.
    Preview,
    /// A resource was restored.
    Restore,
    /// A resource was archived.
    Archive,
}

impl HistoryAction {
    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Delete => "delete",
            Self::Share => "share",
            Self::Unshare => "unshare",
            Self::Modify => "modify",
            Self::CreateFolder => "create_folder",
            Self::Move => "move",
            Self::Rename => "rename",
            Self::Download => "download",
            Self::Preview => "preview",
            Self::Restore => "restore",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryAction {
    type Err = docusphere_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(Self::Upload),
            "delete" => Ok(Self::Delete),
            "share" => Ok(Self::Share),
            "unshare" => Ok(Self::Unshare),
            "modify" => Ok(Self::Modify),
            "create_folder" => Ok(Self::CreateFolder),
            "move" => Ok(Self::Move),
            "rename" => Ok(Self::Rename),
            "download" => Ok(Self::Download),
            "preview" => Ok(Self::Preview),
            "restore" => Ok(Self::Restore),
            "archive" => Ok(Self::Archive),
            _ => Err(docusphere_core::AppError::validation(format!(
                "Invalid history action: '{s}'"
            ))),
        }
    }
}

/// The kind of resource a history entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "history_target", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// A file.
    File,
    /// A folder.
    Folder,
    /// A task.
    Task,
}

impl TargetType {
    /// Return the target type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = docusphere_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            "task" => Ok(Self::Task),
            _ => Err(docusphere_core::AppError::validation(format!(
                "Invalid target type: '{s}'. Expected one of: file, folder, task"
            ))),
        }
    }
}
