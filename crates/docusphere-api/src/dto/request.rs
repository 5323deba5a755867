//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use docusphere_entity::account::AccountRole;
use docusphere_entity::file::UpdateFile;
use docusphere_entity::history::{HistoryAction, TargetType};
use docusphere_entity::post::{PostAttachment, UpdatePost};
use docusphere_entity::task::{TaskPriority, TaskStatus};
use docusphere_service::account::{
    ChangePasswordRequest, CreateAccountRequest, UpdateAccountRequest,
};
use docusphere_service::auth::RegisterRequest;
use docusphere_service::history::RecordRequest;
use docusphere_service::post::CreatePostRequest;
use docusphere_service::task::{CreateTaskRequest, UpdateTaskRequest};

/// Registration body. Blank fields are reported by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterBody {
    /// Display name.
    #[validate(length(max = 100, message = "Name is too long"))]
    pub name: String,
    /// Email.
    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: String,
    /// Password.
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: String,
}

impl From<RegisterBody> for RegisterRequest {
    fn from(body: RegisterBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            password: body.password,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginBody {
    /// Email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `?folder_id=` on the file listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileListQuery {
    /// Folder to list; the root when absent.
    pub folder_id: Option<Uuid>,
}

/// Update file metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateFileBody {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
}

impl From<UpdateFileBody> for UpdateFile {
    fn from(body: UpdateFileBody) -> Self {
        Self {
            name: body.name,
            is_public: body.is_public,
            tags: body.tags,
        }
    }
}

/// Rename a file or folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameBody {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Move a file or folder. A missing or null target means the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MoveBody {
    /// Target folder ID.
    pub target_folder_id: Option<Uuid>,
}

/// Share or unshare with accounts.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShareBody {
    /// Accounts to add or remove.
    #[validate(length(min = 1, message = "At least one account is required"))]
    pub account_ids: Vec<Uuid>,
}

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderBody {
    /// Folder name.
    #[validate(length(max = 255, message = "Name is too long"))]
    pub name: String,
    /// Parent folder ID; the root when absent.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Folder visibility.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VisibilityBody {
    /// Whether the folder is public.
    pub is_public: bool,
}

/// Client-submitted history entry.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordHistoryBody {
    /// What happened.
    pub action_type: HistoryAction,
    /// Kind of resource.
    pub target_type: TargetType,
    /// Resource ID.
    pub target_id: Uuid,
    /// Description.
    #[validate(length(min = 1, max = 1000, message = "Details must be 1-1000 characters"))]
    pub details: String,
    /// Extra data.
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl From<RecordHistoryBody> for RecordRequest {
    fn from(body: RecordHistoryBody) -> Self {
        Self {
            action_type: body.action_type,
            target_type: body.target_type,
            target_id: body.target_id,
            details: body.details,
            metadata: body.metadata,
        }
    }
}

/// `?status=` on the task listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListQuery {
    /// Only tasks in this status.
    pub status: Option<TaskStatus>,
}

/// Create task body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateTaskBody {
    /// Title.
    #[validate(length(max = 200, message = "Title is too long"))]
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Priority.
    pub priority: Option<TaskPriority>,
    /// Initial status.
    pub status: Option<TaskStatus>,
    /// Assignee.
    pub assigned_to: Option<Uuid>,
    /// Tags.
    pub tags: Vec<String>,
    /// Due date.
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<CreateTaskBody> for CreateTaskRequest {
    fn from(body: CreateTaskBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            priority: body.priority,
            status: body.status,
            assigned_to: body.assigned_to,
            tags: body.tags,
            due_date: body.due_date,
        }
    }
}

/// Update task body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateTaskBody {
    /// Title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Priority.
    pub priority: Option<TaskPriority>,
    /// Status.
    pub status: Option<TaskStatus>,
    /// Assignee.
    pub assigned_to: Option<Uuid>,
    /// Tags.
    pub tags: Option<Vec<String>>,
    /// Due date.
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Completion flag.
    pub completed: Option<bool>,
}

impl From<UpdateTaskBody> for UpdateTaskRequest {
    fn from(body: UpdateTaskBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            priority: body.priority,
            status: body.status,
            assigned_to: body.assigned_to,
            tags: body.tags,
            due_date: body.due_date,
            completed: body.completed,
        }
    }
}

/// Create post body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreatePostBody {
    /// Title.
    #[validate(length(max = 200, message = "Title is too long"))]
    pub title: String,
    /// Body.
    pub content: String,
    /// Attachments returned by the upload endpoint.
    pub files: Vec<PostAttachment>,
    /// Tags.
    pub tags: Vec<String>,
}

impl From<CreatePostBody> for CreatePostRequest {
    fn from(body: CreatePostBody) -> Self {
        Self {
            title: body.title,
            content: body.content,
            files: body.files,
            tags: body.tags,
        }
    }
}

/// Update post body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdatePostBody {
    /// Title.
    #[validate(length(max = 200, message = "Title is too long"))]
    pub title: Option<String>,
    /// Body.
    pub content: Option<String>,
    /// Tags.
    pub tags: Option<Vec<String>>,
}

impl From<UpdatePostBody> for UpdatePost {
    fn from(body: UpdatePostBody) -> Self {
        Self {
            title: body.title,
            content: body.content,
            tags: body.tags,
        }
    }
}

/// Comment body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentBody {
    /// Comment text.
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
}

/// Create account (Admin).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateAccountBody {
    /// Display name.
    #[validate(length(max = 100, message = "Name is too long"))]
    pub name: String,
    /// Email.
    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: String,
    /// Initial password.
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: String,
    /// Role; Viewer when absent.
    pub role: Option<AccountRole>,
    /// Avatar URL.
    #[validate(url(message = "Avatar must be a URL"))]
    pub avatar_url: Option<String>,
}

impl From<CreateAccountBody> for CreateAccountRequest {
    fn from(body: CreateAccountBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
            avatar_url: body.avatar_url,
        }
    }
}

/// Update account profile (and role, for Admins).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateAccountBody {
    /// Display name.
    #[validate(length(max = 100, message = "Name is too long"))]
    pub name: Option<String>,
    /// Email.
    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: Option<String>,
    /// Avatar URL.
    #[validate(url(message = "Avatar must be a URL"))]
    pub avatar_url: Option<String>,
    /// Role.
    pub role: Option<AccountRole>,
}

impl From<UpdateAccountBody> for UpdateAccountRequest {
    fn from(body: UpdateAccountBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            avatar_url: body.avatar_url,
            role: body.role,
        }
    }
}

/// Password change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordBody {
    /// Current password; required when changing one's own.
    #[serde(default)]
    pub current_password: Option<String>,
    /// New password.
    #[validate(length(min = 1, max = 128, message = "New password is required"))]
    pub new_password: String,
}

impl From<ChangePasswordBody> for ChangePasswordRequest {
    fn from(body: ChangePasswordBody) -> Self {
        Self {
            current_password: body.current_password,
            new_password: body.new_password,
        }
    }
}
