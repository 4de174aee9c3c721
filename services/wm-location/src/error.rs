//! 库位服务错误

use errors::AppError;
use thiserror::Error;
use tonic::Status;

use crate::domain::value_objects::{LabelError, LocationDepth, LocationId, WarehouseId};

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Parent location {0} not found")]
    ParentNotFound(LocationId),

    #[error("Depth mismatch: expected a {expected} parent, found a {found}")]
    DepthMismatch {
        expected: LocationDepth,
        found: LocationDepth,
    },

    #[error("Location code {code} already exists in warehouse {warehouse_id}")]
    DuplicateCode {
        warehouse_id: WarehouseId,
        code: String,
    },

    #[error("Parent location {0} is inactive")]
    InactiveParent(LocationId),

    #[error("No layout stored for warehouse {0}")]
    LayoutNotFound(WarehouseId),

    #[error("Code mismatch: operator confirmed {expected}, server derived {derived}")]
    CodeMismatch { expected: String, derived: String },

    #[error("Invalid label: {0}")]
    InvalidLabel(#[from] LabelError),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Location {0} not found")]
    NotFound(LocationId),

    #[error("Storage error: {0}")]
    Storage(#[from] AppError),
}

impl LocationError {
    /// 稳定的错误标签
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::DepthMismatch { .. } => "DEPTH_MISMATCH",
            Self::DuplicateCode { .. } => "DUPLICATE_CODE",
            Self::InactiveParent(_) => "INACTIVE_PARENT",
            Self::LayoutNotFound(_) => "LAYOUT_NOT_FOUND",
            Self::CodeMismatch { .. } => "CODE_MISMATCH",
            Self::InvalidLabel(_) => "INVALID_LABEL",
            Self::InvalidLayout(_) => "INVALID_LAYOUT",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE",
        }
    }

    pub fn is_duplicate_code(&self) -> bool {
        matches!(self, Self::DuplicateCode { .. })
    }
}

impl From<LocationError> for AppError {
    fn from(error: LocationError) -> Self {
        let message = format!("[{}] {}", error.tag(), error);
        match error {
            LocationError::Storage(inner) => inner,
            LocationError::NotFound(_) | LocationError::LayoutNotFound(_) => {
                AppError::not_found(message)
            }
            LocationError::ParentNotFound(_)
            | LocationError::DepthMismatch { .. }
            | LocationError::InactiveParent(_)
            | LocationError::CodeMismatch { .. } => AppError::failed_precondition(message),
            LocationError::DuplicateCode { .. } => AppError::conflict(message),
            LocationError::InvalidLabel(_)
            | LocationError::InvalidLayout(_)
            | LocationError::InvalidArgument(_) => AppError::validation(message),
        }
    }
}

impl From<LocationError> for Status {
    fn from(error: LocationError) -> Self {
        AppError::from(error).into()
    }
}

/// Result 类型别名
pub type LocationResult<T> = Result<T, LocationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let dup = LocationError::DuplicateCode {
            warehouse_id: WarehouseId::new(),
            code: "A-A1".to_string(),
        };
        let status = Status::from(dup);
        assert_eq!(status.code(), tonic::Code::AlreadyExists);
        assert!(status.message().starts_with("[DUPLICATE_CODE]"));

        let missing = Status::from(LocationError::ParentNotFound(LocationId::new()));
        assert_eq!(missing.code(), tonic::Code::FailedPrecondition);

        let layout = Status::from(LocationError::LayoutNotFound(WarehouseId::new()));
        assert_eq!(layout.code(), tonic::Code::NotFound);

        let label = Status::from(LocationError::from(LabelError::Empty));
        assert_eq!(label.code(), tonic::Code::InvalidArgument);
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let status = Status::from(LocationError::Storage(AppError::database(
            "relation warehouse_locations does not exist",
        )));
        assert_eq!(status.code(), tonic::Code::Internal);
        assert_eq!(status.message(), "Database error");
    }

    #[test]
    fn test_tags() {
        assert_eq!(
            LocationError::DepthMismatch {
                expected: LocationDepth::Aisle,
                found: LocationDepth::Zone,
            }
            .tag(),
            "DEPTH_MISMATCH"
        );
        assert_eq!(
            LocationError::InactiveParent(LocationId::new()).tag(),
            "INACTIVE_PARENT"
        );
    }
}
