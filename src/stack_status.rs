use std::convert::TryFrom;
use termcolor::{Color, ColorSpec};

/// A status string outside the set CloudFormation documents.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown status {0}")]
pub struct UnknownStatus(pub String);

/// Stack and resource statuses as reported by CloudFormation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    CreateInProgress,
    CreateComplete,
    CreateFailed,
    DeleteComplete,
    DeleteFailed,
    DeleteSkipped,
    DeleteInProgress,
    ReviewInProgress,
    RollbackComplete,
    RollbackFailed,
    RollbackInProgress,
    UpdateComplete,
    UpdateCompleteCleanupInProgress,
    UpdateFailed,
    UpdateInProgress,
    UpdateRollbackComplete,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackFailed,
    UpdateRollbackInProgress,
    ImportInProgress,
    ImportComplete,
    ImportFailed,
    ImportRollbackInProgress,
    ImportRollbackFailed,
    ImportRollbackComplete,
}

impl TryFrom<&str> for Status {
    type Error = UnknownStatus;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        use Status::*;
        match value {
            "CREATE_IN_PROGRESS" => Ok(CreateInProgress),
            "CREATE_COMPLETE" => Ok(CreateComplete),
            "CREATE_FAILED" => Ok(CreateFailed),
            "DELETE_COMPLETE" => Ok(DeleteComplete),
            "DELETE_FAILED" => Ok(DeleteFailed),
            "DELETE_IN_PROGRESS" => Ok(DeleteInProgress),
            "DELETE_SKIPPED" => Ok(DeleteSkipped),
            "REVIEW_IN_PROGRESS" => Ok(ReviewInProgress),
            "ROLLBACK_COMPLETE" => Ok(RollbackComplete),
            "ROLLBACK_FAILED" => Ok(RollbackFailed),
            "ROLLBACK_IN_PROGRESS" => Ok(RollbackInProgress),
            "UPDATE_COMPLETE" => Ok(UpdateComplete),
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS" => Ok(UpdateCompleteCleanupInProgress),
            "UPDATE_FAILED" => Ok(UpdateFailed),
            "UPDATE_IN_PROGRESS" => Ok(UpdateInProgress),
            "UPDATE_ROLLBACK_COMPLETE" => Ok(UpdateRollbackComplete),
            "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS" => {
                Ok(UpdateRollbackCompleteCleanupInProgress)
            }
            "UPDATE_ROLLBACK_FAILED" => Ok(UpdateRollbackFailed),
            "UPDATE_ROLLBACK_IN_PROGRESS" => Ok(UpdateRollbackInProgress),
            "IMPORT_IN_PROGRESS" => Ok(ImportInProgress),
            "IMPORT_COMPLETE" => Ok(ImportComplete),
            "IMPORT_FAILED" => Ok(ImportFailed),
            "IMPORT_ROLLBACK_IN_PROGRESS" => Ok(ImportRollbackInProgress),
            "IMPORT_ROLLBACK_FAILED" => Ok(ImportRollbackFailed),
            "IMPORT_ROLLBACK_COMPLETE" => Ok(ImportRollbackComplete),
            _ => Err(UnknownStatus(value.to_string())),
        }
    }
}

impl Status {
    pub fn color_spec(&self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        if self.is_failed() {
            spec.set_fg(Some(Color::Red));
        } else if self.is_complete() {
            spec.set_fg(Some(Color::Green));
        } else {
            spec.set_fg(Some(Color::Blue));
        }
        spec
    }

    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            Self::CreateComplete
                | Self::DeleteComplete
                | Self::RollbackComplete
                | Self::UpdateComplete
                | Self::UpdateRollbackComplete
                | Self::ImportComplete
                | Self::ImportRollbackComplete
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            Self::CreateFailed
                | Self::DeleteFailed
                | Self::RollbackFailed
                | Self::UpdateFailed
                | Self::UpdateRollbackFailed
                | Self::ImportFailed
                | Self::ImportRollbackFailed
        )
    }
}
