//! Doctor availability lifecycle.
//!
//! ```text
//!  active --request_leave--> leave_requested --approve--> on_leave
//!    ^                           |                           |
//!    +----------reject-----------+                    request_return
//!    |                                                       v
//!    +--------approve------- return_requested <--------------+
//!                                   |
//!               on_leave <--reject--+
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{
    DOCTOR_STATUS_ACTIVE, DOCTOR_STATUS_LEAVE_REQUESTED, DOCTOR_STATUS_ON_LEAVE,
    DOCTOR_STATUS_RETURN_REQUESTED,
};
use crate::errors::{AppError, AppResult};

/// Availability state of a doctor. Non-doctor users are always `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DoctorStatus {
    Active,
    LeaveRequested,
    OnLeave,
    ReturnRequested,
}

/// Something that can happen to a doctor's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    RequestLeave,
    RequestReturn,
    Approve,
    Reject,
}

impl LifecycleEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleEvent::RequestLeave => "request_leave",
            LifecycleEvent::RequestReturn => "request_return",
            LifecycleEvent::Approve => "approve",
            LifecycleEvent::Reject => "reject",
        }
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DoctorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DoctorStatus::Active => DOCTOR_STATUS_ACTIVE,
            DoctorStatus::LeaveRequested => DOCTOR_STATUS_LEAVE_REQUESTED,
            DoctorStatus::OnLeave => DOCTOR_STATUS_ON_LEAVE,
            DoctorStatus::ReturnRequested => DOCTOR_STATUS_RETURN_REQUESTED,
        }
    }

    /// Apply `event`, returning the next state.
    ///
    /// # Errors
    /// `InvalidTransition` for any pair not in the lifecycle table.
    pub fn transition(self, event: LifecycleEvent) -> AppResult<DoctorStatus> {
        use DoctorStatus::*;
        use LifecycleEvent::*;

        match (self, event) {
            (Active, RequestLeave) => Ok(LeaveRequested),
            (LeaveRequested, Approve) => Ok(OnLeave),
            (LeaveRequested, Reject) => Ok(Active),
            (OnLeave, RequestReturn) => Ok(ReturnRequested),
            (ReturnRequested, Approve) => Ok(Active),
            (ReturnRequested, Reject) => Ok(OnLeave),
            (from, event) => Err(AppError::invalid_transition(from, event)),
        }
    }

    /// Whether patients may book this doctor. A pending leave request
    /// already closes the calendar.
    pub fn is_bookable(self) -> bool {
        self == DoctorStatus::Active
    }

    /// Resolve the admin event that moves `self` to `target`.
    ///
    /// Used when an admin names the desired state rather than the decision.
    pub fn review_event_for(self, target: DoctorStatus) -> AppResult<LifecycleEvent> {
        [LifecycleEvent::Approve, LifecycleEvent::Reject]
            .into_iter()
            .find(|event| self.transition(*event).ok() == Some(target))
            .ok_or_else(|| AppError::invalid_transition(self, format!("set status to {}", target)))
    }
}

impl std::fmt::Display for DoctorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DoctorStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DOCTOR_STATUS_ACTIVE => Ok(DoctorStatus::Active),
            DOCTOR_STATUS_LEAVE_REQUESTED => Ok(DoctorStatus::LeaveRequested),
            DOCTOR_STATUS_ON_LEAVE => Ok(DoctorStatus::OnLeave),
            DOCTOR_STATUS_RETURN_REQUESTED => Ok(DoctorStatus::ReturnRequested),
            other => Err(AppError::validation(format!("Unknown doctor status: {}", other))),
        }
    }
}
