// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Status enums and transition rules.
//!
//! An order carries two orthogonal statuses: the processing status that
//! follows the shipment through picking, QC and outbound, and the event
//! status that marks cancellation or duplication. QC records carry their
//! own per-lane status.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where an order is in the fulfillment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// Created, waiting for a picker
    ReadyToPick,
    /// A picker is assigned and working
    PickingProgress,
    /// Picking was abandoned; the order waits for a fresh assignment
    PickingPending,
    /// All items picked
    PickingCompleted,
    /// A QC lane is checking the shipment
    QcProgress,
    /// QC passed and boxes are recorded
    QcCompleted,
    /// Handed to the carrier
    OutboundCompleted,
}

impl ProcessingStatus {
    /// All processing statuses in pipeline order.
    pub const ALL: [Self; 7] = [
        Self::ReadyToPick,
        Self::PickingProgress,
        Self::PickingPending,
        Self::PickingCompleted,
        Self::QcProgress,
        Self::QcCompleted,
        Self::OutboundCompleted,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReadyToPick => "ready_to_pick",
            Self::PickingProgress => "picking_progress",
            Self::PickingPending => "picking_pending",
            Self::PickingCompleted => "picking_completed",
            Self::QcProgress => "qc_progress",
            Self::QcCompleted => "qc_completed",
            Self::OutboundCompleted => "outbound_completed",
        }
    }

    /// Returns true while a worker is actively handling the order.
    ///
    /// In-flight orders cannot be canceled or duplicated.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::PickingProgress | Self::QcProgress)
    }

    /// Checks whether the pipeline permits moving to `target`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::ReadyToPick | Self::PickingPending, Self::PickingProgress)
                | (
                    Self::PickingProgress,
                    Self::PickingPending | Self::PickingCompleted
                )
                | (Self::PickingCompleted, Self::QcProgress)
                | (Self::QcProgress, Self::QcCompleted)
                | (Self::QcCompleted, Self::OutboundCompleted)
        )
    }

    /// Validates a pipeline move for the named operation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the move is not permitted.
    pub fn validate_transition(
        &self,
        target: Self,
        operation: &'static str,
    ) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            return Ok(());
        }
        Err(DomainError::InvalidTransition {
            operation,
            from: self.as_str().to_string(),
            reason: format!("order must not move to '{}' from here", target.as_str()),
        })
    }
}

impl FromStr for ProcessingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidStatus {
                family: "processing",
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Orthogonal flag marking canceled and duplicated orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    InProgress,
    Canceled,
    Duplicated,
}

impl EventStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Canceled => "canceled",
            Self::Duplicated => "duplicated",
        }
    }
}

impl FromStr for EventStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "canceled" => Ok(Self::Canceled),
            "duplicated" => Ok(Self::Duplicated),
            _ => Err(DomainError::InvalidStatus {
                family: "event",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validates that a picker may be assigned.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless the order is ready to pick
/// (or pending re-assignment) and not canceled.
pub fn validate_picker_assignment(
    processing: ProcessingStatus,
    event: EventStatus,
) -> Result<(), DomainError> {
    if event == EventStatus::Canceled {
        return Err(DomainError::InvalidTransition {
            operation: "assign picker",
            from: processing.as_str().to_string(),
            reason: String::from("order is canceled"),
        });
    }
    processing.validate_transition(ProcessingStatus::PickingProgress, "assign picker")
}

/// Validates that an order may be canceled.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if the order is in flight or
/// already canceled.
pub fn validate_cancel(processing: ProcessingStatus, event: EventStatus) -> Result<(), DomainError> {
    if processing.is_in_flight() {
        return Err(DomainError::InvalidTransition {
            operation: "cancel order",
            from: processing.as_str().to_string(),
            reason: String::from("order is being worked on"),
        });
    }
    if event == EventStatus::Canceled {
        return Err(DomainError::InvalidTransition {
            operation: "cancel order",
            from: event.as_str().to_string(),
            reason: String::from("order is already canceled"),
        });
    }
    Ok(())
}

/// Validates that an order may be duplicated.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if the order is in flight,
/// canceled or already duplicated.
pub fn validate_duplicate(
    processing: ProcessingStatus,
    event: EventStatus,
) -> Result<(), DomainError> {
    if processing.is_in_flight() {
        return Err(DomainError::InvalidTransition {
            operation: "duplicate order",
            from: processing.as_str().to_string(),
            reason: String::from("order is being worked on"),
        });
    }
    match event {
        EventStatus::InProgress => Ok(()),
        EventStatus::Canceled | EventStatus::Duplicated => Err(DomainError::InvalidTransition {
            operation: "duplicate order",
            from: event.as_str().to_string(),
            reason: format!("order is already {}", event.as_str()),
        }),
    }
}

/// The two mutually exclusive QC lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QcLane {
    Ribbon,
    Online,
}

impl QcLane {
    /// Returns the string representation of the lane.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ribbon => "ribbon",
            Self::Online => "online",
        }
    }
}

impl FromStr for QcLane {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ribbon" => Ok(Self::Ribbon),
            "online" => Ok(Self::Online),
            _ => Err(DomainError::InvalidStatus {
                family: "lane",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for QcLane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-lane QC status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QcStatus {
    InProgress,
    Pending,
    Completed,
}

impl QcStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Returns true if products may still be scanned against the order.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::InProgress | Self::Pending)
    }

    /// Checks whether the lane permits moving to `target`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::InProgress, Self::Pending | Self::Completed)
                | (Self::Pending, Self::InProgress | Self::Completed)
        )
    }

    /// Validates a lane move for the named operation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the move is not permitted.
    pub fn validate_transition(
        &self,
        target: Self,
        operation: &'static str,
    ) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            return Ok(());
        }
        Err(DomainError::InvalidTransition {
            operation,
            from: self.as_str().to_string(),
            reason: format!("QC must not move to '{}' from here", target.as_str()),
        })
    }
}

impl FromStr for QcStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidStatus {
                family: "qc",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for QcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
