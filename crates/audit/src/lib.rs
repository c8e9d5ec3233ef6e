// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use fulfillment_domain::TrackingNumber;
use time::OffsetDateTime;

/// Represents the staff member performing an action.
///
/// The acting user is always passed explicitly; there is no ambient
/// "current user".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The user id recorded in `*_by` fields.
    pub user_id: i64,
    /// The type of actor (e.g., "user", "ingest").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The acting user's id
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(user_id: i64, actor_type: String) -> Self {
        Self {
            user_id,
            actor_type,
        }
    }

    /// Creates an actor for an interactive user.
    #[must_use]
    pub fn user(user_id: i64) -> Self {
        Self::new(user_id, String::from("user"))
    }
}

/// Represents the reason or trigger for an action.
///
/// A cause describes why a state change was initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, batch ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`StartQc`", "`CreateOutbound`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact rendering of a shipment's statuses at one point in time.
///
/// The data is a `key=value` list, for example
/// `order=qc_progress/in_progress qc=ribbon:in_progress outbound=none`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event representing one applied command.
///
/// Every successful state change produces exactly one audit event,
/// written in the same transaction as the change itself. An event
/// captures:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - Which shipment it touched (tracking number)
/// - The statuses before and after the transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Database id, `None` until persisted.
    pub event_id: Option<i64>,
    pub tracking_number: TrackingNumber,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
    pub occurred_at: OffsetDateTime,
}

impl AuditEvent {
    /// Creates a new, not yet persisted, `AuditEvent`.
    #[must_use]
    pub const fn new(
        tracking_number: TrackingNumber,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        occurred_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: None,
            tracking_number,
            actor,
            cause,
            action,
            before,
            after,
            occurred_at,
        }
    }

    /// Returns a copy carrying the id assigned by storage.
    #[must_use]
    pub fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}
