// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

/// The user ids recorded at each stage of a shipment.
///
/// Every source is optional; a missing record or a missing user id simply
/// contributes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiabilitySources {
    /// `qc_by` of the QC record, whichever lane ran it.
    pub qc_by: Option<i64>,
    pub outbound_by: Option<i64>,
    pub picked_by: Option<i64>,
    pub assigned_by: Option<i64>,
}

/// The outcome of liability resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiabilityAssessment {
    /// Deduplicated responsible user ids, in ascending order.
    pub users: BTreeSet<i64>,
    pub qc_complained: bool,
    pub outbound_complained: bool,
    pub order_complained: bool,
}

fn contributes(id: Option<i64>) -> Option<i64> {
    id.filter(|v| *v != 0)
}

/// Builds the responsible-user set for a complaint.
///
/// Each non-zero id is added to the set and the record it came from is
/// flagged. The order is flagged when either the picker or the assigner
/// contributed. The result does not depend on the order the sources were
/// gathered in.
#[must_use]
pub fn assess_liability(sources: &LiabilitySources) -> LiabilityAssessment {
    let mut assessment: LiabilityAssessment = LiabilityAssessment::default();

    if let Some(id) = contributes(sources.qc_by) {
        assessment.users.insert(id);
        assessment.qc_complained = true;
    }
    if let Some(id) = contributes(sources.outbound_by) {
        assessment.users.insert(id);
        assessment.outbound_complained = true;
    }
    for id in [sources.picked_by, sources.assigned_by]
        .into_iter()
        .filter_map(contributes)
    {
        assessment.users.insert(id);
        assessment.order_complained = true;
    }

    assessment
}
