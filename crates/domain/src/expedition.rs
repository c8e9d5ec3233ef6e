// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Carrier, Expedition, TrackingNumber};

/// Carrier fields supplied by the caller for manual-carrier shipments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierOverride {
    pub expedition: Option<String>,
    pub slug: Option<String>,
    pub color: Option<String>,
}

impl CarrierOverride {
    fn complete(&self) -> Option<Carrier> {
        let pick = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };
        Some(Carrier {
            expedition: pick(&self.expedition)?,
            slug: pick(&self.slug)?,
            color: pick(&self.color)?,
        })
    }
}

/// Resolves the carrier for a tracking number.
///
/// Manual-carrier tracking numbers (see `TrackingNumber::is_manual_carrier`)
/// use the override verbatim and skip prefix matching entirely. All other
/// tracking numbers are matched against the configured expeditions: the
/// longest code that is a prefix of the tracking number wins, and ties on
/// length go to the lowest expedition id. Any override supplied for a
/// non-manual tracking number is ignored.
///
/// # Errors
///
/// Returns `MissingCarrierOverride` if a manual-carrier tracking number
/// lacks any of the three carrier fields, or `NoExpeditionFound` if no
/// configured prefix matches.
pub fn resolve_carrier(
    tracking_number: &TrackingNumber,
    expeditions: &[Expedition],
    manual: Option<&CarrierOverride>,
) -> Result<Carrier, DomainError> {
    if tracking_number.is_manual_carrier() {
        return manual
            .and_then(CarrierOverride::complete)
            .ok_or_else(|| DomainError::MissingCarrierOverride {
                tracking_number: tracking_number.value().to_string(),
            });
    }

    let value: &str = tracking_number.value();
    let best: Option<&Expedition> = expeditions
        .iter()
        .filter(|e| !e.code.is_empty() && value.starts_with(e.code.to_uppercase().as_str()))
        .min_by(|a, b| {
            b.code
                .len()
                .cmp(&a.code.len())
                .then(a.expedition_id.cmp(&b.expedition_id))
        });

    best.map(|e| Carrier {
        expedition: e.name.clone(),
        slug: e.slug.clone(),
        color: e.color.clone(),
    })
    .ok_or_else(|| DomainError::NoExpeditionFound(value.to_string()))
}
