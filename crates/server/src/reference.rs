// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Startup loading of reference data.
//!
//! Users, packing boxes and expeditions are owned by an external
//! reference store. This file format lets a deployment or a local run
//! populate them once at startup.

use serde::Deserialize;
use std::path::Path;

use fulfillment_persistence::{Persistence, PersistenceError};

/// A carrier entry in the reference file.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpeditionEntry {
    /// Tracking number prefix.
    pub code: String,
    pub name: String,
    pub slug: String,
    pub color: String,
}

/// The reference file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub boxes: Vec<String>,
    #[serde(default)]
    pub expeditions: Vec<ExpeditionEntry>,
}

/// How many rows of each kind were inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadedCounts {
    pub users: usize,
    pub boxes: usize,
    pub expeditions: usize,
}

/// Errors raised while loading reference data.
#[derive(Debug)]
pub enum ReferenceError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Persistence(PersistenceError),
}

impl std::fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to read reference data: {e}"),
            Self::Parse(e) => write!(f, "Invalid reference data: {e}"),
            Self::Persistence(e) => write!(f, "Failed to store reference data: {e}"),
        }
    }
}

impl std::error::Error for ReferenceError {}

impl From<PersistenceError> for ReferenceError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

/// Inserts every entry of parsed reference data.
///
/// Expeditions whose code is already configured are left untouched, so a
/// file-backed database can be restarted with the same file.
///
/// # Errors
///
/// Returns an error if an insert fails.
pub fn apply_reference_data(
    persistence: &mut Persistence,
    data: &ReferenceData,
) -> Result<LoadedCounts, ReferenceError> {
    let mut counts: LoadedCounts = LoadedCounts::default();

    for name in &data.users {
        persistence.insert_user(name)?;
        counts.users += 1;
    }
    for name in &data.boxes {
        persistence.insert_packing_box(name)?;
        counts.boxes += 1;
    }

    let configured: Vec<String> = persistence
        .list_expeditions()?
        .into_iter()
        .map(|e| e.code)
        .collect();
    for entry in &data.expeditions {
        if configured.contains(&entry.code) {
            continue;
        }
        persistence.insert_expedition(&entry.code, &entry.name, &entry.slug, &entry.color)?;
        counts.expeditions += 1;
    }

    Ok(counts)
}

/// Reads a reference data file and inserts its entries.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or an insert fails.
pub fn load_reference_data(
    persistence: &mut Persistence,
    path: &Path,
) -> Result<LoadedCounts, ReferenceError> {
    let raw: String = std::fs::read_to_string(path).map_err(ReferenceError::Io)?;
    let data: ReferenceData = serde_json::from_str(&raw).map_err(ReferenceError::Parse)?;
    apply_reference_data(persistence, &data)
}
