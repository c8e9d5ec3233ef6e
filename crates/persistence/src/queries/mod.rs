// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event queries
//! - `reference`: Users, packing boxes, expeditions and identifier checks
//! - `shipment`: Key resolution and aggregate loading
//!
//! ## Backend-Specific Functions
//!
//! All query functions are generated in backend-specific monomorphic versions:
//! - Functions suffixed with `_sqlite` for `SQLite`
//! - Functions suffixed with `_mysql` for `MySQL`/`MariaDB`

pub mod audit;
pub mod reference;
pub mod shipment;

pub use audit::{
    get_audit_event_mysql, get_audit_event_sqlite, get_audit_timeline_mysql,
    get_audit_timeline_sqlite,
};
pub use reference::{
    existing_box_ids_mysql, existing_box_ids_sqlite, existing_user_ids_mysql,
    existing_user_ids_sqlite, list_expeditions_mysql, list_expeditions_sqlite,
    order_ginee_id_exists_mysql, order_ginee_id_exists_sqlite, tracking_number_exists_mysql,
    tracking_number_exists_sqlite,
};
pub use shipment::{
    count_orders_with_event_status_mysql, count_orders_with_event_status_sqlite,
    list_picked_orders_mysql, list_picked_orders_sqlite, load_complaint_mysql,
    load_complaint_sqlite, load_order_mysql, load_order_sqlite, load_outbound_mysql,
    load_outbound_sqlite, load_qc_mysql, load_qc_sqlite, resolve_tracking_number_mysql,
    resolve_tracking_number_sqlite,
};
