// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Mutations use Diesel DSL and are backend-agnostic, with `last_insert_rowid()`
//! style helpers reached through the `PersistenceBackend` trait.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event persistence
//! - `order`: Orders, order details, the picking log and shipment renames
//! - `qc`: QC records and box details
//! - `outbound`: Outbound records
//! - `complaint`: Complaints with liability and product rows
//! - `reference`: Users, packing boxes and expeditions
//!
//! None of these open a transaction. Callers run them inside the
//! transaction opened by `Persistence::execute`.

pub mod audit;
pub mod complaint;
pub mod order;
pub mod outbound;
pub mod qc;
pub mod reference;

pub use audit::{persist_audit_event_mysql, persist_audit_event_sqlite};
pub use complaint::{insert_complaint_mysql, insert_complaint_sqlite};
pub use order::{
    append_picked_order_mysql, append_picked_order_sqlite, insert_order_mysql,
    insert_order_sqlite, rename_shipment_mysql, rename_shipment_sqlite, update_order_details_mysql,
    update_order_details_sqlite, update_order_mysql, update_order_sqlite,
};
pub use outbound::{
    insert_outbound_mysql, insert_outbound_sqlite, update_outbound_mysql, update_outbound_sqlite,
};
pub use qc::{
    insert_qc_boxes_mysql, insert_qc_boxes_sqlite, insert_qc_mysql, insert_qc_sqlite,
    update_qc_mysql, update_qc_sqlite,
};
pub use reference::{
    insert_expedition_mysql, insert_expedition_sqlite, insert_packing_box_mysql,
    insert_packing_box_sqlite, insert_user_mysql, insert_user_sqlite,
};
