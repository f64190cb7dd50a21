// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence
//! layer. Leaf mutations use Diesel DSL through the `backend_fn!` macro;
//! the multi-step units of work the workflow requires are hand-written
//! per backend so each runs inside one Diesel transaction.
//!
//! ## Module Organization
//!
//! - `audit` — Transition event persistence
//! - `evaluation` — Evaluation content and stage mapping leaf mutations
//! - `period` — Period creation and the phase sweep
//! - `project` — Project registry mutations
//! - `revision` — Revision request and recipient leaf mutations
//! - `step_approval` — Step approval record leaf mutations
//! - `upsert` — Units of work: evaluation upsert, submission, combined
//!   submit-and-complete
//! - `workflow` — Units of work: step transitions and revision completion
//!
//! ## Atomicity
//!
//! Every unit of work in `workflow` and `upsert` executes inside
//! `conn.transaction`: the status write, revision fan-out, submission
//! reset, and audit rows commit or roll back together. Leaf mutations
//! never open transactions themselves.

pub mod audit;
pub mod evaluation;
pub mod period;
pub mod project;
pub mod revision;
pub mod step_approval;
pub mod upsert;
pub mod workflow;
