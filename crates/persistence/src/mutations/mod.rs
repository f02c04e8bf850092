// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side database operations.
//!
//! All mutations use Diesel DSL against `SQLite`. Row IDs come from the
//! `last_insert_rowid()` helper in the backend module.

pub mod bookings;
pub mod invoices;
pub mod renters;
pub mod sessions;
