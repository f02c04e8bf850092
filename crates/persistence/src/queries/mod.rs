// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side database operations.
//!
//! All queries use Diesel DSL against `SQLite` and return the plain
//! data carriers from `data_models`, or domain `Booking`s where the
//! scheduling core is the consumer.

pub mod bookings;
pub mod invoices;
pub mod renters;
