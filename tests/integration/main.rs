//! End-to-end tests of the admin core wired through `AdminContext`

mod common;
mod filters;
mod reservations;
mod units;
