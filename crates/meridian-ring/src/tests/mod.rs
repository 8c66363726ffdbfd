//! Tests for the meridian-ring crate.

mod helpers;

mod collision;
