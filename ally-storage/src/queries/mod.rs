//! Free functions over a borrowed `Connection`, one module per table.

pub mod dismissals;
pub mod seen;
