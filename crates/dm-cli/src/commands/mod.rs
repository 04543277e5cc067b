//! CLI command implementations

pub(crate) mod run;
pub(crate) mod status;
pub(crate) mod unlock;
