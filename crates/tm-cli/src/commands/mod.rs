//! CLI command implementations

pub(crate) mod common;
pub(crate) mod create;
pub(crate) mod rollback;
pub(crate) mod run;
pub(crate) mod status;
