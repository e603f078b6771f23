pub(crate) mod config;
pub(crate) mod program;
pub(crate) mod registry;
