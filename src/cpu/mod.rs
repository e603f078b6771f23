pub(crate) mod device;
pub(crate) mod image;
pub(crate) mod program;
