pub(crate) mod hdrp;
pub(crate) mod legacy;
pub(crate) mod showcase;
pub(crate) mod urp;
