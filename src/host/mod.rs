pub(crate) mod camera;
pub(crate) mod graph;
pub(crate) mod hd;
pub(crate) mod renderer;
pub(crate) mod volume;
