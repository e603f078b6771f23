pub(crate) mod backend;
pub(crate) mod recorder;
pub(crate) mod resolve;
pub(crate) mod sequencer;
