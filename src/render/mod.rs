pub mod frame;
pub mod rig;
pub mod synth;
