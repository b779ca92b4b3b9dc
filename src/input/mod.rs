mod lab;
mod scribbles;

pub use lab::{load_lab_planes, LabPlanes};
pub use scribbles::{load_scribble, ScribbleSpec};
