pub mod lang;
pub mod note;
pub mod output;
pub mod queue;
pub mod synth;
pub mod wave;
