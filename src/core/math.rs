pub mod interpolation;
pub mod matrix;
pub mod transform;
pub mod trig;
pub mod vector;
