pub mod lighting;
pub mod objects;
pub mod passes;
pub mod renderer;
pub mod triangles;
