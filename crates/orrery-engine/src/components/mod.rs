pub mod entity;
pub mod label;
pub mod mesh;
