//! Asset loading

mod obj_points;

pub use obj_points::{ObjError, ObjPoints};
