pub mod sphere;
pub mod plane;
pub mod box_shape;

pub use box_shape::create_box;
pub use sphere::{Sphere, MAX_SPHERE_LEVEL};
pub use plane::{create_plane, PlaneOptions};
