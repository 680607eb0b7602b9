pub mod values;
pub mod tracks;
pub mod spline;
pub mod curve;

pub use curve::Vec3Animation;
pub use spline::KeyframeBezierSpline;
pub use tracks::{InterpolationMode, KeyframeTrack};
pub use values::Interpolatable;
