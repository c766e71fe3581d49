pub mod camera;
pub mod connectivity;
pub mod intent;

pub use camera::*;
pub use connectivity::*;
pub use intent::*;
