//! Signature capture: drawing surface, raster helpers and resize observation

mod raster;
mod resize;
mod surface;

pub use raster::{data_url_bytes, has_ink_in, SignatureError};
pub use resize::{container_width, ContainerWidth};
pub use surface::{DrawingSurface, SurfaceEvent, SurfaceOptions};

#[cfg(test)]
pub use raster::Point;
