pub mod error;
pub mod consts;
pub mod image;
pub mod footprint;
pub mod mask;
pub mod filters;
pub mod illumination;
pub mod stitch;
pub mod crop;
pub mod channels;
pub mod features;
pub mod io;
pub mod batch;
