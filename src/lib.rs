pub mod bridge;
pub mod guest;
pub mod host;
pub mod interp;
