pub mod location;
pub mod navigator;
pub mod tabs;
