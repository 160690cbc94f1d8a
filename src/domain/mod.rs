//! Domain logic - pure version rules independent of file storage

pub mod prerelease;
pub mod version;

pub use prerelease::PreRelease;
pub use version::{Version, VersionBump};
