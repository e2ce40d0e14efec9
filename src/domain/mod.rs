//! Domain logic - pure version and branch rules independent of git access

pub mod branch;
pub mod merge_message;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use branch::{BranchArchetype, BranchCatalog};
pub use merge_message::MergeMessage;
pub use prerelease::PreReleaseTag;
pub use tag::TagPattern;
pub use version::{SemanticVersion, VersionBump};
