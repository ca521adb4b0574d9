//! Domain logic - pure release rules independent of git and the version tool

pub mod bump;
pub mod state;
pub mod sync;
pub mod tag;
pub mod version;

pub use bump::BumpClass;
pub use state::RepositoryState;
pub use sync::{SyncSnapshot, SyncStatus};
pub use tag::ReleasePlan;
pub use version::ReleaseVersion;
