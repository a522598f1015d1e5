//! Interactive group state: manual merge, delete, and box sizing per page.

mod merge;
mod page;
mod store;

pub use merge::{MergeOutcome, MergeSkip};
pub use page::{MemberLayout, OverlayGroup, OverlayLine, PageOverlay, SizedLine};
pub use store::{OverlayStore, SharedPage};
