//! Convenient re-exports for common usage.
//!
//! ```
//! use convergent::prelude::*;
//! ```

pub use crate::Diff;
pub use crate::Dumpable;
pub use crate::List;
pub use crate::OrSet;
pub use crate::PositionalTag;
pub use crate::Register;
pub use crate::SiteId;
pub use crate::Tag;
pub use crate::Text;
pub use crate::View;
pub use crate::ViewOptions;
