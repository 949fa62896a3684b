pub mod config;
pub mod press;
pub mod publication_status;
pub mod storage;
pub mod visibility;

pub use press::{PressContent, PressContentError, PressType};
pub use publication_status::PublicationStatus;
pub use visibility::{Identity, Requester, VisibilityFilter};
