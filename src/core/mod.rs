pub mod binder;
pub mod build;
pub mod page;
pub mod proxy;

pub use crate::domain::model::{Element, FetchResponse, Node, SwapOutcome, TriggerDescriptor};
pub use crate::domain::ports::{FragmentFetcher, Storage};
pub use crate::utils::error::Result;
