pub mod envelope;
pub mod paging;

pub use envelope::{Envelope, ResultInfo};
pub use paging::{Paging, PagingParams, PagingPolicy};
