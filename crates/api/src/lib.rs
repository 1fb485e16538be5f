#![forbid(unsafe_code)]

mod router;

pub use router::{create_router, serve};
