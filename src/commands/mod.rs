mod extract;
mod sync;

pub use extract::run_extract;
pub use sync::run_sync;
