//! Command implementations.

mod decode;
mod inclinations;
mod info;
mod output;
mod validate;

pub use inclinations::run_inclinations;
pub use info::run_info;
pub use validate::run_validate;
