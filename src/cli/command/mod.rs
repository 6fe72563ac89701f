pub mod filter;
pub mod gaps;
pub mod update;

pub use filter::filter;
pub use gaps::gaps;
pub use update::update;
