//! CLI command implementations

pub mod check;
pub mod fetch;
pub mod resolve;
pub mod show;
pub mod unpack;

pub use check::execute as check;
pub use fetch::execute as fetch;
pub use resolve::execute as resolve;
pub use show::execute as show;
pub use unpack::execute as unpack;
