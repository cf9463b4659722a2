pub mod money;
pub mod events;

pub use money::Money;
