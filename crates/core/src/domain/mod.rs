pub mod naming;
mod phase;
mod variant;

pub use phase::Phase;
pub use variant::Variant;
