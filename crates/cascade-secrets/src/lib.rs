//! Sealed-credential vault for Cascade.

mod vault;

pub use vault::AesTokenVault;
