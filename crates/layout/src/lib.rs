pub mod error;
pub mod property;
pub mod signature;

pub use error::LayoutError;
pub use property::PropertyAttributes;
pub use signature::{Argument, FIRST_DECLARED_ARGUMENT, Signature, SignatureLayout};

use parser::TypeNode;

/// Type of slot `index` of a method signature, for the host data model.
pub fn type_at(signature: &str, index: usize) -> Result<TypeNode, LayoutError> {
    SignatureLayout::default().type_at(signature, index)
}

/// Storage size of slot `index`, -1 when it cannot be resolved.
pub fn size_at(signature: &str, index: usize) -> Result<i64, LayoutError> {
    SignatureLayout::default().size_at(signature, index)
}

pub fn encoding_at(signature: &str, index: usize) -> Result<&str, LayoutError> {
    SignatureLayout::default().encoding_at(signature, index)
}

#[cfg(test)]
mod tests;
