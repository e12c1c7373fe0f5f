// Signature Layout Engine
//
// Method signatures are a return type followed by every argument type, each
// optionally trailed by a frame offset: "v24@0:8i16". Offsets are skipped and
// never read; sizes always come from the grammar.

use crate::error::LayoutError;
use parser::{Abi, ParseError, TypeCursor, TypeNode, TypeParser};
use std::ops::Range;
use tracing::debug;

/// Index of the first declared argument; 1 and 2 are the receiver and selector.
pub const FIRST_DECLARED_ARGUMENT: usize = 3;

/// One slot of a signature together with the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument<'a> {
    pub node: TypeNode,
    pub encoding: &'a str,
}

/// The next slot under `cursor` and the span of its text, or `None` once
/// the signature is exhausted.
fn next_slot(cursor: &mut TypeCursor<'_>) -> Result<Option<(TypeNode, Range<usize>)>, LayoutError> {
    if cursor.is_exhausted() {
        return Ok(None);
    }

    match cursor.next_type() {
        Ok(slot) => Ok(Some(slot)),
        // Only qualifiers left over
        Err(ParseError::EmptyInput) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignatureLayout {
    parser: TypeParser,
}

impl SignatureLayout {
    pub fn new(abi: Abi) -> Self {
        SignatureLayout {
            parser: TypeParser::new(abi),
        }
    }

    pub fn abi(&self) -> Abi {
        self.parser.abi()
    }

    fn receiver(&self) -> TypeNode {
        TypeNode::object(None, self.abi())
    }

    fn selector(&self) -> TypeNode {
        TypeNode::selector(self.abi())
    }

    /// Resolves slot `index`: 0 is the return type, 1 the receiver, 2 the
    /// selector, and 3 onwards the declared arguments.
    pub fn argument_at<'a>(&self, signature: &'a str, index: usize) -> Result<Argument<'a>, LayoutError> {
        debug!(signature, index, "resolving signature slot");

        let mut cursor = self.parser.cursor(signature);
        let (return_type, range) = cursor.next_type()?;
        match index {
            0 => {
                return Ok(Argument {
                    node: return_type,
                    encoding: &signature[range],
                });
            }
            1 => {
                return Ok(Argument {
                    node: self.receiver(),
                    encoding: "@",
                });
            }
            2 => {
                return Ok(Argument {
                    node: self.selector(),
                    encoding: ":",
                });
            }
            _ => {}
        }

        // Slots 1 and 2 are read from the string only to step over them
        cursor.skip_number();
        let mut slot = 1;
        loop {
            let Some((node, range)) = next_slot(&mut cursor)? else {
                return Err(LayoutError::IndexOutOfRange {
                    index,
                    available: slot.max(FIRST_DECLARED_ARGUMENT),
                });
            };

            if slot == index {
                return Ok(Argument {
                    node,
                    encoding: &signature[range],
                });
            }

            cursor.skip_number();
            slot += 1;
        }
    }

    pub fn type_at(&self, signature: &str, index: usize) -> Result<TypeNode, LayoutError> {
        Ok(self.argument_at(signature, index)?.node)
    }

    /// Storage size in bytes of slot `index`; -1 when the type cannot be
    /// sized (unknown codes). Bitfields round up to whole bytes.
    pub fn size_at(&self, signature: &str, index: usize) -> Result<i64, LayoutError> {
        Ok(self.type_at(signature, index)?.storage_size())
    }

    /// The encoding text of slot `index`, without its frame offset.
    pub fn encoding_at<'a>(&self, signature: &'a str, index: usize) -> Result<&'a str, LayoutError> {
        Ok(self.argument_at(signature, index)?.encoding)
    }

    /// Every slot of the signature.
    pub fn signature(&self, signature: &str) -> Result<Signature, LayoutError> {
        let mut cursor = self.parser.cursor(signature);
        let (return_type, _) = cursor.next_type()?;
        let mut slots = vec![return_type, self.receiver(), self.selector()];

        cursor.skip_number();
        let mut skipped = 0;
        while let Some((node, _)) = next_slot(&mut cursor)? {
            if skipped < 2 {
                skipped += 1;
            } else {
                slots.push(node);
            }
            cursor.skip_number();
        }

        debug!(signature, slots = slots.len(), "parsed signature");
        Ok(Signature { slots })
    }
}

/// A fully parsed method signature: return type, receiver, selector, then
/// the declared arguments in order. Always at least three slots long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    slots: Vec<TypeNode>,
}

impl Signature {
    /// Parses `signature` for the host data model.
    pub fn parse(signature: &str) -> Result<Signature, LayoutError> {
        SignatureLayout::default().signature(signature)
    }

    pub fn return_type(&self) -> &TypeNode {
        &self.slots[0]
    }

    pub fn receiver(&self) -> &TypeNode {
        &self.slots[1]
    }

    pub fn selector(&self) -> &TypeNode {
        &self.slots[2]
    }

    pub fn arguments(&self) -> &[TypeNode] {
        &self.slots[FIRST_DECLARED_ARGUMENT..]
    }

    pub fn get(&self, index: usize) -> Option<&TypeNode> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[TypeNode] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
