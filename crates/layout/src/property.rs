// Property attribute strings
//
// The runtime describes a declared property as comma-separated entries,
// each a one-letter code plus an optional value:
//
//     T@"NSString",C,N,V_name
//
// The `T` value is a type encoding and may itself contain commas (C++
// template names), so its extent comes from the grammar, not from a split.

use crate::error::LayoutError;
use parser::{Abi, ParseError, TypeNode, TypeParser};
use std::fmt;
use tracing::trace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyAttributes {
    /// `T`
    pub type_encoding: String,
    /// `t`, the pre-2.0 type encoding
    pub old_type_encoding: Option<String>,
    /// `V`
    pub backing_ivar: Option<String>,
    /// `G`
    pub getter: Option<String>,
    /// `S`
    pub setter: Option<String>,
    pub readonly: bool,
    pub copy: bool,
    pub retain: bool,
    pub weak: bool,
    pub nonatomic: bool,
    pub dynamic: bool,
    pub garbage_collectable: bool,
}

impl PropertyAttributes {
    pub fn parse(attributes: &str) -> Result<PropertyAttributes, LayoutError> {
        PropertyAttributes::parse_with(attributes, TypeParser::default())
    }

    pub fn parse_with(attributes: &str, parser: TypeParser) -> Result<PropertyAttributes, LayoutError> {
        let mut result = PropertyAttributes::default();
        let mut has_type = false;
        let mut cursor = 0;

        while let Some(code) = attributes[cursor..].chars().next() {
            if code == ',' {
                cursor += 1;
                continue;
            }

            let value_start = cursor + code.len_utf8();
            let value_end = match code {
                'T' | 't' => {
                    if attributes[value_start..].is_empty() || attributes[value_start..].starts_with(',') {
                        return Err(ParseError::EmptyInput.into());
                    }
                    let (_, end) = parser.parse_at(attributes, value_start)?;
                    next_comma(attributes, end)
                }
                _ => next_comma(attributes, value_start),
            };
            let value = &attributes[value_start..value_end];

            match code {
                'T' => {
                    result.type_encoding = value.to_string();
                    has_type = true;
                }
                't' => result.old_type_encoding = Some(value.to_string()),
                'V' => result.backing_ivar = Some(value.to_string()),
                'G' => result.getter = Some(value.to_string()),
                'S' => result.setter = Some(value.to_string()),
                'R' => result.readonly = true,
                'C' => result.copy = true,
                '&' => result.retain = true,
                'W' => result.weak = true,
                'N' => result.nonatomic = true,
                'D' => result.dynamic = true,
                'P' => result.garbage_collectable = true,
                other => trace!(code = %other, value, "ignoring property attribute"),
            }

            // Step over the comma
            cursor = (value_end + 1).min(attributes.len());
        }

        if !has_type {
            return Err(LayoutError::MissingTypeAttribute);
        }
        Ok(result)
    }

    pub fn type_node(&self, abi: Abi) -> Result<TypeNode, ParseError> {
        TypeParser::new(abi).parse(&self.type_encoding)
    }

    /// Bytes the accessor reads or writes at the backing ivar, -1 if unknown.
    pub fn storage_size(&self, abi: Abi) -> Result<i64, ParseError> {
        Ok(self.type_node(abi)?.storage_size())
    }
}

fn next_comma(attributes: &str, from: usize) -> usize {
    attributes[from..]
        .find(',')
        .map_or(attributes.len(), |i| from + i)
}

// Rebuilds the attribute string in the order the runtime emits it
impl fmt::Display for PropertyAttributes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "T{}", self.type_encoding)?;
        if let Some(old) = &self.old_type_encoding {
            write!(f, ",t{}", old)?;
        }

        let flags = [
            (self.readonly, 'R'),
            (self.copy, 'C'),
            (self.retain, '&'),
            (self.weak, 'W'),
            (self.nonatomic, 'N'),
        ];
        for (_, code) in flags.iter().filter(|(set, _)| *set) {
            write!(f, ",{}", code)?;
        }

        if let Some(getter) = &self.getter {
            write!(f, ",G{}", getter)?;
        }
        if let Some(setter) = &self.setter {
            write!(f, ",S{}", setter)?;
        }
        if self.dynamic {
            write!(f, ",D")?;
        }
        if self.garbage_collectable {
            write!(f, ",P")?;
        }
        if let Some(ivar) = &self.backing_ivar {
            write!(f, ",V{}", ivar)?;
        }
        Ok(())
    }
}
