//! This module contains the value types carried by IR nodes.
use std::fmt;

use indexmap::IndexMap;

/// Single-word value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int128,
    Uint256,
    Decimal,
    Bool,
    Address,
    Bytes32,
}

impl BaseType {
    pub fn as_text(self) -> &'static str {
        match self {
            Self::Int128 => "int128",
            Self::Uint256 => "uint256",
            Self::Decimal => "decimal",
            Self::Bool => "bool",
            Self::Address => "address",
            Self::Bytes32 => "bytes32",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Value type of an IR node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Base(BaseType),
    /// Dynamically sized byte array bounded by `max_len` bytes.
    Bytes {
        max_len: usize,
    },
    String {
        max_len: usize,
    },
    List {
        elem: Box<Type>,
        len: usize,
    },
    Tuple(Vec<Type>),
    Struct(StructData),
}

impl Type {
    pub fn int128() -> Self {
        Self::Base(BaseType::Int128)
    }

    pub fn uint256() -> Self {
        Self::Base(BaseType::Uint256)
    }

    pub fn bool() -> Self {
        Self::Base(BaseType::Bool)
    }

    pub fn bytes(max_len: usize) -> Self {
        Self::Bytes { max_len }
    }

    pub fn list(elem: Type, len: usize) -> Self {
        Self::List {
            elem: Box::new(elem),
            len,
        }
    }

    /// Returns `true` if values of this type are laid out in memory behind a
    /// length word.
    pub fn is_byte_array(&self) -> bool {
        matches!(self, Self::Bytes { .. } | Self::String { .. })
    }
}

impl From<BaseType> for Type {
    fn from(base: BaseType) -> Self {
        Self::Base(base)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(base) => write!(f, "{base}"),
            Self::Bytes { max_len } => write!(f, "bytes[{max_len}]"),
            Self::String { max_len } => write!(f, "string[{max_len}]"),
            Self::List { elem, len } => write!(f, "{elem}[{len}]"),
            Self::Tuple(elems) => {
                write!(f, "(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, ")")
            }
            Self::Struct(s) => write!(f, "struct {}", s.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructData {
    pub name: String,
    pub members: IndexMap<String, Type>,
}

impl StructData {
    pub fn new(name: &str, members: impl IntoIterator<Item = (String, Type)>) -> Self {
        Self {
            name: name.to_string(),
            members: members.into_iter().collect(),
        }
    }
}
