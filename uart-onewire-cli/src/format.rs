//! Struct-style binary layouts for decoding read results, e.g. `<hH4B`.
//!
//! A layout is an optional byte order character followed by field codes, each optionally
//! preceded by a repeat count. Fields always use their standard size and are never aligned.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pad,
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl Field {
    fn from_code(code: char) -> Option<Self> {
        use Field::*;
        Some(match code {
            'x' => Pad,
            '?' => Bool,
            'b' => I8,
            'B' => U8,
            'h' => I16,
            'H' => U16,
            'i' | 'l' => I32,
            'I' | 'L' => U32,
            'q' => I64,
            'Q' => U64,
            'f' => F32,
            'd' => F64,
            _ => return None,
        })
    }

    fn size(self) -> usize {
        use Field::*;
        match self {
            Pad | Bool | I8 | U8 => 1,
            I16 | U16 => 2,
            I32 | U32 | F32 => 4,
            I64 | U64 | F64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    UnknownCode(char),
    DanglingCount,
    CountOverflow,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCode(c) => write!(f, "unknown format code {c:?}"),
            Self::DanglingCount => write!(f, "repeat count without format code"),
            Self::CountOverflow => write!(f, "repeat count too large"),
        }
    }
}

impl std::error::Error for FormatError {}

/// A value decoded from a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// A parsed binary layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    order: ByteOrder,
    fields: Vec<Field>,
}

impl Format {
    pub fn parse(layout: &str) -> Result<Self, FormatError> {
        let mut chars = layout.chars().peekable();
        let order = match chars.next_if(|c| "<>!=@".contains(*c)) {
            Some('<') => ByteOrder::Little,
            Some('>' | '!') => ByteOrder::Big,
            _ => ByteOrder::native(),
        };
        let mut fields = Vec::new();
        let mut count: Option<usize> = None;
        for c in chars {
            if c.is_whitespace() {
                continue;
            }
            if let Some(digit) = c.to_digit(10) {
                count = Some(
                    count
                        .unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(digit as usize))
                        .ok_or(FormatError::CountOverflow)?,
                );
                continue;
            }
            let field = Field::from_code(c).ok_or(FormatError::UnknownCode(c))?;
            let repeat = count.take().unwrap_or(1);
            if repeat > u16::MAX as usize {
                return Err(FormatError::CountOverflow);
            }
            fields.extend(std::iter::repeat_n(field, repeat));
        }
        if count.is_some() {
            return Err(FormatError::DanglingCount);
        }
        Ok(Self { order, fields })
    }

    /// Number of bytes the layout covers.
    pub fn size(&self) -> usize {
        self.fields.iter().map(|f| f.size()).sum()
    }

    /// Decodes `data`, which must be exactly [`size`](Format::size) bytes long.
    pub fn unpack(&self, data: &[u8]) -> Vec<Value> {
        let mut values = Vec::new();
        let mut rest = data;
        for &field in &self.fields {
            let (raw, tail) = rest.split_at(field.size());
            rest = tail;
            let mut buf = [0u8; 8];
            // Widen into a little-endian 8 byte buffer.
            match self.order {
                ByteOrder::Little => buf[..raw.len()].copy_from_slice(raw),
                ByteOrder::Big => {
                    for (dst, src) in buf.iter_mut().zip(raw.iter().rev()) {
                        *dst = *src;
                    }
                }
            }
            let bits = u64::from_le_bytes(buf);
            let value = match field {
                Field::Pad => continue,
                Field::Bool => Value::Bool(bits != 0),
                Field::I8 => Value::Int(bits as u8 as i8 as i64),
                Field::I16 => Value::Int(bits as u16 as i16 as i64),
                Field::I32 => Value::Int(bits as u32 as i32 as i64),
                Field::I64 => Value::Int(bits as i64),
                Field::U8 | Field::U16 | Field::U32 | Field::U64 => Value::UInt(bits),
                Field::F32 => Value::Float(f32::from_bits(bits as u32) as f64),
                Field::F64 => Value::Float(f64::from_bits(bits)),
            };
            values.push(value);
        }
        values
    }
}
