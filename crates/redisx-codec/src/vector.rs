//! Text vector literal encoding.
//!
//! Format: `[c1,c2,...,cn]`, ASCII only.
//! - non-binary components: fixed-point with six fractional digits (`1.000000`)
//! - binary components: a single `0` or `1`
//!
//! Decoding picks the numeric kind from the tokens: when every token is made
//! of ASCII digits only the result is integral, otherwise every token is parsed
//! as a float. A leading sign is not a digit, so `-3` decodes as `-3.0`; the
//! store relies on this exact rule.

use redisx_types::{Component, Vector};

use crate::error::CodecError;

const OPEN: u8 = b'[';
const CLOSE: u8 = b']';
const SEPARATOR: u8 = b',';

/// Encoder/decoder for the store's text vector literal.
pub struct TextVectorCodec;

impl TextVectorCodec {
    /// Encode components into a vector literal.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::UnsupportedComponentValue` when `is_binary` is set
    /// and a component is not exactly 0 or 1, or when a component is not finite.
    pub fn encode<C: Component>(components: &[C], is_binary: bool) -> Result<Vec<u8>, CodecError> {
        let per_component = if is_binary { 2 } else { 12 };
        let mut out = Vec::with_capacity(2 + components.len() * per_component);
        out.push(OPEN);

        for (index, component) in components.iter().enumerate() {
            if index > 0 {
                out.push(SEPARATOR);
            }
            if is_binary {
                let bit = component.to_bit().ok_or_else(|| {
                    CodecError::UnsupportedComponentValue {
                        index,
                        value: component.to_f64().to_string(),
                    }
                })?;
                out.push(b'0' + bit);
            } else {
                let value = component.to_f64();
                if !value.is_finite() {
                    return Err(CodecError::UnsupportedComponentValue {
                        index,
                        value: value.to_string(),
                    });
                }
                out.extend_from_slice(format!("{:.6}", value).as_bytes());
            }
        }

        out.push(CLOSE);
        Ok(out)
    }

    /// Encode an already decoded vector.
    pub fn encode_vector(vector: &Vector, is_binary: bool) -> Result<Vec<u8>, CodecError> {
        match vector {
            Vector::Int(values) => Self::encode(values, is_binary),
            Vector::Float(values) => Self::encode(values, is_binary),
        }
    }

    /// Decode a vector literal.
    ///
    /// # Errors
    ///
    /// - `CodecError::MalformedVector` if the literal does not start with `[`
    ///   and end with `]`
    /// - `CodecError::InvalidComponent` if a token is empty or not a number
    pub fn decode(buf: &[u8]) -> Result<Vector, CodecError> {
        if buf.len() < 2 || buf[0] != OPEN || buf[buf.len() - 1] != CLOSE {
            return Err(CodecError::MalformedVector(preview(buf)));
        }

        let tokens: Vec<&[u8]> = buf[1..buf.len() - 1].split(|b| *b == SEPARATOR).collect();
        Self::decode_components(&tokens)
    }

    /// Decode components that arrive as separate tokens, e.g. an array reply
    /// of `"1", "0.5", ...`. Same numeric-kind rule as [`decode`](Self::decode).
    ///
    /// # Errors
    ///
    /// `CodecError::InvalidComponent` if there are no tokens, or a token is
    /// empty or not a number.
    pub fn decode_components<T: AsRef<[u8]>>(tokens: &[T]) -> Result<Vector, CodecError> {
        if tokens.is_empty() {
            return Err(CodecError::InvalidComponent(String::new()));
        }
        let is_int = tokens
            .iter()
            .map(|t| t.as_ref())
            .all(|t| !t.is_empty() && t.iter().all(u8::is_ascii_digit));

        if is_int {
            tokens
                .iter()
                .map(|t| parse_token::<i64>(t.as_ref(), false))
                .collect::<Result<Vec<_>, _>>()
                .map(Vector::Int)
        } else {
            tokens
                .iter()
                .map(|t| parse_token::<f64>(t.as_ref(), true))
                .collect::<Result<Vec<_>, _>>()
                .map(Vector::Float)
        }
    }
}

/// Encode components into a vector literal. See [`TextVectorCodec::encode`].
pub fn encode<C: Component>(components: &[C], is_binary: bool) -> Result<Vec<u8>, CodecError> {
    TextVectorCodec::encode(components, is_binary)
}

/// Decode a vector literal. See [`TextVectorCodec::decode`].
pub fn decode(buf: &[u8]) -> Result<Vector, CodecError> {
    TextVectorCodec::decode(buf)
}

fn parse_token<T: std::str::FromStr>(token: &[u8], trim: bool) -> Result<T, CodecError> {
    let text = std::str::from_utf8(token)
        .map_err(|_| CodecError::InvalidComponent(String::from_utf8_lossy(token).into_owned()))?;
    let text = if trim { text.trim() } else { text };
    text.parse()
        .map_err(|_| CodecError::InvalidComponent(text.to_string()))
}

fn preview(buf: &[u8]) -> String {
    const MAX: usize = 32;
    if buf.len() > MAX {
        format!("{}...", String::from_utf8_lossy(&buf[..MAX]))
    } else {
        String::from_utf8_lossy(buf).into_owned()
    }
}
