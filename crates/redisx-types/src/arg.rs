//! Wire arguments and ordered extra options.
//!
//! Every command is sent as a name followed by an ordered list of [`Arg`]s.
//! Extra options are kept in an [`ExtraArgs`] list rather than a map so that
//! the order callers insert them in is the order they reach the store.

use std::borrow::Cow;
use std::fmt;

/// A single command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Text argument (names, option keys, enum values)
    Str(String),
    /// Integer argument (dimensions, ids, k)
    Int(i64),
    /// Floating-point argument
    Float(f64),
    /// Raw bytes (encoded vector literals)
    Bytes(Vec<u8>),
}

impl Arg {
    /// Render the argument as the bytes sent on the wire.
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Arg::Str(s) => Cow::Borrowed(s.as_bytes()),
            Arg::Int(i) => Cow::Owned(i.to_string().into_bytes()),
            Arg::Float(f) => Cow::Owned(f.to_string().into_bytes()),
            Arg::Bytes(b) => Cow::Borrowed(b.as_slice()),
        }
    }

    /// Text view of the argument, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Arg::Str(s) => Some(Cow::Borrowed(s.as_str())),
            Arg::Bytes(b) => std::str::from_utf8(b).ok().map(Cow::Borrowed),
            Arg::Int(_) | Arg::Float(_) => Some(Cow::Owned(self.to_string())),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(i) => write!(f, "{}", i),
            Arg::Float(x) => write!(f, "{}", x),
            Arg::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Str(value.clone())
    }
}

impl From<Vec<u8>> for Arg {
    fn from(value: Vec<u8>) -> Self {
        Arg::Bytes(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::Float(value as f64)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Int(value as i64)
    }
}

macro_rules! int_arg {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg::Int(value as i64)
                }
            }
        )*
    };
}

int_arg!(i8, i16, i32, i64, u8, u16, u32, usize);

impl From<u64> for Arg {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Arg::Int(v),
            Err(_) => Arg::Str(value.to_string()),
        }
    }
}

/// Ordered extra option pairs appended after a command's fixed parameters.
///
/// Names are not validated; the store decides what it accepts. Duplicate
/// names are kept and sent in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraArgs {
    pairs: Vec<(String, Arg)>,
}

impl ExtraArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a pair.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Arg>) {
        self.pairs.push((name.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arg)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten into the alternating `name, value` token stream.
    pub fn flatten(&self) -> Vec<Arg> {
        let mut out = Vec::with_capacity(self.pairs.len() * 2);
        for (name, value) in &self.pairs {
            out.push(Arg::Str(name.clone()));
            out.push(value.clone());
        }
        out
    }
}

impl<K: Into<String>, V: Into<Arg>> FromIterator<(K, V)> for ExtraArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_to_bytes() {
        assert_eq!(Arg::from("dim").to_bytes().as_ref(), b"dim");
        assert_eq!(Arg::from(128usize).to_bytes().as_ref(), b"128");
        assert_eq!(Arg::from(-3i64).to_bytes().as_ref(), b"-3");
        assert_eq!(Arg::from(0.5f64).to_bytes().as_ref(), b"0.5");
        assert_eq!(Arg::from(b"[0,1]".to_vec()).to_bytes().as_ref(), b"[0,1]");
        assert_eq!(Arg::from(u64::MAX).to_bytes().as_ref(), b"18446744073709551615");
    }

    #[test]
    fn test_extra_args_keep_insertion_order() {
        let extra = ExtraArgs::new()
            .with("zeta", "1")
            .with("alpha", 2)
            .with("zeta", "3");

        assert_eq!(extra.len(), 3);
        assert_eq!(
            extra.flatten(),
            vec![
                Arg::from("zeta"),
                Arg::from("1"),
                Arg::from("alpha"),
                Arg::Int(2),
                Arg::from("zeta"),
                Arg::from("3"),
            ]
        );
    }

    #[test]
    fn test_extra_args_from_iter() {
        let extra: ExtraArgs = vec![("ef", 64), ("seed", 7)].into_iter().collect();
        let names: Vec<&str> = extra.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["ef", "seed"]);
    }

    #[test]
    fn test_empty_extra_args_flatten_to_nothing() {
        assert!(ExtraArgs::new().flatten().is_empty());
        assert!(ExtraArgs::default().is_empty());
    }
}
