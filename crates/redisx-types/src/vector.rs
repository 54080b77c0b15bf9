//! Numeric vectors exchanged with the store.

use serde::{Deserialize, Serialize};

/// A decoded vector. All components share one representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vector {
    /// Every component was an unsigned digit string
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl Vector {
    pub fn len(&self) -> usize {
        match self {
            Vector::Int(v) => v.len(),
            Vector::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Vector::Int(_))
    }

    /// Components widened to `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Vector::Int(v) => v.iter().map(|&x| x as f64).collect(),
            Vector::Float(v) => v.clone(),
        }
    }

    /// Components narrowed to `f32`, the usual embedding element type.
    pub fn to_f32(&self) -> Vec<f32> {
        match self {
            Vector::Int(v) => v.iter().map(|&x| x as f32).collect(),
            Vector::Float(v) => v.iter().map(|&x| x as f32).collect(),
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Vector::Float(values)
    }
}

impl From<Vec<f32>> for Vector {
    fn from(values: Vec<f32>) -> Self {
        Vector::Float(values.into_iter().map(f64::from).collect())
    }
}

impl From<Vec<i64>> for Vector {
    fn from(values: Vec<i64>) -> Self {
        Vector::Int(values)
    }
}

impl From<Vec<i32>> for Vector {
    fn from(values: Vec<i32>) -> Self {
        Vector::Int(values.into_iter().map(i64::from).collect())
    }
}

/// A numeric type that can be written into a vector literal.
pub trait Component: Copy {
    /// Value used for the six-digit decimal form.
    fn to_f64(self) -> f64;

    /// `Some(0|1)` when the value is exactly zero or one.
    fn to_bit(self) -> Option<u8>;
}

macro_rules! int_component {
    ($($t:ty),*) => {
        $(
            impl Component for $t {
                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn to_bit(self) -> Option<u8> {
                    match self {
                        0 => Some(0),
                        1 => Some(1),
                        _ => None,
                    }
                }
            }
        )*
    };
}

int_component!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl Component for f64 {
    fn to_f64(self) -> f64 {
        self
    }

    fn to_bit(self) -> Option<u8> {
        if self == 0.0 {
            Some(0)
        } else if self == 1.0 {
            Some(1)
        } else {
            None
        }
    }
}

impl Component for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn to_bit(self) -> Option<u8> {
        (self as f64).to_bit()
    }
}

impl Component for bool {
    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn to_bit(self) -> Option<u8> {
        Some(self as u8)
    }
}
