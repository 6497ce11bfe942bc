#![allow(dead_code)]

use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Simple {
    pub x: u8,
    pub y: u16,
    pub z: u8,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Inner {
    pub value: u8,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    pub before: u32,
    pub inner: Inner,
    pub after: u64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Generic<T> {
    pub value: T,
    pub additional: u8,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct VariablePrefix {
    pub prefix: Vec<u8>,
    pub value: u8,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableSuffix {
    pub value: u8,
    pub suffix: Vec<u8>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Recursive {
    pub value: u8,
    pub recursive: Option<Box<Recursive>>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Meters(pub u32);

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Dot,
    Line(u8),
    Rect { w: u8, h: u8 },
}

/// A C-like enumeration travelling as its discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Level {
    Low = 1,
    High = 2,
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level as u8
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, String> {
        match v {
            1 => Ok(Level::Low),
            2 => Ok(Level::High),
            _ => Err(format!("unknown level {v}")),
        }
    }
}

/// Serializes the even bytes only, so the element count is not known up
/// front.
#[derive(Debug, PartialEq)]
pub struct Evens(pub Vec<u8>);

impl Serialize for Evens {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().filter(|v| *v % 2 == 0))
    }
}
