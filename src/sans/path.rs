//! Diagnostic location of a value within the traversal.
//!
//! A path never influences the layout; it only names where an error occurred.

use core::fmt;

use alloc::vec::Vec;

/// One step of a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    /// A named struct field.
    Field(&'static str),
    /// A position within a sequence, tuple or map.
    Index(usize),
}

/// The fields and positions traversed from the root value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path(Vec<Segment>);

impl Path {
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }
}

impl fmt::Display for Path {
    /// Renders as `outer.items[2].name`, or `<root>` for the empty path.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<root>");
        }

        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display() {
        let mut path = Path::root();
        assert_eq!(path.to_string(), "<root>");

        path.push(Segment::Field("items"));
        path.push(Segment::Index(2));
        path.push(Segment::Field("name"));
        assert_eq!(path.to_string(), "items[2].name");

        path.pop();
        path.pop();
        path.pop();
        path.push(Segment::Index(0));
        assert_eq!(path.to_string(), "[0]");
    }
}
