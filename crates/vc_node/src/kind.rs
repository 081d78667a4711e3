use core::fmt;

// -----------------------------------------------------------------------------
// NodeKind

/// The shape of a [`DataNode`](crate::DataNode).
///
/// Codecs are registered per `(type, kind)` pair, so this is also the second
/// half of every registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Value,
    Mapping,
    Sequence,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Value, NodeKind::Mapping, NodeKind::Sequence];

    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Value => "value",
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// NodeLocation

/// Source position attached by the parser, 1-based.
///
/// Opaque to everything in this workspace except diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeLocation {
    pub line: u32,
    pub column: u32,
}

impl NodeLocation {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for NodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
