/// The default bound on grouping and pipe nesting. Each level costs several
/// parser frames, so this stays well inside a 2 MiB thread stack in debug
/// builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Settings that shape how [`crate::parse_with_options`] treats its input.
///
/// ```rust
/// use tmpltree::{ParseOptions, parse_with_options};
///
/// let options = ParseOptions::new().max_depth(8).to_owned();
/// let tree = parse_with_options("page.tmpl", "{{ (((.)))}}", &options).unwrap();
/// assert_eq!(tree.len(), 1);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParseOptions {
    max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits how deeply groupings and piped continuations may nest before
    /// parsing fails with [`crate::ParseErrorKind::NestingTooDeep`]. Each
    /// `(` and each `|` opens one level; the outermost pipeline is level 0.
    /// Raising the limit far above the default needs a larger stack.
    pub fn max_depth(&mut self, max_depth: usize) -> &mut Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn depth_limit(&self) -> usize {
        self.max_depth
    }
}
