//! The tree produced by [`crate::parse`].
//!
//! Every node exclusively owns its children. Nothing is shared or back
//! referenced, so rendering and walking are plain recursive traversals.

/// Defines a transparent wrapper around a `Vec` with the usual collection
/// conveniences, so the wrapper can carry its own render and walk methods.
macro_rules! sequence_node {
    ($(#[$meta:meta])* $name:ident => $item:ty) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name(pub Vec<$item>);

        impl $name {
            pub const fn new() -> Self {
                Self(Vec::new())
            }

            pub fn into_inner(self) -> Vec<$item> {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = Vec<$item>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(items: Vec<$item>) -> Self {
                Self(items)
            }
        }

        impl FromIterator<$item> for $name {
            fn from_iter<I: IntoIterator<Item = $item>>(iter: I) -> Self {
                Self(iter.into_iter().collect())
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl<'a> IntoIterator for &'a mut $name {
            type Item = &'a mut $item;
            type IntoIter = std::slice::IterMut<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter_mut()
            }
        }
    };
}

sequence_node! {
    /// The top of the tree: literal text and actions in source order.
    Tree => Branch
}

sequence_node! {
    /// The statements of one action. The grammar produces exactly one in
    /// practice.
    Pipelines => Pipeline
}

sequence_node! {
    /// One stage of a pipeline: identifiers, literals, whitespace and
    /// comments in the order they appear.
    Variables => Variable
}

impl Tree {
    /// Iterates over the actions of this tree, skipping literal text.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.0.iter().filter_map(Branch::as_action)
    }

    /// Returns indented JSON describing this tree.
    ///
    /// This is meant for inspecting a parse and is not part of the round
    /// trip: use [`crate::Render`] to get source text back.
    #[cfg(feature = "serde")]
    pub fn format(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Either a literal run of template text or a single action.
///
/// The default branch is empty text, which renders as an empty string.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    Text(String),
    Action(Action),
}

impl Default for Branch {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Branch {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Action(_) => None,
        }
    }

    pub const fn as_action(&self) -> Option<&Action> {
        match self {
            Self::Action(action) => Some(action),
            Self::Text(_) => None,
        }
    }

    pub fn as_action_mut(&mut self) -> Option<&mut Action> {
        match self {
            Self::Action(action) => Some(action),
            Self::Text(_) => None,
        }
    }
}

/// A single `{{ ... }}` statement.
///
/// `open` and `close` keep the exact delimiter that was matched, so trim
/// markers (`{{-` and `-}}`) survive a round trip.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub open: String,
    pub pipelines: Pipelines,
    pub close: String,
}

impl Action {
    pub fn new<O: Into<String>, C: Into<String>>(open: O, pipelines: Pipelines, close: C) -> Self {
        Self {
            open: open.into(),
            pipelines,
            close: close.into(),
        }
    }

    pub fn trims_left(&self) -> bool {
        self.open.ends_with('-')
    }

    pub fn trims_right(&self) -> bool {
        self.close.starts_with('-')
    }
}

/// A chain of variable groups joined by `|`.
///
/// `root` is the first stage and `pipe` holds everything after the next `|`,
/// itself a pipeline, so `a | b | c` nests as `a -> (b -> (c))`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    #[cfg_attr(feature = "serde", serde(rename = "variables"))]
    pub root: Variables,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "piped", default, skip_serializing_if = "Option::is_none")
    )]
    pub pipe: Option<Box<Pipeline>>,
}

impl Pipeline {
    pub const fn new(root: Variables) -> Self {
        Self { root, pipe: None }
    }

    pub fn with_pipe(mut self, pipe: Self) -> Self {
        self.pipe = Some(Box::new(pipe));
        self
    }

    /// The number of stages in this chain, counting this one.
    pub fn stages(&self) -> usize {
        let mut count = 1;
        let mut next = self.pipe.as_deref();
        while let Some(pipeline) = next {
            count += 1;
            next = pipeline.pipe.as_deref();
        }
        count
    }
}

/// A parenthesized pipeline used in a variable position, e.g. the
/// `(inner pipeline)` in `{{ ident (inner pipeline) }}`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    pub open: String,
    pub group: Pipeline,
    pub close: String,
}

impl Grouping {
    pub fn new(group: Pipeline) -> Self {
        Self {
            open: "(".to_string(),
            group,
            close: ")".to_string(),
        }
    }
}

/// One element of a pipeline stage.
///
/// `String` and `Rune` hold their unescaped values and `Literal` holds the
/// raw text between its backticks.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    /// `$name :=` or `$name =`, operator included.
    Assign(String),
    /// `range $k, $v :=`, operator included.
    Range(String),
    Ident(String),
    /// Field or variable access such as `.Field`, `$var.Field`, `.` or `$`.
    Keyword(String),
    Literal(String),
    String(String),
    Rune(char),
    Float(f64),
    Int(i64),
    Space(String),
    /// A `/* ... */` comment, markers included.
    Comment(String),
    Grouping(Grouping),
}

impl Variable {
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    pub const fn is_space(&self) -> bool {
        matches!(self, Self::Space(_))
    }

    pub const fn as_grouping(&self) -> Option<&Grouping> {
        match self {
            Self::Grouping(grouping) => Some(grouping),
            Self::Assign(_)
            | Self::Range(_)
            | Self::Ident(_)
            | Self::Keyword(_)
            | Self::Literal(_)
            | Self::String(_)
            | Self::Rune(_)
            | Self::Float(_)
            | Self::Int(_)
            | Self::Space(_)
            | Self::Comment(_) => None,
        }
    }

    pub fn as_grouping_mut(&mut self) -> Option<&mut Grouping> {
        match self {
            Self::Grouping(grouping) => Some(grouping),
            Self::Assign(_)
            | Self::Range(_)
            | Self::Ident(_)
            | Self::Keyword(_)
            | Self::Literal(_)
            | Self::String(_)
            | Self::Rune(_)
            | Self::Float(_)
            | Self::Int(_)
            | Self::Space(_)
            | Self::Comment(_) => None,
        }
    }
}

impl Variables {
    /// Removes every comment from this group, returning how many were
    /// removed. Nested groupings are left alone.
    pub fn prune_comments(&mut self) -> usize {
        let before = self.0.len();
        self.0.retain(|variable| !variable.is_comment());
        before - self.0.len()
    }
}
