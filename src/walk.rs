//! Depth-first traversal over every [`Variables`] group of a tree.
//!
//! Within a pipeline the root group is visited first, then the groups of
//! any grouping found in it (recursively), then the piped continuation. When
//! the visitor returns `true` the walk stops at once and every enclosing
//! call returns `true` as well.

use crate::ast::{Action, Branch, Grouping, Pipeline, Pipelines, Tree, Variables};

/// Nodes whose variable groups can be walked.
///
/// ```rust
/// use tmpltree::{Variable, WalkVariables, parse};
///
/// let tree = parse("walk.tmpl", "{{ one (two) }}{{ three }}").unwrap();
/// let mut idents = Vec::new();
/// let stopped = tree.walk_variables(|variables| {
///     for variable in variables.iter() {
///         if let Variable::Ident(name) = variable {
///             idents.push(name.clone());
///         }
///     }
///     false
/// });
/// assert!(!stopped);
/// assert_eq!(idents, ["one", "two", "three"]);
/// ```
pub trait WalkVariables {
    /// Calls `visitor` for each group until it returns `true`. Returns
    /// whether the walk was stopped.
    fn walk_variables_with(&self, visitor: &mut dyn FnMut(&Variables) -> bool) -> bool;

    /// Like [`WalkVariables::walk_variables_with`], handing out mutable
    /// groups. Changes made by the visitor are seen by the rest of the walk.
    fn walk_variables_mut_with(
        &mut self,
        visitor: &mut dyn FnMut(&mut Variables) -> bool,
    ) -> bool;

    fn walk_variables<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&Variables) -> bool,
        Self: Sized,
    {
        self.walk_variables_with(&mut visitor)
    }

    fn walk_variables_mut<F>(&mut self, mut visitor: F) -> bool
    where
        F: FnMut(&mut Variables) -> bool,
        Self: Sized,
    {
        self.walk_variables_mut_with(&mut visitor)
    }
}

/// Walks every variable group of `tree`, returning whether `visitor`
/// stopped the walk early.
pub fn walk_variables<F>(tree: &Tree, visitor: F) -> bool
where
    F: FnMut(&Variables) -> bool,
{
    tree.walk_variables(visitor)
}

impl WalkVariables for Tree {
    fn walk_variables_with(&self, visitor: &mut dyn FnMut(&Variables) -> bool) -> bool {
        self.iter()
            .any(|branch| branch.walk_variables_with(visitor))
    }

    fn walk_variables_mut_with(
        &mut self,
        visitor: &mut dyn FnMut(&mut Variables) -> bool,
    ) -> bool {
        self.iter_mut()
            .any(|branch| branch.walk_variables_mut_with(visitor))
    }
}

impl WalkVariables for Branch {
    fn walk_variables_with(&self, visitor: &mut dyn FnMut(&Variables) -> bool) -> bool {
        match self {
            Self::Text(_) => false,
            Self::Action(action) => action.walk_variables_with(visitor),
        }
    }

    fn walk_variables_mut_with(
        &mut self,
        visitor: &mut dyn FnMut(&mut Variables) -> bool,
    ) -> bool {
        match self {
            Self::Text(_) => false,
            Self::Action(action) => action.walk_variables_mut_with(visitor),
        }
    }
}

impl WalkVariables for Action {
    fn walk_variables_with(&self, visitor: &mut dyn FnMut(&Variables) -> bool) -> bool {
        self.pipelines.walk_variables_with(visitor)
    }

    fn walk_variables_mut_with(
        &mut self,
        visitor: &mut dyn FnMut(&mut Variables) -> bool,
    ) -> bool {
        self.pipelines.walk_variables_mut_with(visitor)
    }
}

impl WalkVariables for Pipelines {
    fn walk_variables_with(&self, visitor: &mut dyn FnMut(&Variables) -> bool) -> bool {
        self.iter()
            .any(|pipeline| pipeline.walk_variables_with(visitor))
    }

    fn walk_variables_mut_with(
        &mut self,
        visitor: &mut dyn FnMut(&mut Variables) -> bool,
    ) -> bool {
        self.iter_mut()
            .any(|pipeline| pipeline.walk_variables_mut_with(visitor))
    }
}

impl WalkVariables for Pipeline {
    fn walk_variables_with(&self, visitor: &mut dyn FnMut(&Variables) -> bool) -> bool {
        if self.root.walk_variables_with(visitor) {
            return true;
        }
        self.pipe
            .as_deref()
            .is_some_and(|pipe| pipe.walk_variables_with(visitor))
    }

    fn walk_variables_mut_with(
        &mut self,
        visitor: &mut dyn FnMut(&mut Variables) -> bool,
    ) -> bool {
        if self.root.walk_variables_mut_with(visitor) {
            return true;
        }
        self.pipe
            .as_deref_mut()
            .is_some_and(|pipe| pipe.walk_variables_mut_with(visitor))
    }
}

impl WalkVariables for Variables {
    fn walk_variables_with(&self, visitor: &mut dyn FnMut(&Variables) -> bool) -> bool {
        if visitor(self) {
            return true;
        }
        self.iter()
            .filter_map(|variable| variable.as_grouping())
            .any(|grouping| grouping.walk_variables_with(visitor))
    }

    fn walk_variables_mut_with(
        &mut self,
        visitor: &mut dyn FnMut(&mut Variables) -> bool,
    ) -> bool {
        if visitor(self) {
            return true;
        }
        self.iter_mut()
            .filter_map(|variable| variable.as_grouping_mut())
            .any(|grouping| grouping.walk_variables_mut_with(visitor))
    }
}

impl WalkVariables for Grouping {
    fn walk_variables_with(&self, visitor: &mut dyn FnMut(&Variables) -> bool) -> bool {
        self.group.walk_variables_with(visitor)
    }

    fn walk_variables_mut_with(
        &mut self,
        visitor: &mut dyn FnMut(&mut Variables) -> bool,
    ) -> bool {
        self.group.walk_variables_mut_with(visitor)
    }
}
