//! Composition recipes
//!
//! A [`Recipe`] is a static table of `(part, parent)` links describing one
//! kind of assembly ("the torso is the root, the head hangs off the torso").
//! Generators pair each link with a concrete [`NodeDesc`] to get the parts
//! handed to [`compose`](crate::assembler::compose).

use forge_core::errors::Result;

use crate::assembler::{NodeDesc, Part};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartLink {
    pub part: &'static str,
    pub parent: Option<&'static str>,
}

impl PartLink {
    #[must_use]
    pub const fn root(part: &'static str) -> Self {
        Self { part, parent: None }
    }

    #[must_use]
    pub const fn child(part: &'static str, parent: &'static str) -> Self {
        Self {
            part,
            parent: Some(parent),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Recipe {
    pub name: &'static str,
    pub links: &'static [PartLink],
}

impl Recipe {
    #[must_use]
    pub const fn new(name: &'static str, links: &'static [PartLink]) -> Self {
        Self { name, links }
    }

    /// Builds the parts of this recipe.
    ///
    /// `describe` is called once per link with the link's part name and
    /// returns the descriptor for it; the descriptor's name is replaced by
    /// `prefix` + part name. Parents get the same prefix, so one recipe can
    /// be instantiated several times in a scene.
    pub fn instantiate<F>(&self, prefix: &str, mut describe: F) -> Result<Vec<Part>>
    where
        F: FnMut(&'static str) -> Result<NodeDesc>,
    {
        self.links
            .iter()
            .map(|link| {
                let mut desc = describe(link.part)?;
                desc.name = format!("{prefix}{}", link.part);
                let parent = link.parent.map(|p| format!("{prefix}{p}"));
                Ok((desc, parent))
            })
            .collect()
    }

    /// Parent of `part` in this recipe.
    #[must_use]
    pub fn parent_of(&self, part: &str) -> Option<&'static str> {
        self.links
            .iter()
            .find(|l| l.part == part)
            .and_then(|l| l.parent)
    }
}
