//=========================================================================
// Container Paths
//=========================================================================
//
// Slash-separated logical addresses ("Views/", "UI/Views/Sub") and their
// resolution into host containers.
//
// Resolution walks the segments root-first, reusing existing containers
// and creating missing ones, then tags the final container as a scaffold
// root. Resolving the same path twice creates nothing the second time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::str::FromStr;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::{Result, ScaffoldError};
use crate::core::host::{ContainerHandle, ContainerSystem};

//=== ContainerPath =======================================================

/// Parsed container path with at least one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerPath {
    root: String,
    children: Vec<String>,
}

impl ContainerPath {
    /// Parses a slash-separated path, skipping empty segments.
    ///
    /// Fails with [`ScaffoldError::InvalidPath`] when no segment remains.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = raw.split('/').filter(|segment| !segment.is_empty());

        let root = segments
            .next()
            .ok_or_else(|| ScaffoldError::InvalidPath(raw.to_string()))?;

        Ok(Self {
            root: root.to_string(),
            children: segments.map(str::to_string).collect(),
        })
    }

    /// Segments in resolution order, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.root.as_str()).chain(self.children.iter().map(String::as_str))
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Name of the final segment.
    pub fn leaf(&self) -> &str {
        self.children.last().unwrap_or(&self.root)
    }

    pub fn depth(&self) -> usize {
        1 + self.children.len()
    }
}

impl FromStr for ContainerPath {
    type Err = ScaffoldError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::parse(raw)
    }
}

impl fmt::Display for ContainerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for child in &self.children {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}

//=== PathResolver ========================================================

/// Resolves container paths against the host scene graph.
pub struct PathResolver;

impl PathResolver {
    /// Resolves `path`, creating missing containers and tagging the last one.
    pub fn resolve<C>(containers: &mut C, path: &ContainerPath) -> ContainerHandle
    where
        C: ContainerSystem + ?Sized,
    {
        let mut current = Self::find_or_create(containers, None, path.root());

        for segment in path.children.iter() {
            current = Self::find_or_create(containers, Some(current), segment);
        }

        if !containers.is_tagged(current) {
            debug!("Tagging {:?} as scaffold root for `{}`", current, path);
            containers.tag(current);
        }

        current
    }

    /// Parses and resolves a raw path string.
    pub fn resolve_str<C>(containers: &mut C, raw: &str) -> Result<ContainerHandle>
    where
        C: ContainerSystem + ?Sized,
    {
        let path = ContainerPath::parse(raw)?;
        Ok(Self::resolve(containers, &path))
    }

    fn find_or_create<C>(
        containers: &mut C,
        parent: Option<ContainerHandle>,
        name: &str,
    ) -> ContainerHandle
    where
        C: ContainerSystem + ?Sized,
    {
        let existing = match parent {
            None => containers.find_top_level(name),
            Some(parent) => containers.find_child(parent, name),
        };

        existing.unwrap_or_else(|| {
            debug!("Creating container `{}` under {:?}", name, parent);
            containers.create_container(name, parent)
        })
    }
}

//=== Tests ===============================================================
