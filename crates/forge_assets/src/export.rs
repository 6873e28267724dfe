use std::path::PathBuf;

use forge_animation::library::AnimationLibrary;
use forge_core::errors::{ForgeError, Result};
use forge_core::handles::NodeHandle;
use forge_core::settings::{ExportOptions, GenerationSettings};
use forge_scene::scene::Scene;

use crate::host::{HostBridge, HostHandle};
use crate::realize::{Timeline, realize};

/// What to export and how.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Roots to export. Empty means every root of the scene.
    pub roots: Vec<NodeHandle>,
    pub destination: PathBuf,
    pub options: ExportOptions,
    pub timeline: Timeline,
}

impl ExportRequest {
    /// All scene roots, with destination, options and timeline from `settings`.
    #[must_use]
    pub fn from_settings(settings: &GenerationSettings) -> Self {
        Self {
            roots: Vec::new(),
            destination: settings.output.clone(),
            options: settings.export.clone(),
            timeline: Timeline::from(settings),
        }
    }

    #[must_use]
    pub fn with_roots(mut self, roots: Vec<NodeHandle>) -> Self {
        self.roots = roots;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub destination: PathBuf,
    pub roots: Vec<HostHandle>,
    pub nodes: usize,
    pub materials: usize,
    pub actions: usize,
    pub keyframes: usize,
}

/// Export Adapter
///
/// Selects roots, realizes them into the host and invokes the host's
/// interchange writer. It does no geometry or animation work of its own,
/// and host failures are returned as reported, without retry.
pub struct Exporter;

impl Exporter {
    pub fn export<H: HostBridge + ?Sized>(
        scene: &Scene,
        animations: &AnimationLibrary,
        request: &ExportRequest,
        host: &mut H,
    ) -> Result<ExportReport> {
        request.options.validate()?;
        let roots = Self::select_roots(scene, &request.roots)?;

        log::info!(
            "Exporting {} root(s) to {}",
            roots.len(),
            request.destination.display()
        );

        let realized = realize(scene, animations, &roots, request.timeline, host)?;
        let host_roots: Vec<HostHandle> = roots.iter().filter_map(|&r| realized.node(r)).collect();

        host.export_to_interchange_format(&host_roots, &request.destination, &request.options)
            .inspect_err(|e| log::error!("Export failed: {e}"))?;

        Ok(ExportReport {
            destination: request.destination.clone(),
            roots: host_roots,
            nodes: realized.nodes.len(),
            materials: realized.materials.len(),
            actions: realized.actions,
            keyframes: realized.keyframes,
        })
    }

    /// Explicit roots are checked to exist, to be distinct and to not sit
    /// under another requested root.
    pub fn select_roots(scene: &Scene, requested: &[NodeHandle]) -> Result<Vec<NodeHandle>> {
        if requested.is_empty() {
            if scene.root_nodes().is_empty() {
                return Err(ForgeError::InvalidParameter("scene has nothing to export".into()));
            }
            return Ok(scene.root_nodes().to_vec());
        }

        for (i, &root) in requested.iter().enumerate() {
            let node = scene.require(root)?;
            for &other in &requested[..i] {
                if other == root || scene.is_ancestor(other, root) || scene.is_ancestor(root, other) {
                    return Err(ForgeError::InvalidParameter(format!(
                        "export root `{}` overlaps another requested root",
                        node.name()
                    )));
                }
            }
        }
        Ok(requested.to_vec())
    }
}
