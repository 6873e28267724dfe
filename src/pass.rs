//! Generation pass
//!
//! One pass builds one scene from one [`SceneGenerator`] and exports it:
//!
//! 1. a [`GenerationContext`] is created from the settings, with the random
//!    source seeded when `settings.seed` is set
//! 2. the generator composes, rigs and animates into the context
//! 3. world transforms are refreshed
//! 4. the [`Exporter`] realizes the result in the host and writes the file
//!
//! Nothing is shared between passes.

use std::path::PathBuf;

use forge_animation::action::Action;
use forge_animation::channel::Channel;
use forge_animation::library::AnimationLibrary;
use forge_animation::sampler::Sampler;
use forge_animation::synthesizer::{FrameSpan, Synthesizer};
use forge_assets::export::{ExportReport, ExportRequest, Exporter};
use forge_assets::host::HostBridge;
use forge_core::errors::Result;
use forge_core::handles::{ActionKey, NodeHandle};
use forge_core::random::{self, ForgeRng};
use forge_core::settings::GenerationSettings;
use forge_scene::assembler::{self, Part};
use forge_scene::scene::Scene;

// ============================================================================
// Context
// ============================================================================

/// Everything a generator writes into during a pass.
#[derive(Debug)]
pub struct GenerationContext {
    pub scene: Scene,
    pub animations: AnimationLibrary,
    pub rng: ForgeRng,
    pub settings: GenerationSettings,
}

impl GenerationContext {
    #[must_use]
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            scene: Scene::new(),
            animations: AnimationLibrary::new(),
            rng: random::from_seed_or_entropy(settings.seed),
            settings,
        }
    }

    /// The scene timeline as a synthesis span.
    #[must_use]
    pub fn span(&self) -> FrameSpan {
        FrameSpan::new(self.settings.frame_count(), self.settings.fps)
    }

    /// Synthesizer over [`Self::span`] with default policy and interpolation.
    #[must_use]
    pub fn synthesizer(&self) -> Synthesizer {
        Synthesizer::new(self.span())
    }

    pub fn compose(&mut self, parts: Vec<Part>) -> Result<Vec<NodeHandle>> {
        assembler::compose(&mut self.scene, parts, &mut self.rng)
    }

    /// Creates an action for `target` and fills it with one track per
    /// channel.
    pub fn animate(
        &mut self,
        name: &str,
        target: NodeHandle,
        synthesizer: &Synthesizer,
        channels: Vec<(Channel, Sampler)>,
    ) -> Result<ActionKey> {
        self.scene.require(target)?;
        let key = self.animations.create_action(name, target);
        let action = self.animations.require_mut(key)?;
        synthesizer.synthesize_composite(action, channels, &mut self.rng)?;
        Ok(key)
    }

    #[must_use]
    pub fn action(&self, key: ActionKey) -> Option<&Action> {
        self.animations.get(key)
    }

    /// Current scene roots.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeHandle> {
        self.scene.root_nodes().to_vec()
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.scene.iter_armatures().map(|(_, a)| a.bone_count()).sum()
    }
}

// ============================================================================
// Generator interface
// ============================================================================

/// A scene recipe.
pub trait SceneGenerator {
    /// Catalog name, e.g. `running_figure`.
    fn name(&self) -> &'static str;

    /// Timeline, frame rate and destination the recipe was designed for.
    fn default_settings(&self) -> GenerationSettings;

    /// Builds the scene into `ctx` and returns the roots to export.
    fn generate(&self, ctx: &mut GenerationContext) -> Result<Vec<NodeHandle>>;
}

// ============================================================================
// Driver
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub generator: &'static str,
    pub nodes: usize,
    pub bones: usize,
    pub materials: usize,
    pub actions: usize,
    pub keyframes: usize,
    pub destination: PathBuf,
    pub export: ExportReport,
}

/// Runs `generator` without exporting. Returns the populated context and
/// the generator's roots.
pub fn build_scene<G: SceneGenerator + ?Sized>(
    generator: &G,
    settings: GenerationSettings,
) -> Result<(GenerationContext, Vec<NodeHandle>)> {
    settings.validate()?;
    log::info!(
        "Generating `{}` ({} frames at {} fps)",
        generator.name(),
        settings.frame_count(),
        settings.fps
    );

    let mut ctx = GenerationContext::new(settings);
    let roots = generator.generate(&mut ctx)?;
    ctx.scene.update_matrix_world();
    Ok((ctx, roots))
}

/// Generates and exports one scene through `host`.
///
/// With `use_selection` set only the generator's roots are exported,
/// otherwise every root in the scene.
pub fn run_pass<G, H>(generator: &G, settings: GenerationSettings, host: &mut H) -> Result<PassReport>
where
    G: SceneGenerator + ?Sized,
    H: HostBridge + ?Sized,
{
    let (ctx, roots) = build_scene(generator, settings)?;

    let mut request = ExportRequest::from_settings(&ctx.settings);
    if ctx.settings.export.use_selection {
        request = request.with_roots(roots);
    }
    let export = Exporter::export(&ctx.scene, &ctx.animations, &request, host)?;

    let report = PassReport {
        generator: generator.name(),
        nodes: ctx.scene.node_count(),
        bones: ctx.bone_count(),
        materials: ctx.scene.material_count(),
        actions: ctx.animations.action_count(),
        keyframes: ctx.animations.keyframe_count(),
        destination: export.destination.clone(),
        export,
    };
    log::info!(
        "Pass `{}` done: {} nodes, {} bones, {} actions, {} keyframes -> {}",
        report.generator,
        report.nodes,
        report.bones,
        report.actions,
        report.keyframes,
        report.destination.display()
    );
    Ok(report)
}
