//! Level assembly.
//!
//! Every section of a container is decoded independently (in parallel with
//! the `parallel` feature) and the results are merged into a [`Level`].
//! Placements are then resolved against their model tables, so instances
//! hold plain indices into the level's own mesh collections.

use std::fmt;
use std::hash::BuildHasherDefault;

use glam::{Quat, Vec3};
use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;

use crate::{
    AnimationClip, EngineFile, GameType, Light, LightConfig, Mesh, Placement, Result,
    TerrainChunk, Texture, UiElement,
};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Placed object categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Category {
    Tie,
    Shrub,
    Moby,
}

impl Category {
    /// Export order.
    pub const ALL: [Category; 3] = [Category::Tie, Category::Shrub, Category::Moby];

    pub const fn name(&self) -> &'static str {
        match self {
            Category::Tie => "tie",
            Category::Shrub => "shrub",
            Category::Moby => "moby",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A placed reference to one of the level's meshes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlacementInstance {
    /// Index into the category's model list.
    pub model: usize,
    pub group: u32,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

/// A fully decoded level.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Level {
    pub game: Option<GameType>,

    pub tie_models: Vec<Mesh>,
    pub shrub_models: Vec<Mesh>,
    pub moby_models: Vec<Mesh>,
    pub gadget_models: Vec<Mesh>,
    pub skybox: Option<Mesh>,

    pub ties: Vec<PlacementInstance>,
    pub shrubs: Vec<PlacementInstance>,
    pub mobies: Vec<PlacementInstance>,

    pub terrain: Vec<TerrainChunk>,
    pub textures: Vec<Texture>,
    pub texture_config_menu: Vec<i32>,
    pub player_animations: Vec<AnimationClip>,
    pub lights: Vec<Light>,
    pub light_config: Option<LightConfig>,
    pub ui_elements: Vec<UiElement>,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub render_defaults: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub collision: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub billboards: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub sound_config: Vec<u8>,
}

#[cfg(feature = "parallel")]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}

/// Resolve placements against a model table by mesh id. Placements naming
/// an unknown model are dropped.
fn resolve(category: Category, models: &[Mesh], placements: Vec<Placement>) -> Vec<PlacementInstance> {
    let mut by_id = FxHashMap::default();
    for (index, mesh) in models.iter().enumerate() {
        by_id.entry(mesh.id).or_insert(index);
    }

    let total = placements.len();
    let instances: Vec<_> = placements
        .into_iter()
        .filter_map(|p| match by_id.get(&p.model_id) {
            Some(&model) => Some(PlacementInstance {
                model,
                group: p.group,
                position: p.position,
                rotation: p.rotation,
                scale: p.scale,
            }),
            None => {
                tracing::debug!(%category, model_id = p.model_id, "placement references unknown model");
                None
            }
        })
        .collect();

    if instances.len() < total {
        tracing::warn!(
            %category,
            skipped = total - instances.len(),
            total,
            "skipped placements with unresolved models"
        );
    }
    instances
}

impl Level {
    /// An empty level of the given game type.
    pub fn new(game: GameType) -> Self {
        Self {
            game: Some(game),
            ..Default::default()
        }
    }

    /// Decode every section of `file`.
    ///
    /// Any failing section aborts the whole load; no partial level is
    /// returned.
    pub fn load(file: &EngineFile) -> Result<Self> {
        let ((models, placements), (world, blobs)) = join(
            || {
                join(
                    || {
                        let (ties, shrubs) = join(|| file.tie_models(), || file.shrub_models());
                        let (mobies, (gadgets, skybox)) =
                            join(|| file.moby_models(), || join(|| file.gadget_models(), || file.skybox()));
                        (ties, shrubs, mobies, gadgets, skybox)
                    },
                    || (file.ties(), file.shrubs(), file.mobies()),
                )
            },
            || {
                join(
                    || {
                        let (terrain, animations) = join(|| file.terrain(), || file.player_animations());
                        (
                            terrain,
                            animations,
                            file.textures(),
                            file.texture_config_menu(),
                            file.lights(),
                            file.light_config(),
                            file.ui_elements(),
                        )
                    },
                    || {
                        (
                            file.render_defaults().map(<[u8]>::to_vec),
                            file.collision().map(<[u8]>::to_vec),
                            file.billboards().map(<[u8]>::to_vec),
                            file.sound_config().map(<[u8]>::to_vec),
                        )
                    },
                )
            },
        );

        let (tie_models, shrub_models, moby_models, gadget_models, skybox) = models;
        let (tie_models, shrub_models, moby_models) = (tie_models?, shrub_models?, moby_models?);
        let (ties, shrubs, mobies) = placements;
        let (terrain, player_animations, textures, texture_config_menu, lights, light_config, ui_elements) =
            world;
        let (render_defaults, collision, billboards, sound_config) = blobs;

        let level = Self {
            game: Some(file.game()),
            ties: resolve(Category::Tie, &tie_models, ties?),
            shrubs: resolve(Category::Shrub, &shrub_models, shrubs?),
            mobies: resolve(Category::Moby, &moby_models, mobies?),
            tie_models,
            shrub_models,
            moby_models,
            gadget_models: gadget_models?,
            skybox: skybox?,
            terrain: terrain?,
            textures: textures?,
            texture_config_menu: texture_config_menu?,
            player_animations: player_animations?,
            lights: lights?,
            light_config: light_config?,
            ui_elements: ui_elements?,
            render_defaults: render_defaults?,
            collision: collision?,
            billboards: billboards?,
            sound_config: sound_config?,
        };

        tracing::debug!(
            game = %file.game(),
            ties = level.ties.len(),
            shrubs = level.shrubs.len(),
            mobies = level.mobies.len(),
            textures = level.textures.len(),
            "loaded level"
        );
        Ok(level)
    }

    /// Model list of a category.
    pub fn models(&self, category: Category) -> &[Mesh] {
        match category {
            Category::Tie => &self.tie_models,
            Category::Shrub => &self.shrub_models,
            Category::Moby => &self.moby_models,
        }
    }

    /// Placements of a category.
    pub fn instances(&self, category: Category) -> &[PlacementInstance] {
        match category {
            Category::Tie => &self.ties,
            Category::Shrub => &self.shrubs,
            Category::Moby => &self.mobies,
        }
    }

    /// The mesh an instance places.
    pub fn instance_mesh(&self, category: Category, instance: &PlacementInstance) -> Option<&Mesh> {
        self.models(category).get(instance.model)
    }

    /// Find a model by mesh id.
    pub fn model(&self, category: Category, id: u32) -> Option<&Mesh> {
        self.models(category).iter().find(|m| m.id == id)
    }

    /// Clips to export with a mesh: the player's for moby 0, otherwise the
    /// mesh's own.
    pub fn clips_for<'a>(&'a self, category: Category, mesh: &'a Mesh) -> &'a [AnimationClip] {
        if category == Category::Moby && mesh.id == 0 {
            &self.player_animations
        } else {
            &mesh.animations
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ContainerBuilder, MeshSpec};
    use crate::{Error, Section};

    fn sample_container() -> Vec<u8> {
        let mut builder = ContainerBuilder::new(GameType::Rc1);
        let tie_a = builder.push_mesh(&MeshSpec::with_vertices(10, 3));
        let tie_b = builder.push_mesh(&MeshSpec::with_vertices(11, 4));
        let moby = builder.push_mesh(&MeshSpec::with_vertices(0, 3));

        let tie_models = builder.push_u32(tie_a);
        builder.push_u32(tie_b);
        let moby_models = builder.push_u32(1);
        builder.push_u32(0x2A);
        builder.push_u32(moby);

        let ties = builder.push_instance(11, [1.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0], [1.0; 3]);
        builder.push_instance(99, [0.0; 3], [0.0, 0.0, 0.0, 1.0], [1.0; 3]);
        builder.push_instance(10, [0.0; 3], [0.0, 0.0, 0.0, 1.0], [1.0; 3]);
        let mobies = builder.push_instance(0x2A, [0.0, 5.0, 0.0], [0.0, 0.0, 0.0, 1.0], [2.0; 3]);

        let clip = builder.push_clip(1.0, &[(vec![[0, 0, 0, 32767]], vec![])]);
        let animations = builder.push_u32(1);
        builder.push_u32(clip);

        builder.set_section(Section::TieModels, tie_models, 2);
        builder.set_section(Section::MobyModels, moby_models, 0);
        builder.set_section(Section::Ties, ties, 3);
        builder.set_section(Section::Mobies, mobies, 1);
        builder.set_section(Section::PlayerAnimations, animations, 0);
        builder.finish()
    }

    #[test]
    fn test_load_resolves_instances() {
        let file = EngineFile::from_bytes(sample_container()).unwrap();
        let level = Level::load(&file).unwrap();

        assert_eq!(level.game, Some(GameType::Rc1));
        assert_eq!(level.tie_models.len(), 2);
        assert_eq!(level.ties.len(), 2);
        assert_eq!(level.ties[0].model, 1);
        assert_eq!(level.ties[1].model, 0);
        assert_eq!(level.instance_mesh(Category::Tie, &level.ties[0]).map(|m| m.id), Some(11));

        assert_eq!(level.mobies.len(), 1);
        assert_eq!(level.models(Category::Moby)[0].id, 0x2A);
        assert_eq!(level.mobies[0].scale, Vec3::splat(2.0));
        assert!(level.shrubs.is_empty());
        assert_eq!(level.player_animations.len(), 1);
    }

    #[test]
    fn test_player_clips_for_moby_zero() {
        let mut level = Level::new(GameType::Rc2);
        level.player_animations = vec![AnimationClip::default(); 2];
        let mut mesh = Mesh::default();
        assert_eq!(level.clips_for(Category::Moby, &mesh).len(), 2);

        mesh.id = 3;
        mesh.animations = vec![AnimationClip::default()];
        assert_eq!(level.clips_for(Category::Moby, &mesh).len(), 1);
    }

    #[test]
    fn test_other_categories_keep_own_clips() {
        let mut level = Level::new(GameType::Rc1);
        level.player_animations = vec![AnimationClip::default()];
        let tie = Mesh::default();

        assert!(level.clips_for(Category::Tie, &tie).is_empty());
        assert!(level.clips_for(Category::Shrub, &tie).is_empty());
    }

    #[test]
    fn test_invalid_blob_aborts_load() {
        let mut builder = ContainerBuilder::new(GameType::Rc3);
        builder.set_section(Section::Billboards, 0x300, 0);
        builder.set_section(Section::SoundConfig, 0x200, 0);
        let file = EngineFile::from_bytes(builder.finish()).unwrap();

        assert!(matches!(
            Level::load(&file),
            Err(Error::InvalidSectionLength { section: Section::Billboards, .. })
        ));
    }
}
