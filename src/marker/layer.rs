use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use image::RgbaImage;

use crate::conditions::Condition;
use crate::despawn::despawn;
use crate::geo::Location;
use crate::label;
use crate::settings::GlobeMode;

/// Asset stores a marker's GPU resources live in
#[derive(SystemParam)]
pub struct MarkerStores<'w> {
    pub meshes:    ResMut<'w, Assets<Mesh>>,
    pub materials: ResMut<'w, Assets<StandardMaterial>>,
    pub images:    ResMut<'w, Assets<Image>>,
}

/// The three scene nodes of one location plus the per-marker assets they own.
/// Shared meshes and materials are not listed here and outlive every marker.
#[derive(Debug)]
pub struct MarkerNode {
    pub key:            &'static str,
    pub mode:           GlobeMode,
    pub pin:            Entity,
    pub connector:      Entity,
    pub label:          Entity,
    pub connector_mesh: Handle<Mesh>,
    pub label_image:    Handle<Image>,
    pub label_material: Handle<StandardMaterial>,
}

impl MarkerNode {
    pub const fn entities(&self) -> [Entity; 3] { [self.pin, self.connector, self.label] }

    fn dispose(self, commands: &mut Commands, stores: &mut MarkerStores) {
        for entity in self.entities() {
            despawn(commands, entity);
        }
        stores.meshes.remove(&self.connector_mesh);
        stores.images.remove(&self.label_image);
        stores.materials.remove(&self.label_material);
    }
}

/// Everything a worker thread produced for one location
#[derive(Debug, Clone)]
pub struct ResolvedLabel {
    pub location:    Location,
    pub condition:   Condition,
    pub raster:      RgbaImage,
    pub unit_suffix: &'static str,
}

impl ResolvedLabel {
    /// The no-data card, for a lookup that never reported back
    pub fn no_data(location: Location) -> Self {
        Self {
            location,
            condition: Condition::fallback(),
            raster: label::render_no_data(location.name),
            unit_suffix: "",
        }
    }
}

/// Results of one build pass, gathered slot by slot in table order
#[derive(Debug)]
pub struct BuildPass {
    generation: u64,
    mode:       GlobeMode,
    slots:      Vec<Option<ResolvedLabel>>,
}

impl BuildPass {
    fn new(generation: u64, mode: GlobeMode, count: usize) -> Self {
        Self {
            generation,
            mode,
            slots: vec![None; count],
        }
    }

    pub const fn generation(&self) -> u64 { self.generation }

    pub const fn mode(&self) -> GlobeMode { self.mode }

    pub fn is_complete(&self) -> bool { self.slots.iter().all(Option::is_some) }

    pub fn remaining(&self) -> usize { self.slots.iter().filter(|slot| slot.is_none()).count() }

    /// Resolved labels in table order. Only meaningful once complete.
    pub fn into_results(self) -> Vec<ResolvedLabel> { self.slots.into_iter().flatten().collect() }
}

/// Owns the marker subtree: which nodes exist, which build pass is in flight and
/// the generation counter that lets late results from an abandoned pass be ignored.
#[derive(Resource, Debug, Default)]
pub struct MarkerLayer {
    generation: u64,
    group:      Option<Entity>,
    markers:    Vec<MarkerNode>,
    pass:       Option<BuildPass>,
}

impl MarkerLayer {
    pub const fn generation(&self) -> u64 { self.generation }

    pub const fn group(&self) -> Option<Entity> { self.group }

    pub const fn set_group(&mut self, group: Entity) { self.group = Some(group); }

    pub fn markers(&self) -> &[MarkerNode] { &self.markers }

    pub const fn pending_pass(&self) -> Option<&BuildPass> { self.pass.as_ref() }

    /// Number of scene nodes currently owned
    pub fn node_count(&self) -> usize { self.markers.len() * 3 }

    /// Starts a new pass for `mode`, abandoning any pass still in flight
    pub fn begin_pass(&mut self, mode: GlobeMode) -> u64 {
        self.generation += 1;
        self.pass = Some(BuildPass::new(self.generation, mode, mode.locations().len()));
        self.generation
    }

    /// Stores a result if it belongs to the current pass. Returns `false` for
    /// results from an older generation, which the caller drops.
    pub fn accept(&mut self, generation: u64, slot: usize, resolved: ResolvedLabel) -> bool {
        match self.pass.as_mut() {
            Some(pass) if pass.generation == generation => match pass.slots.get_mut(slot) {
                Some(entry) => {
                    *entry = Some(resolved);
                    true
                },
                None => false,
            },
            _ => false,
        }
    }

    /// Hands over the current pass once every slot has resolved
    pub fn take_completed(&mut self) -> Option<BuildPass> {
        if self.pass.as_ref().is_some_and(BuildPass::is_complete) {
            self.pass.take()
        } else {
            None
        }
    }

    /// Detaches and releases every marker
    pub fn clear(&mut self, commands: &mut Commands, stores: &mut MarkerStores) {
        for marker in self.markers.drain(..) {
            marker.dispose(commands, stores);
        }
    }

    /// Disposes whatever is present, then takes ownership of `markers`. Both
    /// happen in the same command flush so no frame sees old and new together.
    pub fn replace(&mut self, commands: &mut Commands, stores: &mut MarkerStores, markers: Vec<MarkerNode>) {
        self.clear(commands, stores);
        self.markers = markers;
    }
}
