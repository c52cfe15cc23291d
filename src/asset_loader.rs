use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::settings::GlobeMode;

pub const EARTH_TEXTURE: &str = "textures/earth.jpg";
pub const MOON_TEXTURE: &str = "textures/moon.jpg";

/// Surface textures are loaded once and shared by both sphere materials
pub struct AssetLoaderPlugin;

impl Plugin for AssetLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AssetsState>() // only used to report when the textures are in
            // the globe spawns in Startup and needs its materials
            .add_systems(PreStartup, load_assets)
            .add_systems(
                Update,
                check_asset_loading.run_if(in_state(AssetsState::Loading)),
            );
    }
}

#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AssetsState {
    #[default]
    Loading,
    Loaded,
}

/// Sphere materials for both modes. They live for the whole session; toggling
/// only swaps which one the sphere points at.
#[derive(Resource, Clone, Debug)]
pub struct GlobeAssets {
    pub earth_texture: Handle<Image>,
    pub moon_texture:  Handle<Image>,
    earth_material:    Handle<StandardMaterial>,
    moon_material:     Handle<StandardMaterial>,
}

impl GlobeAssets {
    pub fn from_textures(
        earth_texture: Handle<Image>,
        moon_texture: Handle<Image>,
        materials: &mut Assets<StandardMaterial>,
    ) -> Self {
        let earth_material = materials.add(StandardMaterial {
            base_color_texture: Some(earth_texture.clone()),
            perceptual_roughness: 0.9,
            ..default()
        });
        let moon_material = materials.add(StandardMaterial {
            base_color_texture: Some(moon_texture.clone()),
            perceptual_roughness: 1.0,
            ..default()
        });
        Self {
            earth_texture,
            moon_texture,
            earth_material,
            moon_material,
        }
    }

    pub fn material_for(&self, mode: GlobeMode) -> Handle<StandardMaterial> {
        match mode {
            GlobeMode::Earth => self.earth_material.clone(),
            GlobeMode::Moon => self.moon_material.clone(),
        }
    }
}

pub fn load_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(GlobeAssets::from_textures(
        asset_server.load(EARTH_TEXTURE),
        asset_server.load(MOON_TEXTURE),
        &mut materials,
    ));
}

/// A texture that fails to load leaves its sphere untextured; the app keeps running
pub fn check_asset_loading(
    mut next_state: ResMut<NextState<AssetsState>>,
    asset_server: Res<AssetServer>,
    assets: Res<GlobeAssets>,
) {
    let states = [
        (EARTH_TEXTURE, asset_server.get_load_state(assets.earth_texture.id())),
        (MOON_TEXTURE, asset_server.get_load_state(assets.moon_texture.id())),
    ];

    let settled = states
        .iter()
        .all(|(_, state)| matches!(state, Some(LoadState::Loaded | LoadState::Failed(_))));
    if !settled {
        return;
    }

    for (path, state) in &states {
        if let Some(LoadState::Failed(error)) = state {
            warn!("globe texture {path} failed to load: {error}");
        }
    }
    info!("globe textures loaded");
    next_state.set(AssetsState::Loaded);
}
