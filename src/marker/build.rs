use std::path::Path;
use std::thread;

use bevy::asset::RenderAssetUsages;
use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;
use crossbeam::channel;
use crossbeam::channel::Receiver;
use crossbeam::channel::TryRecvError;

use super::Billboard;
use super::MarkerAssets;
use super::MarkerConnector;
use super::MarkerLabel;
use super::MarkerPin;
use super::MarkerReading;
use super::MarkersBuilt;
use super::RebuildMarkers;
use super::layer::BuildPass;
use super::layer::MarkerLayer;
use super::layer::MarkerNode;
use super::layer::MarkerStores;
use super::layer::ResolvedLabel;
use crate::conditions;
use crate::conditions::ConditionProvider;
use crate::conditions::ConditionProviders;
use crate::config::GlobeConfig;
use crate::despawn::despawn;
use crate::geo::Location;
use crate::label;
use crate::label::LabelReading;
use crate::settings::GlobeMode;

/// One location's lookup. Each runs on its own worker thread: a lookup may
/// block for the whole request timeout and must not hold up Bevy's task pools,
/// which also serve asset loading.
#[derive(Component)]
pub struct LabelTask {
    generation: u64,
    slot:       usize,
    location:   Location,
    result:     Receiver<ResolvedLabel>,
}

/// Clears the current markers and starts one worker per location of the
/// requested mode. Several requests in one frame collapse into the last.
pub fn start_build_pass(
    mut commands: Commands,
    mut requests: MessageReader<RebuildMarkers>,
    mut layer: ResMut<MarkerLayer>,
    mut stores: MarkerStores,
    providers: Res<ConditionProviders>,
    config: Res<GlobeConfig>,
) {
    let Some(request) = requests.read().last().copied() else {
        return;
    };
    let mode = request.mode;

    let replaced = layer.markers().len();
    layer.clear(&mut commands, &mut stores);
    let generation = layer.begin_pass(mode);
    let provider = providers.for_mode(mode);
    let icon_dir = config.icon_dir();

    debug!(
        "marker pass {generation} for {mode}: {} locations, cleared {replaced} markers",
        mode.locations().len()
    );

    for (slot, location) in mode.locations().iter().copied().enumerate() {
        let provider = provider.clone();
        let icon_dir = icon_dir.clone();
        let (sender, result) = channel::bounded(1);
        let worker = thread::Builder::new()
            .name(format!("label-{}", location.key))
            .spawn(move || {
                // fails only once the task entity is gone
                let _ = sender.send(resolve_label(provider.as_ref(), location, &icon_dir));
            });

        if let Err(error) = worker {
            warn!("could not start the lookup for {}: {error}", location.key);
            layer.accept(generation, slot, ResolvedLabel::no_data(location));
            continue;
        }
        commands.spawn((
            Name::new(format!("Label Task {}", location.key)),
            LabelTask {
                generation,
                slot,
                location,
                result,
            },
        ));
    }
}

/// Fetch, icon decode and rasterization for one location. Never fails: a
/// missing condition becomes the no-data card and a missing icon a blank region.
pub fn resolve_label(provider: &dyn ConditionProvider, location: Location, icon_dir: &Path) -> ResolvedLabel {
    let condition = conditions::resolve(provider, &location);
    let raster = if condition.has_data() {
        let icon = label::load_icon(&icon_dir.join(condition.category.icon_file()));
        label::render_label(
            location.name,
            Some(LabelReading {
                condition: &condition,
                icon:      icon.as_ref(),
            }),
        )
    } else {
        label::render_no_data(location.name)
    };

    ResolvedLabel {
        location,
        condition,
        raster,
        unit_suffix: provider.unit_suffix(),
    }
}

/// A worker that dies without reporting counts as no data, so the pass still completes
pub fn poll_label_tasks(mut commands: Commands, tasks: Query<(Entity, &LabelTask)>, mut layer: ResMut<MarkerLayer>) {
    for (entity, label_task) in &tasks {
        let resolved = match label_task.result.try_recv() {
            Ok(resolved) => resolved,
            Err(TryRecvError::Empty) => continue,
            Err(TryRecvError::Disconnected) => {
                warn!("lookup for {} ended without a result", label_task.location.key);
                ResolvedLabel::no_data(label_task.location)
            },
        };
        despawn(&mut commands, entity);

        let key = resolved.location.key;
        if layer.accept(label_task.generation, label_task.slot, resolved) {
            let remaining = layer.pending_pass().map_or(0, BuildPass::remaining);
            debug!("label for {key} ready, {remaining} left in pass {}", label_task.generation);
        } else {
            debug!(
                "discarding label for {key} from pass {}, current pass is {}",
                label_task.generation,
                layer.generation()
            );
        }
    }
}

/// Once every slot of the current pass is in, builds pin, connector and label
/// for each location and swaps them into the layer in one step
pub fn finish_build_pass(
    mut commands: Commands,
    mut layer: ResMut<MarkerLayer>,
    mut stores: MarkerStores,
    marker_assets: Res<MarkerAssets>,
    config: Res<GlobeConfig>,
    mut built: MessageWriter<MarkersBuilt>,
) {
    let Some(group) = layer.group() else {
        return;
    };
    let Some(pass) = layer.take_completed() else {
        return;
    };
    let generation = pass.generation();
    let mode = pass.mode();

    let mut nodes = Vec::new();
    let mut readings = Vec::new();
    for resolved in pass.into_results() {
        readings.push(MarkerReading {
            name:     resolved.location.name,
            value:    resolved.condition.format_value(resolved.unit_suffix),
            category: resolved
                .condition
                .has_data()
                .then(|| resolved.condition.description().to_string()),
        });
        nodes.push(spawn_marker(
            &mut commands,
            &mut stores,
            &marker_assets,
            &config,
            group,
            mode,
            resolved,
        ));
    }

    layer.replace(&mut commands, &mut stores, nodes);
    info!(
        "{mode} markers ready: {} nodes for {} locations (pass {generation})",
        layer.node_count(),
        layer.markers().len()
    );
    built.write(MarkersBuilt {
        mode,
        generation,
        readings,
    });
}

fn spawn_marker(
    commands: &mut Commands,
    stores: &mut MarkerStores,
    marker_assets: &MarkerAssets,
    config: &GlobeConfig,
    group: Entity,
    mode: GlobeMode,
    resolved: ResolvedLabel,
) -> MarkerNode {
    let key = resolved.location.key;
    let surface = resolved.location.surface_point(config.globe_radius);
    let far_end = surface * config.connector_scale;

    let pin = commands
        .spawn((
            Name::new(format!("Pin {key}")),
            MarkerPin,
            Mesh3d(marker_assets.pin_mesh.clone()),
            MeshMaterial3d(marker_assets.pin_material.clone()),
            Transform::from_translation(surface),
            ChildOf(group),
        ))
        .id();

    let connector_mesh = stores.meshes.add(connector_mesh(surface, far_end));
    let connector = commands
        .spawn((
            Name::new(format!("Connector {key}")),
            MarkerConnector,
            Mesh3d(connector_mesh.clone()),
            MeshMaterial3d(marker_assets.connector_material.clone()),
            Transform::default(),
            ChildOf(group),
        ))
        .id();

    let label_image = stores.images.add(label::to_texture(resolved.raster));
    let label_material = stores.materials.add(StandardMaterial {
        base_color_texture: Some(label_image.clone()),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        cull_mode: None,
        double_sided: true,
        ..default()
    });
    let label = commands
        .spawn((
            Name::new(format!("Label {key}")),
            MarkerLabel { key, mode },
            Billboard,
            Mesh3d(marker_assets.label_mesh.clone()),
            MeshMaterial3d(label_material.clone()),
            Transform::from_translation(far_end),
            ChildOf(group),
        ))
        .id();

    MarkerNode {
        key,
        mode,
        pin,
        connector,
        label,
        connector_mesh,
        label_image,
        label_material,
    }
}

/// A single segment from the pin outward along the surface normal
pub fn connector_mesh(start: Vec3, end: Vec3) -> Mesh {
    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, vec![start.to_array(), end.to_array()])
}
