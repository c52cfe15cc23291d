use bevy::prelude::*;

/// Uses `try_despawn` because a marker can be queued for despawn by a rebuild and
/// by the pass that replaces it within the same frame
pub fn despawn(commands: &mut Commands, entity: Entity) { commands.entity(entity).try_despawn(); }
