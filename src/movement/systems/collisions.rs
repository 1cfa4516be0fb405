//! Movement domain: routes physics contacts into surface messages.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::movement::{ContactPhase, MovementState, Player, Surface, SurfaceContactEvent};

/// Resolve which side of a contact pair is the player and which is the surface.
fn player_surface_pair(
    a: Entity,
    b: Entity,
    players: &Query<&mut MovementState, With<Player>>,
    surfaces: &Query<&Surface>,
) -> Option<(Entity, Entity)> {
    if players.contains(a) && surfaces.contains(b) {
        Some((a, b))
    } else if players.contains(b) && surfaces.contains(a) {
        Some((b, a))
    } else {
        None
    }
}

pub(crate) fn route_surface_contacts(
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    mut players: Query<&mut MovementState, With<Player>>,
    surfaces: Query<&Surface>,
    mut contacts: MessageWriter<SurfaceContactEvent>,
) {
    for event in started.read() {
        let Some((player, surface)) =
            player_surface_pair(event.collider1, event.collider2, &players, &surfaces)
        else {
            continue;
        };
        let Ok(Surface(kind)) = surfaces.get(surface).copied() else {
            continue;
        };

        if kind.is_standable() {
            if let Ok(mut state) = players.get_mut(player) {
                state.ground_contacts.insert(surface);
            }
        }

        debug!("Movement: contact began with {:?} {:?}", kind, surface);
        contacts.write(SurfaceContactEvent {
            surface,
            kind,
            phase: ContactPhase::Began,
        });
    }

    for event in ended.read() {
        // A despawned surface can no longer be resolved; forget it anyway.
        for mut state in &mut players {
            state.ground_contacts.remove(&event.collider1);
            state.ground_contacts.remove(&event.collider2);
        }

        let Some((_, surface)) =
            player_surface_pair(event.collider1, event.collider2, &players, &surfaces)
        else {
            continue;
        };
        let Ok(Surface(kind)) = surfaces.get(surface).copied() else {
            continue;
        };

        debug!("Movement: contact ended with {:?} {:?}", kind, surface);
        contacts.write(SurfaceContactEvent {
            surface,
            kind,
            phase: ContactPhase::Ended,
        });
    }
}

/// Drop contacts with surfaces that were despawned without an end event.
pub(crate) fn prune_lost_contacts(
    mut players: Query<&mut MovementState, With<Player>>,
    surfaces: Query<(), With<Surface>>,
) {
    for mut state in &mut players {
        if state.ground_contacts.iter().any(|e| !surfaces.contains(*e)) {
            state.ground_contacts.retain(|e| surfaces.contains(*e));
        }
    }
}
