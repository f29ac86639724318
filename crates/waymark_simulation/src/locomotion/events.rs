use bevy::prelude::*;

/// Grip нажат/отпущен (edge-triggered)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabIntent {
    Grab { controller: Entity },
    Drop { controller: Entity },
}
