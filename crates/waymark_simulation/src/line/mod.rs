//! Line domain: линия между двумя объектами (масштабированный unit mesh)

use bevy::prelude::*;

pub mod connection;

pub use connection::{line_transform, update_line_connections, LineConnection};

/// Line Plugin
///
/// Update: update_line_connections (каждый кадр, после движения целей)
pub struct LinePlugin;

impl Plugin for LinePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<LineConnection>()
            .add_systems(Update, update_line_connections);
    }
}
