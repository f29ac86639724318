//! Tests for smooth locomotion (pure math + headless App).

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::ecs::event::Events;
    use bevy::prelude::*;
    use bevy::time::TimeUpdateStrategy;

    use crate::create_headless_app;
    use crate::locomotion::{
        move_offset, snap_turn_angle, ControlSource, ControlType, GamepadState, GrabIntent, Handedness,
        InputSource, LocomotionPlugin, SmoothLocomotion, XrInputSources,
    };

    const EPS: f32 = 1e-4;

    fn thumbstick(x: f32, y: f32, grip: bool) -> GamepadState {
        GamepadState {
            axes: vec![0.0, 0.0, x, y],
            buttons: vec![false, grip],
        }
    }

    fn set_input(app: &mut App, sources: Vec<InputSource>) {
        app.world_mut().resource_mut::<XrInputSources>().sources = sources;
    }

    /// Rig: player в origin, head child на (1, 1.6, 0)
    fn spawn_rig(app: &mut App, control_type: ControlType) -> (Entity, Entity, Entity) {
        let player = app.world_mut().spawn(Transform::default()).id();
        let head = app
            .world_mut()
            .spawn((Transform::from_xyz(1.0, 1.6, 0.0), ChildOf(player)))
            .id();
        let controller = app
            .world_mut()
            .spawn(SmoothLocomotion::new(Handedness::Left, control_type, player).with_head(head))
            .id();
        (player, head, controller)
    }

    fn locomotion_app() -> App {
        let mut app = create_headless_app(42);
        app.add_plugins(LocomotionPlugin);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app
    }

    fn translation(app: &App, entity: Entity) -> Vec3 {
        app.world().get::<Transform>(entity).unwrap().translation
    }

    #[test]
    fn test_move_offset_is_normalized_and_scaled() {
        let offset = move_offset(3.0, 4.0, None, false, 2.0, 0.5).unwrap();
        assert!(offset.distance(Vec3::new(0.6, 0.0, 0.8)) < EPS);
    }

    #[test]
    fn test_move_offset_zero_input_is_noop() {
        assert!(move_offset(0.0, 0.0, None, false, 1.0, 0.016).is_none());
    }

    #[test]
    fn test_move_offset_follows_head_yaw() {
        // Голова повернута на 90° вокруг Y: "вперёд" стика (+Z) → +X мира
        let head = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let offset = move_offset(0.0, 1.0, Some(head), false, 1.0, 1.0).unwrap();
        assert!(offset.distance(Vec3::X) < EPS);
    }

    #[test]
    fn test_move_offset_flattens_pitch_unless_flying() {
        let pitched = Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4);

        let grounded = move_offset(0.0, 1.0, Some(pitched), false, 1.0, 1.0).unwrap();
        assert_eq!(grounded.y, 0.0);
        assert!((grounded.length() - 1.0).abs() < EPS);

        let flying = move_offset(0.0, 1.0, Some(pitched), true, 1.0, 1.0).unwrap();
        assert!(flying.y.abs() > 0.1);
        assert!((flying.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_snap_turn_hysteresis() {
        let mut locomotion = SmoothLocomotion::new(Handedness::Right, ControlType::Rotate, Entity::PLACEHOLDER);

        let angle = snap_turn_angle(&mut locomotion, 0.9).unwrap();
        assert!((angle - (-45f32).to_radians()).abs() < EPS);
        assert!(locomotion.just_snapped);

        // Стик всё ещё отклонён: второго поворота нет
        assert!(snap_turn_angle(&mut locomotion, 1.0).is_none());

        // Ровно на deadzone флаг не сбрасывается
        assert!(snap_turn_angle(&mut locomotion, 0.8).is_none());
        assert!(locomotion.just_snapped);

        assert!(snap_turn_angle(&mut locomotion, 0.1).is_none());
        assert!(!locomotion.just_snapped);

        let angle = snap_turn_angle(&mut locomotion, -0.95).unwrap();
        assert!((angle - 45f32.to_radians()).abs() < EPS);
    }

    #[test]
    fn test_control_source_axis_mapping() {
        assert_eq!(ControlSource::Thumbstick.axis_indices(), (2, 3));
        assert_eq!(ControlSource::Touchpad.axis_indices(), (0, 1));
    }

    #[test]
    fn test_move_controller_translates_player() {
        let mut app = locomotion_app();
        let (player, _head, _controller) = spawn_rig(&mut app, ControlType::Move);
        set_input(&mut app, vec![InputSource::controller(Handedness::Left, thumbstick(0.0, 1.0, false))]);

        app.update();
        app.update();
        let before = translation(&app, player);
        app.update();
        let after = translation(&app, player);

        // 100ms × 1.0 m/s вдоль +Z
        assert!((after - before).distance(Vec3::new(0.0, 0.0, 0.1)) < EPS);
    }

    #[test]
    fn test_other_hand_and_hand_tracking_are_ignored() {
        let mut app = locomotion_app();
        let (player, _head, _controller) = spawn_rig(&mut app, ControlType::Move);
        set_input(
            &mut app,
            vec![
                InputSource::controller(Handedness::Right, thumbstick(0.0, 1.0, false)),
                InputSource {
                    handedness: Handedness::Left,
                    is_hand: true,
                    gamepad: Some(thumbstick(1.0, 0.0, false)),
                },
                InputSource {
                    handedness: Handedness::Left,
                    is_hand: false,
                    gamepad: None,
                },
            ],
        );

        for _ in 0..5 {
            app.update();
        }
        assert_eq!(translation(&app, player), Vec3::ZERO);
    }

    #[test]
    fn test_snap_rotation_keeps_head_in_place() {
        let mut app = locomotion_app();
        let (player, head, _controller) = spawn_rig(&mut app, ControlType::Rotate);
        set_input(&mut app, vec![InputSource::controller(Handedness::Left, thumbstick(1.0, 0.0, false))]);

        app.update();

        let player_transform = *app.world().get::<Transform>(player).unwrap();
        let head_local = app.world().get::<Transform>(head).unwrap().translation;
        let head_world = player_transform.transform_point(head_local);
        assert!(head_world.distance(Vec3::new(1.0, 1.6, 0.0)) < EPS);

        let expected = Quat::from_rotation_y((-45f32).to_radians());
        assert!(player_transform.rotation.abs_diff_eq(expected, EPS));

        // Стик держим: поворот не повторяется
        app.update();
        let rotation = app.world().get::<Transform>(player).unwrap().rotation;
        assert!(rotation.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn test_grip_is_edge_triggered() {
        let mut app = locomotion_app();
        let (_player, _head, controller) = spawn_rig(&mut app, ControlType::Move);
        let mut cursor = app.world().resource::<Events<GrabIntent>>().get_cursor();
        let mut drain = |app: &App| -> Vec<GrabIntent> {
            cursor
                .read(app.world().resource::<Events<GrabIntent>>())
                .copied()
                .collect()
        };

        set_input(&mut app, vec![InputSource::controller(Handedness::Left, thumbstick(0.0, 0.0, true))]);
        app.update();
        assert_eq!(drain(&app), vec![GrabIntent::Grab { controller }]);

        app.update();
        assert!(drain(&app).is_empty());

        set_input(&mut app, vec![InputSource::controller(Handedness::Left, thumbstick(0.0, 0.0, false))]);
        app.update();
        assert_eq!(drain(&app), vec![GrabIntent::Drop { controller }]);
    }
}
