//! Vehicle kinematics tests

use fuzzy_traffic::simulation::{
    Lane, LaneGeometry, Position, SignalController, SimConfig, Vehicle, VehicleId,
    VehicleManager,
};

fn setup() -> (SimConfig, SignalController, VehicleManager) {
    let config = SimConfig::default();
    let signals = SignalController::new(&config, 0.0);
    let vehicles = VehicleManager::new(&config, &signals);
    (config, signals, vehicles)
}

/// Bumper-to-bumper gaps between consecutive vehicles of a lane
fn gaps(vehicles: &VehicleManager, lane: Lane) -> Vec<f32> {
    let body = vehicles.lane(lane).geometry.vehicle_size_along_lane();
    vehicles
        .vehicles(lane)
        .windows(2)
        .map(|pair| pair[0].progress() - pair[1].progress() - body)
        .collect()
}

#[test]
fn test_lane_geometry() {
    let (config, signals, _) = setup();

    let ltr = LaneGeometry::new(&config, signals.light(Lane::LeftToRight));
    assert_eq!(ltr.entry, Position::new(0.0, 375.0));
    assert_eq!(ltr.stop_progress, 300.0);
    assert_eq!(ltr.queue_limit, 330.0);

    let rtl = LaneGeometry::new(&config, signals.light(Lane::RightToLeft));
    assert_eq!(rtl.entry, Position::new(770.0, 405.0));
    assert_eq!(rtl.stop_progress, 300.0);
    assert_eq!(rtl.queue_limit, 310.0);

    let ttb = LaneGeometry::new(&config, signals.light(Lane::TopToBottom));
    assert_eq!(ttb.entry, Position::new(405.0, 0.0));
    assert_eq!(ttb.stop_progress, 295.0);
    assert_eq!(ttb.queue_limit, 310.0);

    let btt = LaneGeometry::new(&config, signals.light(Lane::BottomToTop));
    assert_eq!(btt.entry, Position::new(375.0, 770.0));
    assert_eq!(btt.stop_progress, 300.0);
    assert_eq!(btt.queue_limit, 300.0);
    assert_eq!(btt.position_at(100.0), Position::new(375.0, 670.0));
}

#[test]
fn test_vehicle_rejects_mismatched_light() {
    let (config, signals, _) = setup();
    let geometry = LaneGeometry::new(&config, signals.light(Lane::LeftToRight));
    let result = Vehicle::new(
        VehicleId(0),
        Lane::LeftToRight,
        signals.light(Lane::TopToBottom),
        &geometry,
        5.0,
    );
    assert!(result.is_err());

    let ok = Vehicle::new(
        VehicleId(0),
        Lane::LeftToRight,
        signals.light(Lane::LeftToRight),
        &geometry,
        5.0,
    );
    assert!(ok.is_ok());
}

#[test]
fn test_manager_spawn_with_wrong_light_fails() {
    let (_, signals, mut vehicles) = setup();
    assert!(vehicles
        .spawn(Lane::LeftToRight, signals.light(Lane::BottomToTop))
        .is_err());
    assert_eq!(vehicles.spawned_total(), 0);
}

#[test]
fn test_spawn_too_close_is_dropped() {
    let (_, signals, mut vehicles) = setup();
    let lane = Lane::LeftToRight;
    let light = signals.light(lane);

    assert!(vehicles.spawn(lane, light).unwrap().is_some());
    assert!(vehicles.spawn(lane, light).unwrap().is_none());
    assert_eq!(vehicles.rejected_total(), 1);

    // 7 ticks: progress 35, gap 5 is below 5.5 clearance
    for _ in 0..7 {
        vehicles.advance(lane, light);
    }
    assert!(vehicles.spawn(lane, light).unwrap().is_none());

    vehicles.advance(lane, light);
    let id = vehicles.spawn(lane, light).unwrap();
    assert_eq!(id, Some(VehicleId(1)));
    assert_eq!(vehicles.spawned_total(), 2);
    assert_eq!(vehicles.vehicles(lane).len(), 2);
    assert_eq!(gaps(&vehicles, lane), vec![10.0]);
}

#[test]
fn test_spawned_vehicles_respect_spawn_clearance() {
    let (config, signals, mut vehicles) = setup();
    let clearance = config.vehicle.safe_distance * config.vehicle.safe_spawn_factor;

    for lane in Lane::ALL {
        let light = signals.light(lane);
        for _ in 0..300 {
            if vehicles.spawn(lane, light).unwrap().is_some() {
                if let Some(gap) = gaps(&vehicles, lane).last() {
                    assert!(*gap >= clearance, "{:?} spawned with gap {}", lane, gap);
                }
            }
            vehicles.advance(lane, light);
        }
    }
}

#[test]
fn test_vehicle_stops_at_red_light() {
    let (_, signals, mut vehicles) = setup();
    let lane = Lane::TopToBottom;
    let light = signals.light(lane);

    vehicles.spawn(lane, light).unwrap();
    for _ in 0..200 {
        vehicles.advance(lane, light);
    }

    let vehicle = &vehicles.vehicles(lane)[0];
    assert_eq!(vehicle.progress(), 295.0);
    assert_eq!(vehicle.position(), Position::new(405.0, 295.0));
    assert!(vehicles.is_queued(vehicle));
    assert_eq!(vehicles.queued_count(lane), 1);
}

#[test]
fn test_queue_forms_behind_red_light() {
    let (config, signals, mut vehicles) = setup();
    let lane = Lane::TopToBottom;
    let light = signals.light(lane);

    for _ in 0..1000 {
        let _ = vehicles.spawn(lane, light).unwrap();
        vehicles.advance(lane, light);
    }

    let queued = vehicles.vehicles(lane);
    assert!(queued.len() > 3);
    assert_eq!(queued[0].progress(), 295.0);
    for gap in gaps(&vehicles, lane) {
        assert!(gap >= config.vehicle.safe_distance - 1e-3, "gap {}", gap);
    }
    assert_eq!(vehicles.queued_count(lane), queued.len());
}

#[test]
fn test_green_light_lets_vehicles_cross() {
    let (_, signals, mut vehicles) = setup();
    let lane = Lane::LeftToRight;
    let light = signals.light(lane);

    vehicles.spawn(lane, light).unwrap();
    for _ in 0..70 {
        vehicles.advance(lane, light);
    }
    let vehicle = &vehicles.vehicles(lane)[0];
    assert_eq!(vehicle.progress(), 350.0);
    assert!(!vehicles.is_queued(vehicle));
    assert_eq!(vehicles.queued_count(lane), 0);
}

#[test]
fn test_vehicle_past_stop_line_does_not_roll_back() {
    let config = SimConfig::default();
    let mut signals = SignalController::new(&config, 0.0);
    let mut vehicles = VehicleManager::new(&config, &signals);
    let lane = Lane::LeftToRight;

    vehicles.spawn(lane, signals.light(lane)).unwrap();
    // Progress 305: past the stop line but not across the light
    for _ in 0..61 {
        vehicles.advance(lane, signals.light(lane));
    }
    assert_eq!(vehicles.vehicles(lane)[0].progress(), 305.0);

    signals.update(10.0);
    vehicles.advance(lane, signals.light(lane));
    assert_eq!(vehicles.vehicles(lane)[0].progress(), 305.0);
}

#[test]
fn test_reap_removes_vehicles_off_screen() {
    let (_, signals, mut vehicles) = setup();
    let lane = Lane::LeftToRight;
    let light = signals.light(lane);

    vehicles.spawn(lane, light).unwrap();
    for _ in 0..20 {
        vehicles.advance(lane, light);
    }
    vehicles.spawn(lane, light).unwrap();

    for _ in 0..150 {
        vehicles.advance(lane, light);
    }
    // Leader at 850 is off screen, follower at 750 is not
    assert_eq!(vehicles.reap(lane), 1);
    assert_eq!(vehicles.vehicles(lane).len(), 1);
    assert_eq!(vehicles.vehicles(lane)[0].id, VehicleId(1));
    assert_eq!(vehicles.exited_total(), 1);
    assert_eq!(vehicles.reap(lane), 0);
}

#[test]
fn test_positions_report_travel_order() {
    let (_, signals, mut vehicles) = setup();
    let lane = Lane::RightToLeft;
    let light = signals.light(lane);

    vehicles.spawn(lane, light).unwrap();
    for _ in 0..10 {
        vehicles.advance(lane, light);
    }
    vehicles.spawn(lane, light).unwrap();

    let positions = vehicles.positions(lane);
    assert_eq!(positions, vec![Position::new(720.0, 405.0), Position::new(770.0, 405.0)]);
    assert_eq!(vehicles.active_count(), 2);
}
