mod common;

use std::time::{Duration, Instant};

use glam::Vec3;
use hoops_physics::{
    CollisionEvent, PhysicsError, SimulationHandle, StepPacer, TransformSnapshot, Update, WorldConfig,
};

use common::{ball, floor};

const DEADLINE: Duration = Duration::from_secs(20);

/// Drive `sim` with a pacer until `frames` snapshots arrived.
fn pump(sim: &SimulationHandle, frames: usize) -> (Vec<TransformSnapshot>, Vec<CollisionEvent>) {
    let mut pacer = StepPacer::new(Duration::from_millis(1));
    let mut snapshots = Vec::new();
    let mut events = Vec::new();
    let start = Instant::now();
    while snapshots.len() < frames {
        assert!(start.elapsed() < DEADLINE, "simulation thread stalled");
        if pacer.poll(Instant::now()) {
            sim.request_step().unwrap();
        }
        match sim.next_update_timeout(Duration::from_millis(5)).unwrap() {
            Some(Update::Snapshot(snapshot)) => {
                pacer.acknowledge(Instant::now());
                snapshots.push(snapshot);
            }
            Some(Update::Collision(event)) => events.push(event),
            Some(Update::Rejected(err)) => panic!("unexpected rejection: {err}"),
            None => {}
        }
    }
    assert!(!pacer.in_flight());
    (snapshots, events)
}

#[test]
fn paced_loop_receives_every_step_in_order() {
    let mut sim = SimulationHandle::spawn(WorldConfig::default()).unwrap();
    sim.create_body(floor()).unwrap();
    sim.create_body(ball(Vec3::new(0.0, 1.25, 0.0)).with_impact_tag("bounce"))
        .unwrap();

    let (snapshots, events) = pump(&sim, 120);
    for (i, snapshot) in snapshots.iter().enumerate() {
        assert_eq!(snapshot.step, i as u64 + 1);
        snapshot.validate(sim.tracked_count()).unwrap();
    }
    assert!(events.iter().any(|e| e.tag.as_str() == "bounce"));

    let (last, _) = snapshots.last().unwrap().pose(0).unwrap();
    assert!(last.y < 1.25);
    assert_eq!(sim.shutdown().unwrap(), 120);
}

#[test]
fn drag_over_the_channel_moves_the_ball() {
    let mut sim = SimulationHandle::spawn(WorldConfig::default()).unwrap();
    sim.create_body(floor()).unwrap();
    let ball = sim.create_body(ball(Vec3::new(0.0, 0.24, 0.0))).unwrap();

    sim.begin_drag(ball, Vec3::new(0.0, 0.24, 0.0)).unwrap();
    sim.update_drag(Vec3::new(0.0, 1.5, 0.0)).unwrap();
    let (snapshots, _) = pump(&sim, 60);
    let (held, _) = snapshots.last().unwrap().pose(0).unwrap();
    assert!((held.y - 1.5).abs() < 0.05, "held at {held}");

    // A second grab while holding is reported, not fatal.
    sim.begin_drag(ball, held).unwrap();
    let mut rejected = None;
    let start = Instant::now();
    while rejected.is_none() && start.elapsed() < DEADLINE {
        if let Some(Update::Rejected(err)) = sim.next_update_timeout(Duration::from_millis(5)).unwrap() {
            rejected = Some(err);
        }
    }
    assert_eq!(rejected, Some(PhysicsError::AlreadyDragging));

    sim.end_drag(true).unwrap();
    pump(&sim, 10);
    assert_eq!(sim.shutdown().unwrap(), 70);
}

#[test]
fn dropping_the_handle_stops_the_thread() {
    let sim = SimulationHandle::spawn(WorldConfig::default()).unwrap();
    sim.request_step().unwrap();
    drop(sim);
}
