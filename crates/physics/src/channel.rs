//! # Simulation Thread and Message Protocol
//!
//! The [`World`] lives on a dedicated thread and is only reachable through
//! messages: [`Command`]s flow in, [`Update`]s flow out, both over
//! `std::sync::mpsc`. Nothing is shared between the two sides, so no locks
//! are involved. Commands are handled strictly in the order they were sent.
//!
//! Collision events are pushed as soon as a step detects them, before the
//! snapshot of that step is sent. Consumers should not rely on that ordering.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use glam::Vec3;
use tracing::{info, warn};

use crate::builder::BodyDesc;
use crate::config::WorldConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{CollisionEvent, EventSink};
use crate::simulation::World;
use crate::snapshot::TransformSnapshot;
use crate::types::BodyHandle;

/// Presentation to simulation.
#[derive(Debug)]
pub enum Command {
    /// Advance one fixed step and reply with a snapshot.
    Step,
    /// Register a body; the result goes back on `reply`.
    CreateBody {
        desc: BodyDesc,
        reply: Sender<Result<BodyHandle>>,
    },
    BeginDrag {
        body: BodyHandle,
        point: Vec3,
    },
    UpdateDrag {
        point: Vec3,
    },
    EndDrag {
        throw: bool,
    },
    Shutdown,
}

/// Simulation to presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Snapshot(TransformSnapshot),
    Collision(CollisionEvent),
    /// A drag command could not be applied.
    Rejected(PhysicsError),
}

/// Forwards collision events onto the update channel as they happen.
struct ChannelSink<'a> {
    updates: &'a Sender<Update>,
    connected: bool,
}

impl EventSink for ChannelSink<'_> {
    fn emit(&mut self, event: CollisionEvent) {
        if self.updates.send(Update::Collision(event)).is_err() {
            self.connected = false;
        }
    }
}

/// Presentation-side handle to a running simulation thread.
pub struct SimulationHandle {
    commands: Sender<Command>,
    updates: Receiver<Update>,
    thread: Option<JoinHandle<u64>>,
    tracked: usize,
}

impl SimulationHandle {
    /// Validate `config`, build an empty world and start its thread.
    pub fn spawn(config: WorldConfig) -> Result<Self> {
        Self::spawn_world(World::new(config)?)
    }

    /// Move an existing world onto a new simulation thread.
    pub fn spawn_world(world: World) -> Result<Self> {
        let (commands, command_rx) = mpsc::channel();
        let (update_tx, updates) = mpsc::channel();
        let tracked = world.registry().tracked_count();

        let thread = thread::Builder::new()
            .name("hoops-simulation".into())
            .spawn(move || run(world, &command_rx, &update_tx))
            .map_err(|err| PhysicsError::ThreadSpawn(err.to_string()))?;

        Ok(Self {
            commands,
            updates,
            thread: Some(thread),
            tracked,
        })
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PhysicsError::Disconnected)
    }

    /// Create a body and wait for its handle. Creation errors come back
    /// synchronously and leave the world unchanged.
    pub fn create_body(&mut self, desc: BodyDesc) -> Result<BodyHandle> {
        let tracked = desc.tracked;
        let (reply, response) = mpsc::channel();
        self.send(Command::CreateBody { desc, reply })?;
        let handle = response.recv().map_err(|_| PhysicsError::Disconnected)??;
        if tracked {
            self.tracked += 1;
        }
        Ok(handle)
    }

    /// Number of tracked bodies created so far; the expected snapshot length.
    pub fn tracked_count(&self) -> usize {
        self.tracked
    }

    /// Ask for one step. Fire and forget: the snapshot arrives as an update.
    pub fn request_step(&self) -> Result<()> {
        self.send(Command::Step)
    }

    pub fn begin_drag(&self, body: BodyHandle, point: Vec3) -> Result<()> {
        self.send(Command::BeginDrag { body, point })
    }

    pub fn update_drag(&self, point: Vec3) -> Result<()> {
        self.send(Command::UpdateDrag { point })
    }

    pub fn end_drag(&self, throw: bool) -> Result<()> {
        self.send(Command::EndDrag { throw })
    }

    /// Next pending update without waiting.
    pub fn try_next_update(&self) -> Result<Option<Update>> {
        match self.updates.try_recv() {
            Ok(update) => Ok(Some(update)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(PhysicsError::Disconnected),
        }
    }

    /// Wait up to `timeout` for the next update.
    pub fn next_update_timeout(&self, timeout: Duration) -> Result<Option<Update>> {
        match self.updates.recv_timeout(timeout) {
            Ok(update) => Ok(Some(update)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(PhysicsError::Disconnected),
        }
    }

    /// Stop the thread and return the number of steps it completed.
    pub fn shutdown(mut self) -> Result<u64> {
        // The thread may already be gone; joining tells us either way.
        let _ = self.commands.send(Command::Shutdown);
        let thread = self.thread.take().ok_or(PhysicsError::Disconnected)?;
        thread.join().map_err(|_| PhysicsError::Disconnected)
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.commands.send(Command::Shutdown);
            let _ = thread.join();
        }
    }
}

fn run(mut world: World, commands: &Receiver<Command>, updates: &Sender<Update>) -> u64 {
    info!("simulation thread started");
    while let Ok(command) = commands.recv() {
        let connected = match command {
            Command::Step => {
                let mut sink = ChannelSink {
                    updates,
                    connected: true,
                };
                world.step(&mut sink);
                sink.connected && updates.send(Update::Snapshot(world.snapshot())).is_ok()
            }
            Command::CreateBody { desc, reply } => {
                // A caller that stopped waiting does not stop the simulation.
                let _ = reply.send(world.create_body(desc));
                true
            }
            Command::BeginDrag { body, point } => report(updates, world.begin_drag(body, point)),
            Command::UpdateDrag { point } => report(updates, world.update_drag(point)),
            Command::EndDrag { throw } => report(updates, world.end_drag(throw)),
            Command::Shutdown => break,
        };
        if !connected {
            warn!("update receiver dropped, stopping");
            break;
        }
    }
    info!(steps = world.steps(), "simulation thread stopped");
    world.steps()
}

fn report(updates: &Sender<Update>, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(%err, "command rejected");
            updates.send(Update::Rejected(err)).is_ok()
        }
    }
}
