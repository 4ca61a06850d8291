//! Assembles the installed room from its configuration.

use std::sync::Arc;

use escaperoom_hardware::{InputPort, KeypadPort, OutputPort};
use escaperoom_network::Messenger;
use escaperoom_puzzles::{BreakerMatch, KeypadCode, WireDefusal};

use crate::config::ControllerConfig;
use crate::dispatcher::Dispatcher;
use crate::door::DoorLock;
use crate::error::Result;

/// Hardware the room runs on.
#[derive(Clone)]
pub struct Ports {
    pub input: Arc<dyn InputPort>,
    pub output: Arc<dyn OutputPort>,
    pub keypad: Arc<dyn KeypadPort>,
}

/// Validate `config`, lock the door and start every puzzle.
///
/// The keypad is gated by the wire puzzle. Must be called inside a Tokio
/// runtime.
///
/// # Errors
/// Returns an error if the configuration is invalid, the door cannot be
/// locked, or a port refuses a subscription.
pub fn build(
    config: &ControllerConfig,
    ports: Ports,
    messenger: Arc<dyn Messenger>,
) -> Result<Dispatcher> {
    config.validate()?;

    let door = DoorLock::new(config.door, Arc::clone(&ports.output));
    door.lock()?;

    let mut dispatcher = Dispatcher::new(config.queue_capacity).with_door(door);

    let breaker = BreakerMatch::new(
        config.breaker.clone(),
        Arc::clone(&ports.input),
        Arc::clone(&ports.output),
        Arc::clone(&messenger),
    );
    dispatcher.register(breaker.into(), ports.input.as_ref(), ports.keypad.as_ref())?;

    let wire = WireDefusal::new(
        config.wire.clone(),
        Arc::clone(&ports.input),
        Arc::clone(&ports.output),
        Arc::clone(&messenger),
    );
    let wire = dispatcher.register(wire.into(), ports.input.as_ref(), ports.keypad.as_ref())?;

    let keypad = KeypadCode::new(config.keypad.clone(), messenger);
    let keypad = dispatcher.register(keypad.into(), ports.input.as_ref(), ports.keypad.as_ref())?;

    dispatcher.link_gate(wire, keypad)?;
    Ok(dispatcher)
}
