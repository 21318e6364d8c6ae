//! # GPIO line binding.
//!
//! The one thin module that touches real pins. It wires the configured BCM
//! lines to the [`inputs`](crate::inputs) producers with async interrupts;
//! everything past the callback is ordinary event production.
//!
//! Returned [`InputPin`]s must be kept alive for as long as the line should
//! stay bound; rppal restores a pin to its pre-run state when the handle is
//! dropped, whatever the exit cause.

use std::sync::Arc;

use rppal::gpio::{Gpio, InputPin, Trigger};

use crate::error::RuntimeError;
use crate::inputs::{Button, MotionSensor};

fn gpio() -> Result<Gpio, RuntimeError> {
    Gpio::new().map_err(|e| RuntimeError::Gpio(e.to_string()))
}

/// Binds the push button to `line`, classifying edges via `button`.
pub fn bind_button(line: u8, button: Arc<Button>) -> Result<InputPin, RuntimeError> {
    let mut pin = gpio()?
        .get(line)
        .map_err(|e| RuntimeError::Gpio(e.to_string()))?
        .into_input();

    pin.set_async_interrupt(Trigger::Both, None, move |event| match event.trigger {
        Trigger::RisingEdge => button.pressed(),
        Trigger::FallingEdge => button.released(),
        _ => {}
    })
    .map_err(|e| RuntimeError::Gpio(e.to_string()))?;

    tracing::info!(line, "button bound");
    Ok(pin)
}

/// Binds the PIR motion sensor to `line`, forwarding level changes.
pub fn bind_motion_sensor(line: u8, sensor: Arc<MotionSensor>) -> Result<InputPin, RuntimeError> {
    let mut pin = gpio()?
        .get(line)
        .map_err(|e| RuntimeError::Gpio(e.to_string()))?
        .into_input();

    pin.set_async_interrupt(Trigger::Both, None, move |event| match event.trigger {
        Trigger::RisingEdge => sensor.level_changed(true),
        Trigger::FallingEdge => sensor.level_changed(false),
        _ => {}
    })
    .map_err(|e| RuntimeError::Gpio(e.to_string()))?;

    tracing::info!(line, "motion sensor bound");
    Ok(pin)
}
