//! Recording device controller.
//!
//! In-process stand-in for the habitat device controller.  Keeps the
//! current on/off state and intensity of every [`Device`] and a bounded
//! history of accepted commands; can be told to fail so callers can
//! exercise their error paths.

use log::debug;
use serde::Serialize;

use crate::app::ports::{
    Device, DeviceActuator, DeviceCommand, DeviceError, DeviceResponse, TransportStatus,
};

/// Commands retained by [`RecordingDeviceController`].
pub const COMMAND_HISTORY_CAPACITY: usize = 100;

/// Last commanded state of one device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    pub on: bool,
    pub intensity: u8,
}

#[derive(Debug, Default)]
pub struct RecordingDeviceController {
    states: [DeviceState; Device::ALL.len()],
    history: heapless::Deque<DeviceCommand, COMMAND_HISTORY_CAPACITY>,
    failure: Option<TransportStatus>,
}

impl RecordingDeviceController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every following command with `status` until cleared.
    pub fn fail_with(&mut self, status: TransportStatus) {
        self.failure = Some(status);
    }

    pub fn recover(&mut self) {
        self.failure = None;
    }

    pub fn state(&self, device: Device) -> DeviceState {
        self.states[device as usize]
    }

    /// Accepted commands, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &DeviceCommand> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_command(&self) -> Option<&DeviceCommand> {
        self.history.back()
    }
}

impl DeviceActuator for RecordingDeviceController {
    fn execute(&mut self, command: &DeviceCommand) -> Result<DeviceResponse, DeviceError> {
        if let Some(status) = self.failure {
            return Ok(DeviceResponse::failed(status));
        }

        self.states[command.device as usize] = DeviceState {
            on: command.on,
            intensity: if command.on { command.intensity } else { 0 },
        };
        if self.history.is_full() {
            let _ = self.history.pop_front();
        }
        // Room was made above.
        let _ = self.history.push_back(command.clone());
        debug!(
            "device {} -> on={} intensity={}",
            command.device, command.on, command.intensity
        );
        Ok(DeviceResponse::ok())
    }
}
