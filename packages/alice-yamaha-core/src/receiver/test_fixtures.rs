//! In-memory receiver used by capability, service and router tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{DiscoveryResult, YncResult};
use crate::receiver::discovery::Receiver;
use crate::receiver::traits::{DeviceStatePort, ReceiverConnector, ReceiverDiscovery};
use crate::receiver::ync::YncError;

/// Snapshot of the fake receiver's controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeState {
    pub power: bool,
    pub volume: i32,
    pub mute: bool,
    pub input: String,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            power: true,
            volume: -40,
            mute: false,
            input: "HDMI1".to_string(),
        }
    }
}

/// Receiver that keeps its state in memory and records every write.
#[derive(Default)]
pub struct FakeReceiver {
    state: Mutex<FakeState>,
    writes: Mutex<Vec<String>>,
    failing: AtomicBool,
    calls_left: Mutex<Option<usize>>,
}

impl FakeReceiver {
    pub fn with_state(state: FakeState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// Makes every subsequent call fail with an `RC` error.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Lets `calls` more calls succeed, then fails every call after them.
    pub fn fail_after(&self, calls: usize) {
        *self.calls_left.lock().unwrap() = Some(calls);
    }

    pub fn state(&self) -> FakeState {
        self.state.lock().unwrap().clone()
    }

    /// Writes applied so far, formatted as `name=value`.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    fn check(&self) -> YncResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(YncError::ResponseCode("3".to_string()));
        }
        match self.calls_left.lock().unwrap().as_mut() {
            Some(0) => Err(YncError::ResponseCode("3".to_string())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn record(&self, write: String) {
        self.writes.lock().unwrap().push(write);
    }
}

#[async_trait]
impl DeviceStatePort for FakeReceiver {
    async fn get_power(&self) -> YncResult<bool> {
        self.check()?;
        Ok(self.state.lock().unwrap().power)
    }

    async fn set_power(&self, on: bool) -> YncResult<()> {
        self.check()?;
        self.record(format!("power={}", on));
        self.state.lock().unwrap().power = on;
        Ok(())
    }

    async fn get_volume(&self) -> YncResult<i32> {
        self.check()?;
        Ok(self.state.lock().unwrap().volume)
    }

    async fn set_volume(&self, volume_db: i32) -> YncResult<()> {
        self.check()?;
        self.record(format!("volume={}", volume_db));
        self.state.lock().unwrap().volume = volume_db;
        Ok(())
    }

    async fn get_mute(&self) -> YncResult<bool> {
        self.check()?;
        Ok(self.state.lock().unwrap().mute)
    }

    async fn set_mute(&self, mute: bool) -> YncResult<()> {
        self.check()?;
        self.record(format!("mute={}", mute));
        self.state.lock().unwrap().mute = mute;
        Ok(())
    }

    async fn get_input(&self) -> YncResult<String> {
        self.check()?;
        Ok(self.state.lock().unwrap().input.clone())
    }

    async fn set_input(&self, input: &str) -> YncResult<()> {
        self.check()?;
        self.record(format!("input={}", input));
        self.state.lock().unwrap().input = input.to_string();
        Ok(())
    }
}

/// Receiver client serving a fixed receiver list and one shared fake port.
pub struct FakeReceiverClient {
    pub receivers: Vec<Receiver>,
    pub port: Arc<FakeReceiver>,
    connected: Mutex<Vec<String>>,
}

impl FakeReceiverClient {
    pub fn new(receivers: Vec<Receiver>, port: Arc<FakeReceiver>) -> Self {
        Self {
            receivers,
            port,
            connected: Mutex::new(Vec::new()),
        }
    }

    /// Control URLs passed to `connect`, in call order.
    pub fn connected(&self) -> Vec<String> {
        self.connected.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReceiverDiscovery for FakeReceiverClient {
    async fn discover_receivers(&self) -> DiscoveryResult<Vec<Receiver>> {
        Ok(self.receivers.clone())
    }
}

impl ReceiverConnector for FakeReceiverClient {
    fn connect(&self, ctrl_url: &str) -> Arc<dyn DeviceStatePort> {
        self.connected.lock().unwrap().push(ctrl_url.to_string());
        self.port.clone()
    }
}

/// A receiver as discovery would report it.
pub fn living_room() -> Receiver {
    Receiver {
        ctrl_url: "http://192.168.1.20/YamahaRemoteControl/ctrl".to_string(),
        friendly_name: "Living Room".to_string(),
        model_name: "RX-V677".to_string(),
    }
}
