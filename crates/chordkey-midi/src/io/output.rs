//! MIDI output: device enumeration, connection, and a forwarding thread that
//! drains the emitter's output channel into the connected port.

use crate::error::{Error, Result};
use crate::event::RawMidiEvent;
use crate::output_collector::MidiOutputConsumer;
use arc_swap::ArcSwap;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use midir::{MidiOutput, MidiOutputConnection};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

const CLIENT_NAME: &str = "chordkey";

/// How long the forwarding thread waits for commands before draining events.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiOutputDevice {
    pub index: usize,
    pub name: String,
}

enum MidiOutputCommand {
    Connect(usize),
    Disconnect,
    Shutdown,
}

/// Owns the forwarding thread. Events drained while no port is connected are
/// discarded so the audio thread never sees a full channel.
pub struct MidiOutputManager {
    command_sender: Sender<MidiOutputCommand>,
    connected_device: Arc<ArcSwap<Option<String>>>,
    is_connected: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl MidiOutputManager {
    pub fn spawn(consumer: MidiOutputConsumer) -> Result<Self> {
        let (command_sender, command_receiver) = bounded(64);
        let connected_device = Arc::new(ArcSwap::new(Arc::new(None)));
        let is_connected = Arc::new(AtomicBool::new(false));

        let connected_device_clone = Arc::clone(&connected_device);
        let is_connected_clone = Arc::clone(&is_connected);

        let thread = thread::Builder::new()
            .name("chordkey-midi-out".to_string())
            .spawn(move || {
                Self::forward_thread(
                    command_receiver,
                    consumer,
                    connected_device_clone,
                    is_connected_clone,
                );
            })?;

        Ok(Self {
            command_sender,
            connected_device,
            is_connected,
            thread: Some(thread),
        })
    }

    fn forward_thread(
        command_receiver: Receiver<MidiOutputCommand>,
        mut consumer: MidiOutputConsumer,
        connected_device: Arc<ArcSwap<Option<String>>>,
        is_connected: Arc<AtomicBool>,
    ) {
        let mut connection: Option<MidiOutputConnection> = None;

        loop {
            match command_receiver.recv_timeout(POLL_INTERVAL) {
                Ok(MidiOutputCommand::Connect(device_index)) => {
                    if let Some(conn) = connection.take() {
                        conn.close();
                    }
                    match Self::connect_to_device(device_index) {
                        Ok((conn, name)) => {
                            debug!("Connected MIDI output {}: {}", device_index, name);
                            connection = Some(conn);
                            is_connected.store(true, Ordering::SeqCst);
                            connected_device.store(Arc::new(Some(name)));
                        }
                        Err(e) => {
                            warn!("MIDI output connection failed: {}", e);
                            is_connected.store(false, Ordering::SeqCst);
                            connected_device.store(Arc::new(None));
                        }
                    }
                }
                Ok(MidiOutputCommand::Disconnect) => {
                    if let Some(conn) = connection.take() {
                        conn.close();
                        is_connected.store(false, Ordering::SeqCst);
                        connected_device.store(Arc::new(None));
                    }
                }
                Ok(MidiOutputCommand::Shutdown) => {
                    if let Some(conn) = connection.take() {
                        conn.close();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            while let Some(event) = consumer.pop() {
                let raw = RawMidiEvent::from(event);
                if let Some(ref mut conn) = connection {
                    if let Err(e) = conn.send(raw.bytes()) {
                        debug!("MIDI send failed: {}", e);
                    }
                }
            }
        }
    }

    fn connect_to_device(device_index: usize) -> Result<(MidiOutputConnection, String)> {
        let midi_output = MidiOutput::new(CLIENT_NAME)?;

        let ports = midi_output.ports();
        let port = ports.get(device_index).ok_or_else(|| {
            Error::MidiDevice(format!("MIDI output device {} not found", device_index))
        })?;

        let port_name = midi_output
            .port_name(port)
            .unwrap_or_else(|_| format!("Device {}", device_index));

        let connection = midi_output.connect(port, "out")?;

        Ok((connection, port_name))
    }

    pub fn list_devices() -> Vec<MidiOutputDevice> {
        let mut devices = Vec::new();
        if let Ok(midi_output) = MidiOutput::new(CLIENT_NAME) {
            for (index, port) in midi_output.ports().iter().enumerate() {
                let name = midi_output
                    .port_name(port)
                    .unwrap_or_else(|_| format!("Unknown Device {}", index));
                devices.push(MidiOutputDevice { index, name });
            }
        }
        devices
    }

    pub fn connect(&self, device_index: usize) -> Result<()> {
        self.command_sender
            .send(MidiOutputCommand::Connect(device_index))
            .map_err(|_| Error::MidiDevice("MIDI output thread not running".to_string()))
    }

    pub fn connect_by_name(&self, name: &str) -> Result<()> {
        let needle = name.to_lowercase();
        let device = Self::list_devices()
            .into_iter()
            .find(|d| d.name.to_lowercase().contains(&needle))
            .ok_or_else(|| {
                Error::MidiDevice(format!("No MIDI output device found matching '{}'", name))
            })?;
        self.connect(device.index)
    }

    pub fn disconnect(&self) {
        let _ = self.command_sender.send(MidiOutputCommand::Disconnect);
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    pub fn connected_device_name(&self) -> Option<String> {
        self.connected_device.load().as_ref().clone()
    }
}

impl Drop for MidiOutputManager {
    fn drop(&mut self) {
        let _ = self.command_sender.send(MidiOutputCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
