//! Live MIDI input through midir.

use crate::config::ListenParams;
use crate::dispatch::{Dispatcher, KeyIntent};
use crate::error::{ScResult, ScriabinError};
use crate::index::CompiledLayout;
use crate::sink::{deliver, KeySink};
use crate::stats::Diagnostics;
use midir::{Ignore, MidiInput, MidiInputConnection};
use std::sync::{Arc, Mutex};
use tracing::{error, info};

const CLIENT_NAME: &str = "scriabin";

/// Names of the input ports currently visible.
pub fn list_ports() -> ScResult<Vec<String>> {
    let midi_in = MidiInput::new(CLIENT_NAME)?;
    Ok(midi_in
        .ports()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            midi_in
                .port_name(p)
                .unwrap_or_else(|_| format!("Port {}", i))
        })
        .collect())
}

struct Session<S> {
    layout: Arc<CompiledLayout>,
    dispatcher: Dispatcher,
    sink: S,
    buf: Vec<KeyIntent>,
}

type Shared<S> = Arc<Mutex<Session<S>>>;

impl<S: KeySink> Session<S> {
    fn new(layout: Arc<CompiledLayout>, dispatcher: Dispatcher, sink: S) -> Self {
        Self {
            layout,
            dispatcher,
            sink,
            buf: Vec::new(),
        }
    }

    fn on_message(&mut self, message: &[u8]) {
        self.buf.clear();
        self.dispatcher
            .handle_message_into(&self.layout, message, &mut self.buf);
        deliver(&mut self.sink, &self.buf);
    }
}

fn session_stats<S>(session: &Mutex<Session<S>>) -> Diagnostics {
    match session.lock() {
        Ok(s) => *s.dispatcher.stats(),
        Err(poisoned) => *poisoned.into_inner().dispatcher.stats(),
    }
}

/// Keeps the port open; dropping it closes the connection.
pub struct Listener<S> {
    conn: MidiInputConnection<()>,
    session: Shared<S>,
    pub port_name: String,
}

impl<S> Listener<S> {
    /// Closes the port and returns what the session counted while it was open.
    pub fn close(self) -> Diagnostics {
        let _ = self.conn.close();
        session_stats(&self.session)
    }
}

/// Connects to a port (by name fragment) or opens a virtual one and feeds every
/// message through one dispatcher. The mutex keeps messages in arrival order.
pub fn listen<S>(
    layout: Arc<CompiledLayout>,
    dispatcher: Dispatcher,
    sink: S,
    params: &ListenParams,
) -> ScResult<Listener<S>>
where
    S: KeySink + Send + 'static,
{
    let mut midi_in = MidiInput::new(CLIENT_NAME)?;
    midi_in.ignore(Ignore::All);

    let session: Shared<S> = Arc::new(Mutex::new(Session::new(layout, dispatcher, sink)));
    let in_callback = Arc::clone(&session);
    let callback = move |_stamp: u64, message: &[u8], _: &mut ()| match in_callback.lock() {
        Ok(mut s) => s.on_message(message),
        Err(_) => error!("MIDI session lock poisoned; dropping message"),
    };

    match &params.port {
        Some(fragment) => {
            let found = midi_in.ports().into_iter().find_map(|p| {
                let name = midi_in.port_name(&p).ok()?;
                name.contains(fragment.as_str()).then_some((p, name))
            });
            let (port, name) = found.ok_or_else(|| {
                ScriabinError::MidiPort(format!("no input port matching '{}'", fragment))
            })?;
            info!("Opening connection to '{}'", name);
            let conn = midi_in.connect(&port, "scriabin-input", callback, ())?;
            Ok(Listener {
                conn,
                session,
                port_name: name,
            })
        }
        None => open_virtual(midi_in, &params.virtual_name, callback, session),
    }
}

#[cfg(unix)]
fn open_virtual<F, S>(
    midi_in: MidiInput,
    name: &str,
    callback: F,
    session: Shared<S>,
) -> ScResult<Listener<S>>
where
    F: FnMut(u64, &[u8], &mut ()) + Send + 'static,
{
    use midir::os::unix::VirtualInput;

    info!("Opening virtual port '{}'", name);
    let conn = midi_in.create_virtual(name, callback, ())?;
    Ok(Listener {
        conn,
        session,
        port_name: name.to_string(),
    })
}

#[cfg(not(unix))]
fn open_virtual<F, S>(
    _midi_in: MidiInput,
    _name: &str,
    _callback: F,
    _session: Shared<S>,
) -> ScResult<Listener<S>>
where
    F: FnMut(u64, &[u8], &mut ()) + Send + 'static,
{
    Err(ScriabinError::MidiPort(
        "virtual ports are not available on this platform; pass --port".to_string(),
    ))
}
