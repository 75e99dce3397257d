//! Off-thread table rendering.
//!
//! [`BackgroundRenderer`] owns the edit side of a [`Wavetable`] on a worker
//! thread. Callers submit creator snapshots through a crossbeam channel; the
//! worker renders the newest one, publishes it, and reports back through a
//! second channel. Playback keeps reading through a [`WavetableReader`]
//! taken before the worker starts.

use crate::creator::WavetableCreator;
use crate::storage::{Wavetable, WavetableReader};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Commands sent to the render thread.
enum RenderCommand {
    /// Render this creator and publish the result.
    Render(Box<WavetableCreator>),
    /// Finish pending work and exit.
    Shutdown,
}

/// Sent back after every published render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderComplete {
    /// Generation of the published table.
    pub generation: u64,
    /// Frames in the published table.
    pub num_frames: usize,
    /// Widest peak-to-peak span before normalisation.
    pub max_span: f32,
}

/// Worker thread rendering tables as edits arrive.
pub struct BackgroundRenderer {
    reader: WavetableReader,
    command_tx: Sender<RenderCommand>,
    complete_rx: Receiver<RenderComplete>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundRenderer {
    /// Move `table` onto a new render thread.
    pub fn spawn(table: Wavetable) -> io::Result<Self> {
        let reader = table.reader();
        let (command_tx, command_rx) = unbounded();
        let (complete_tx, complete_rx) = unbounded();
        let handle = thread::Builder::new()
            .name("wavetable-render".into())
            .spawn(move || run(table, &command_rx, &complete_tx))?;
        Ok(Self {
            reader,
            command_tx,
            complete_rx,
            handle: Some(handle),
        })
    }

    /// Handle for the playback side.
    pub fn reader(&self) -> WavetableReader {
        self.reader.clone()
    }

    /// Queue a render of `creator`. Returns false if the worker has exited.
    ///
    /// Requests queued while a render is running collapse to the newest one.
    pub fn submit(&self, creator: &WavetableCreator) -> bool {
        self.command_tx
            .send(RenderCommand::Render(Box::new(creator.clone())))
            .is_ok()
    }

    /// Drain every completion notice received so far.
    pub fn completions(&self) -> Vec<RenderComplete> {
        self.complete_rx.try_iter().collect()
    }

    /// Next completion notice, if one is waiting.
    pub fn try_recv(&self) -> Option<RenderComplete> {
        match self.complete_rx.try_recv() {
            Ok(complete) => Some(complete),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block up to `timeout` for the next completion notice.
    pub fn wait(&self, timeout: Duration) -> Option<RenderComplete> {
        match self.complete_rx.recv_timeout(timeout) {
            Ok(complete) => Some(complete),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for BackgroundRenderer {
    fn drop(&mut self) {
        let _ = self.command_tx.send(RenderCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("wavetable render thread panicked");
            }
        }
    }
}

fn run(mut table: Wavetable, commands: &Receiver<RenderCommand>, complete: &Sender<RenderComplete>) {
    tracing::debug!("wavetable render thread started");
    while let Ok(command) = commands.recv() {
        let mut latest = match command {
            RenderCommand::Render(creator) => creator,
            RenderCommand::Shutdown => break,
        };
        let mut shutdown = false;
        for command in commands.try_iter() {
            match command {
                RenderCommand::Render(creator) => latest = creator,
                RenderCommand::Shutdown => {
                    shutdown = true;
                    break;
                }
            }
        }

        let summary = latest.render(&mut table);
        let generation = table.publish();
        let _ = complete.send(RenderComplete {
            generation,
            num_frames: summary.num_frames,
            max_span: summary.max_span,
        });
        if shutdown {
            break;
        }
    }
    tracing::debug!(retired = table.retired_count(), "wavetable render thread stopped");
}
