#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};
use tracing::warn;

use crate::params::Params;

/// Source of parameter snapshots for a realtime thread.
pub trait ParamsReceiver {
    fn pop(&mut self) -> Option<Params>;
}

#[cfg(feature = "rtrb")]
impl ParamsReceiver for Consumer<Params> {
    fn pop(&mut self) -> Option<Params> {
        Consumer::pop(self).ok()
    }
}

/// Latest parameter snapshot as seen by the audio thread.
///
/// The control side pushes whole snapshots; `sync` drains everything queued
/// and keeps the newest valid one, so a burst of knob moves costs one
/// comparison per block rather than one table per message.
pub struct LiveParams<R> {
    rx: R,
    current: Params,
}

impl<R: ParamsReceiver> LiveParams<R> {
    pub fn new(rx: R, initial: Params) -> Self {
        Self {
            rx,
            current: initial,
        }
    }

    /// Drain pending snapshots. Returns true if the current snapshot changed.
    pub fn sync(&mut self) -> bool {
        let mut changed = false;
        while let Some(params) = self.rx.pop() {
            if let Err(err) = params.validate() {
                warn!(%err, "ignoring invalid parameter snapshot");
                continue;
            }
            if params != self.current {
                self.current = params;
                changed = true;
            }
        }
        changed
    }

    #[inline]
    pub fn current(&self) -> &Params {
        &self.current
    }
}

/// Control-thread end of a parameter channel.
#[cfg(feature = "rtrb")]
pub struct ParamsHandle {
    tx: Producer<Params>,
}

#[cfg(feature = "rtrb")]
impl ParamsHandle {
    /// Queue a snapshot. Returns false when the queue is full and it was dropped.
    pub fn send(&mut self, params: Params) -> bool {
        self.tx.push(params).is_ok()
    }
}

pub const PARAMS_QUEUE_SIZE: usize = 64;

/// Lock-free channel carrying parameter snapshots into a realtime thread.
#[cfg(feature = "rtrb")]
pub fn params_channel(initial: Params) -> (ParamsHandle, LiveParams<Consumer<Params>>) {
    let (tx, rx) = RingBuffer::<Params>::new(PARAMS_QUEUE_SIZE);
    (ParamsHandle { tx }, LiveParams::new(rx, initial))
}
