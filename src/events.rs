//! The process-wide event bus.
//!
//! All coordination in the firmware happens through one bounded FIFO of
//! [`Event`]s. Timer callbacks, the button ISR, and network adapters are
//! producers; the supervisor loop is the single consumer, which blocks in
//! [`EventBus::receive`] and runs one handler to completion per event.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐          ┌──────────────┐
//! │ Button ISR  │────▶│ lock-free ring   │─┐        │              │
//! │             │     └──────────────────┘ ├───────▶│  Supervisor  │
//! │ Timer task  │────▶┌──────────────────┐ │ receive│  (consumer)  │
//! │ Net adapter │────▶│ mutex + condvar  │─┘        │              │
//! └─────────────┘     │ FIFO (cap 128)   │          └──────────────┘
//!                     └──────────────────┘
//! ```
//!
//! Producers never block: a full queue drops the event (and logs), since the
//! queue is sized well above the worst observed depth. Interrupt context
//! cannot take the mutex, so ISRs post through a separate lock-free ring of
//! bare event codes which the consumer drains ahead of the main queue.
//!
//! Ordering: a single producer's events arrive in program order; across
//! producers, FIFO by enqueue time. The bus never re-queues an event on its
//! own; re-posting is handler policy.

use core::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Condvar, Mutex};

use heapless::Deque;
use log::warn;

use crate::provision::WebRequest;
use crate::sensor::SensorSnapshot;

/// Capacity of the main event queue.
pub const EVENT_QUEUE_CAP: usize = 128;

/// Capacity of the interrupt-side ring. Power of 2 for cheap modulo.
const ISR_RING_CAP: usize = 32;

// ---------------------------------------------------------------------------
// Event codes
// ---------------------------------------------------------------------------

/// Discriminants for every event the firmware posts.
///
/// The first group drives the supervisor's own state machine; the rest are
/// ticks and notifications routed to the owning component. Codes posted from
/// interrupt context must fit in a `u8` (see [`EventBus::post_from_isr`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventCode {
    // Supervisor state machine.
    StartCycle = 0,
    CommStart = 1,
    CommWifiRetry = 2,
    CommWifiFailed = 3,
    CommWifiUp = 4,
    CommActivity = 5,
    CommActivityExpired = 6,
    PostComm = 7,
    SleepStart = 8,
    PostSleep = 9,
    MonitorStart = 10,
    MonitorStop = 11,

    // Notifications handled by the supervisor orthogonally to its states.
    MonitorData = 20,
    ButtonPress = 21,
    ButtonLongPress = 22,
    EnableDevice = 23,
    DisableDevice = 24,
    SetCaptureInterval = 25,

    // Monitoring pipeline ticks; scalar payload selects the sub-step.
    MonitorWork = 30,

    // Communication ticks.
    CommBrokerWork = 40,
    CommTimeWork = 41,

    // Display / slideshow.
    Message = 50,
    SlideshowStart = 51,
    SlideshowReset = 52,
    SlideshowStop = 53,
    SlideshowWork = 54,

    // Raw button edges from the ISR, and the hold timer.
    ButtonDown = 60,
    ButtonUp = 61,
    ButtonHoldExpired = 62,

    // Provisioning web server.
    WebRequest = 70,
    WebRequestFailed = 71,
}

impl EventCode {
    fn from_u8(raw: u8) -> Option<Self> {
        // Only the codes posted from interrupt context need decoding here.
        match raw {
            60 => Some(Self::ButtonDown),
            61 => Some(Self::ButtonUp),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// What rides along with an event code.
///
/// Owned variants transfer ownership to the receiving handler, which drops
/// the value exactly once (Rust makes the "exactly once" part free).
#[derive(Debug)]
pub enum Payload {
    None,
    /// Small scalar, e.g. a monitoring sub-step or an interval in seconds.
    Scalar(u32),
    /// A finished observation, handed from the monitor to the supervisor.
    Snapshot(Box<SensorSnapshot>),
    /// A transient display message.
    Text(String),
    /// A provisioning HTTP request awaiting a reply.
    Web(Box<WebRequest>),
}

/// One queued event.
#[derive(Debug)]
pub struct Event {
    pub code: EventCode,
    pub payload: Payload,
}

impl Event {
    pub fn new(code: EventCode) -> Self {
        Self { code, payload: Payload::None }
    }

    pub fn scalar(code: EventCode, value: u32) -> Self {
        Self { code, payload: Payload::Scalar(value) }
    }
}

// ---------------------------------------------------------------------------
// Interrupt-side ring
// ---------------------------------------------------------------------------

// SPSC ring of bare codes. The ISR is the sole producer, the supervisor loop
// the sole consumer. AtomicU8 slots keep this free of unsafe.
struct IsrRing {
    head: AtomicU8,
    tail: AtomicU8,
    slots: [AtomicU8; ISR_RING_CAP],
}

impl IsrRing {
    const fn new() -> Self {
        Self {
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            slots: [const { AtomicU8::new(0) }; ISR_RING_CAP],
        }
    }

    fn push(&self, raw: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next = (head + 1) % ISR_RING_CAP as u8;
        if next == tail {
            return false; // Ring full, edge dropped.
        }
        self.slots[head as usize].store(raw, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        true
    }

    fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if tail == head {
            return None;
        }
        let raw = self.slots[tail as usize].load(Ordering::Relaxed);
        self.tail.store((tail + 1) % ISR_RING_CAP as u8, Ordering::Release);
        Some(raw)
    }
}

// ---------------------------------------------------------------------------
// The bus
// ---------------------------------------------------------------------------

/// The process-wide event queue.
///
/// Created once at boot; timers and adapters capture a reference to it and
/// only ever post. The supervisor loop is the only caller of `receive`.
pub struct EventBus {
    queue: Mutex<Deque<Event, EVENT_QUEUE_CAP>>,
    ready: Condvar,
    isr_ring: IsrRing,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self { queue: Mutex::new(Deque::new()), ready: Condvar::new(), isr_ring: IsrRing::new() }
    }

    /// Post a bare event. Never blocks; drops (with a log) when full.
    pub fn post(&self, code: EventCode) {
        self.push(Event::new(code));
    }

    /// Post an event with a scalar payload.
    pub fn post_scalar(&self, code: EventCode, value: u32) {
        self.push(Event::scalar(code, value));
    }

    /// Post an event with an owned payload.
    pub fn post_owned(&self, code: EventCode, payload: Payload) {
        self.push(Event { code, payload });
    }

    /// Post from interrupt context. Lock-free; only payload-less codes.
    ///
    /// The consumer drains these ahead of the mutex-protected queue, so an
    /// ISR edge is never starved by queued work.
    pub fn post_from_isr(&self, code: EventCode) {
        let _ = self.isr_ring.push(code as u8);
    }

    fn push(&self, ev: Event) {
        let mut q = self.queue.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(ev) = q.push_back(ev) {
            warn!("event queue full, dropping {:?}", ev.code);
            return;
        }
        drop(q);
        self.ready.notify_one();
    }

    /// Block until an event is available and return it.
    ///
    /// Single-consumer: only the supervisor loop calls this. The wait wakes
    /// periodically to drain the interrupt ring, whose producer cannot
    /// signal the condvar.
    pub fn receive(&self) -> Event {
        loop {
            if let Some(raw) = self.isr_ring.pop() {
                if let Some(code) = EventCode::from_u8(raw) {
                    return Event::new(code);
                }
                continue; // Unknown raw byte: skip, keep draining.
            }
            let q = self.queue.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            let (mut q, _timeout) = self
                .ready
                .wait_timeout_while(q, std::time::Duration::from_millis(10), |q| q.is_empty())
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(ev) = q.pop_front() {
                return ev;
            }
        }
    }

    /// Non-blocking receive, for loops that interleave other work.
    pub fn try_receive(&self) -> Option<Event> {
        if let Some(raw) = self.isr_ring.pop() {
            if let Some(code) = EventCode::from_u8(raw) {
                return Some(Event::new(code));
            }
        }
        let mut q = self.queue.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        q.pop_front()
    }

    /// Number of queued events (main queue only).
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
