use core::{
    cell::Cell,
    mem,
};

use alloc::{
    boxed::Box,
    collections::BTreeMap,
    vec::Vec,
};

use crate::{
    cancel::CancelSet,
    timer::Timer,
    Callback,
    Error,
    TimerId,
};

/// Number of levels.
const LEVELS: usize = 4;

/// Slots per level ring.
const SLOTS: [u64; LEVELS] = [256, 64, 64, 64];

/// Microseconds covered by one slot at each level. Each upper level's slot
/// spans a full turn of the level below.
const SPANS: [u64; LEVELS] = [1_000, 256_000, 16_384_000, 1_048_576_000];

/// Microseconds covered by a full turn at each level.
const TURNS: [u64; LEVELS] = [256_000, 16_384_000, 1_048_576_000, 67_108_864_000];

/// Counters and gauges describing a wheel's current population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelStats {
    /// Timers somewhere in the wheel, overflow, or pending store. Counts
    /// cancelled timers until they are retired, so it is an upper bound.
    pub live: usize,
    /// Timers waiting in the pending store.
    pub pending: usize,
    /// Timers parked beyond wheel coverage.
    pub overflow: usize,
    /// Cancelled identifiers not yet retired.
    pub cancelled: usize,
    /// Registrations accepted over the wheel's lifetime.
    pub scheduled: u64,
    /// Callback invocations over the wheel's lifetime.
    pub fired: u64,
    /// Adjusted time of the last advance.
    pub now_us: u64,
    /// Time represented by the cursor positions.
    pub cursor_us: u64,
}

/// Four cascading rings of timer slots plus overflow, pending, and
/// cancellation stores.
pub struct Wheel {
    /// `slots[level][index]` is an unordered bag of timers.
    slots: [Vec<Vec<Timer>>; LEVELS],
    /// Level-0 slots fully elapsed since the wheel started.
    ticks: u64,
    /// Adjusted time reached by the last advance.
    now_us: u64,
    pending: Vec<Timer>,
    overflow: BTreeMap<u64, Vec<Timer>>,
    cancels: CancelSet,
    next_id: TimerId,
    in_callback: bool,
    live: usize,
    scheduled: u64,
    fired: u64,
    /// `None` when stale; `Some(answer)` otherwise.
    cached_next: Cell<Option<Option<u64>>>,
    #[cfg(feature = "std")]
    origin: std::time::Instant,
}

impl Wheel {
    /// Create a wheel with its adjusted clock at zero.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|level| {
                (0..SLOTS[level]).map(|_| Vec::new()).collect()
            }),
            ticks: 0,
            now_us: 0,
            pending: Vec::new(),
            overflow: BTreeMap::new(),
            cancels: CancelSet::default(),
            next_id: 1,
            in_callback: false,
            live: 0,
            scheduled: 0,
            fired: 0,
            cached_next: Cell::new(Some(None)),
            #[cfg(feature = "std")]
            origin: std::time::Instant::now(),
        }
    }

    /// Register a timer firing `delay_us` from now, repeating every
    /// `interval_us` (zero for one-shot). Returns the timer's identifier.
    pub fn register<F>(
        &mut self,
        delay_us: u64,
        interval_us: u64,
        callback: F,
    ) -> Result<TimerId, Error>
    where
        F: FnMut(&mut Wheel, TimerId) -> bool + 'static,
    {
        let expires_us = self
            .now_us
            .checked_add(delay_us)
            .ok_or(Error::ExpirationOverflow)?;
        let id = self.next_id;
        self.next_id = self.next_id.checked_add(1).ok_or(Error::IdsExhausted)?;
        let timer = Timer {
            id,
            expires_us,
            interval_us,
            callback: Box::new(callback) as Callback,
        };
        self.live += 1;
        self.scheduled += 1;
        self.invalidate_peek();
        if self.in_callback || delay_us < SPANS[0] {
            // Mid-advance the cursors are not trustworthy; sub-slot delays
            // have no slot of their own. Both wait in pending.
            self.pending.push(timer);
        } else {
            self.place(timer);
        }
        tracing::trace!(id, delay_us, interval_us, "registered timer");
        Ok(id)
    }

    /// Mark a timer for cancellation. The record is retired when the wheel
    /// next encounters it; a timer cancelled before its expiration never
    /// fires. Harmless to repeat.
    pub fn unregister(&mut self, id: TimerId) -> Result<(), Error> {
        if id == 0 || id >= self.next_id {
            return Err(Error::UnknownTimer(id));
        }
        self.cancels.insert(id);
        self.invalidate_peek();
        Ok(())
    }

    /// Advance the adjusted clock to `now_us`, firing everything due.
    /// Returns the number of callbacks invoked. A `now_us` at or before the
    /// current time only drains the pending store.
    pub fn advance(&mut self, now_us: u64) -> Result<usize, Error> {
        if self.in_callback {
            return Err(Error::ReentrantAdvance);
        }
        let now_us = now_us.max(self.now_us);
        // Publish the adjusted time up front so re-entrant registrations
        // anchor their expirations at the time being advanced to.
        self.now_us = now_us;
        let fired_before = self.fired;
        let target_ticks = now_us / SPANS[0];
        while self.ticks < target_ticks {
            self.drain_overflow();
            self.stride(target_ticks);
            if self.ticks >= target_ticks {
                break;
            }
            let index = (self.ticks % SLOTS[0]) as usize;
            let bucket = mem::take(&mut self.slots[0][index]);
            let slot_end_us = (self.ticks + 1) * SPANS[0];
            for timer in bucket {
                if timer.expires_us <= now_us {
                    self.fire(timer, slot_end_us);
                } else {
                    self.rehome(timer);
                }
            }
            self.ticks += 1;
            self.cascade_if_wrapped();
        }
        self.drain_pending();
        self.invalidate_peek();
        Ok((self.fired - fired_before) as usize)
    }

    /// Advance the adjusted clock by `delta_us`.
    pub fn advance_by(&mut self, delta_us: u64) -> Result<usize, Error> {
        self.advance(self.now_us.saturating_add(delta_us))
    }

    /// Read the monotonic clock, derive the adjusted time, and advance.
    #[cfg(feature = "std")]
    pub fn poll(&mut self) -> Result<usize, Error> {
        let elapsed = self.origin.elapsed().as_micros();
        self.advance(elapsed.min(u128::from(u64::MAX)) as u64)
    }

    /// Earliest absolute expiration among all stored timers, cached until a
    /// registration, cancellation, or advance invalidates it.
    pub fn peek_next(&self) -> Option<u64> {
        if let Some(answer) = self.cached_next.get() {
            return answer;
        }
        let answer = self.compute_next();
        self.cached_next.set(Some(answer));
        answer
    }

    /// Microseconds from now until the earliest expiration.
    pub fn peek_delay(&self) -> Option<u64> {
        self.peek_next()
            .map(|expires| expires.saturating_sub(self.now_us))
    }

    /// Drop every stored timer without firing anything.
    pub fn stop_all(&mut self) {
        for level in self.slots.iter_mut() {
            for slot in level.iter_mut() {
                slot.clear();
            }
        }
        self.pending.clear();
        self.overflow.clear();
        self.cancels.clear();
        self.live = 0;
        self.invalidate_peek();
        tracing::trace!("dropped all timers");
    }

    /// Approximate count of live timers. Cancelled timers count until
    /// retired.
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when no timers are stored.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Adjusted time reached by the last advance.
    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    /// Population snapshot.
    pub fn stats(&self) -> WheelStats {
        WheelStats {
            live: self.live,
            pending: self.pending.len(),
            overflow: self.overflow.values().map(Vec::len).sum(),
            cancelled: self.cancels.len(),
            scheduled: self.scheduled,
            fired: self.fired,
            now_us: self.now_us,
            cursor_us: self.ticks * SPANS[0],
        }
    }

    fn invalidate_peek(&self) {
        self.cached_next.set(None);
    }

    /// Home a timer into the ring that covers it, or overflow/pending.
    /// Assumes the caller already filtered cancelled timers where needed.
    fn place(&mut self, timer: Timer) {
        let wheel_us = self.ticks * SPANS[0];
        // Anything at or before the current slot's window has no future
        // slot to live in; it belongs to the pending store.
        if timer.expires_us < wheel_us + SPANS[0] {
            self.pending.push(timer);
            return;
        }
        let delay = timer.expires_us - wheel_us;
        for level in 0..LEVELS {
            if delay < TURNS[level] {
                let index = ((timer.expires_us / SPANS[level]) % SLOTS[level]) as usize;
                self.slots[level][index].push(timer);
                return;
            }
        }
        self.overflow
            .entry(timer.expires_us)
            .or_default()
            .push(timer);
    }

    /// Re-home a timer encountered during a scan, retiring it if cancelled.
    fn rehome(&mut self, timer: Timer) {
        if self.cancels.remove(timer.id) {
            self.live = self.live.saturating_sub(1);
            return;
        }
        self.place(timer);
    }

    /// Move overflow entries that now fall within wheel coverage.
    fn drain_overflow(&mut self) {
        let wheel_us = self.ticks * SPANS[0];
        let horizon = wheel_us.saturating_add(TURNS[LEVELS - 1]);
        let mut moved = 0usize;
        loop {
            match self.overflow.first_key_value() {
                Some((&expires, _)) if expires < horizon => {}
                _ => break,
            }
            let Some((_, bucket)) = self.overflow.pop_first() else {
                break;
            };
            moved += bucket.len();
            for timer in bucket {
                self.rehome(timer);
            }
        }
        if moved > 0 {
            tracing::trace!(moved, "overflow entries re-homed into the wheel");
        }
    }

    /// Jump the cursor across empty level-0 slots, stopping at the next
    /// non-empty slot, the next wrap (which must cascade), or the target.
    fn stride(&mut self, target_ticks: u64) {
        let index = (self.ticks % SLOTS[0]) as usize;
        let revolution_base = self.ticks - index as u64;
        let mut jump = revolution_base + SLOTS[0];
        for at in index..SLOTS[0] as usize {
            if !self.slots[0][at].is_empty() {
                jump = revolution_base + at as u64;
                break;
            }
        }
        let jump = jump.min(target_ticks);
        if jump > self.ticks {
            self.ticks = jump;
            self.cascade_if_wrapped();
        }
    }

    /// After the level-0 cursor wraps, advance each wrapped upper ring by a
    /// slot and re-home that slot's timers downward.
    fn cascade_if_wrapped(&mut self) {
        let mut steps = self.ticks;
        for level in 1..LEVELS {
            if steps % SLOTS[level - 1] != 0 {
                break;
            }
            steps /= SLOTS[level - 1];
            let index = (steps % SLOTS[level]) as usize;
            let bucket = mem::take(&mut self.slots[level][index]);
            for timer in bucket {
                self.rehome(timer);
            }
        }
    }

    /// Fire one timer: retire it if cancelled, otherwise run the callback
    /// and reschedule repeats anchored at `anchor_us`.
    fn fire(&mut self, mut timer: Timer, anchor_us: u64) {
        if self.cancels.remove(timer.id) {
            self.live = self.live.saturating_sub(1);
            return;
        }
        self.in_callback = true;
        let reschedule = (timer.callback)(self, timer.id);
        self.in_callback = false;
        self.fired += 1;
        if reschedule && timer.interval_us > 0 {
            if let Some(next) = anchor_us.checked_add(timer.interval_us) {
                timer.expires_us = next;
                self.place(timer);
                return;
            }
        }
        self.live = self.live.saturating_sub(1);
    }

    /// Swap out the pending store and fire or re-home its timers. Timers
    /// deposited during the drain land in the fresh store for next time.
    fn drain_pending(&mut self) {
        let now_us = self.now_us;
        let batch = mem::take(&mut self.pending);
        for timer in batch {
            if self.cancels.remove(timer.id) {
                self.live = self.live.saturating_sub(1);
                continue;
            }
            if timer.expires_us <= now_us {
                self.fire(timer, now_us);
            } else {
                self.place(timer);
            }
        }
    }

    /// Uncached scan for the earliest expiration: pending first, then the
    /// level-0 ring forward from the cursor, then the upper rings, then
    /// overflow.
    fn compute_next(&self) -> Option<u64> {
        let mut best: Option<u64> = None;
        let mut consider = |expires: u64| {
            if best.map_or(true, |b| expires < b) {
                best = Some(expires);
            }
        };
        for timer in &self.pending {
            if !self.cancels.contains(timer.id) {
                consider(timer.expires_us);
            }
        }
        let wheel_candidate = self.earliest_in_rings();
        if let Some(expires) = wheel_candidate {
            consider(expires);
        } else if let Some(expires) = self.earliest_in_overflow() {
            consider(expires);
        }
        best
    }

    fn earliest_in_rings(&self) -> Option<u64> {
        let cursor = (self.ticks % SLOTS[0]) as usize;
        for offset in 0..SLOTS[0] as usize {
            let index = (cursor + offset) % SLOTS[0] as usize;
            if let Some(expires) = self.slot_min(&self.slots[0][index]) {
                return Some(expires);
            }
        }
        for level in 1..LEVELS {
            let earliest = self.slots[level]
                .iter()
                .filter_map(|slot| self.slot_min(slot))
                .min();
            if earliest.is_some() {
                return earliest;
            }
        }
        None
    }

    fn earliest_in_overflow(&self) -> Option<u64> {
        self.overflow
            .iter()
            .flat_map(|(_, bucket)| bucket.iter())
            .find(|timer| !self.cancels.contains(timer.id))
            .map(|timer| timer.expires_us)
    }

    fn slot_min(&self, slot: &[Timer]) -> Option<u64> {
        slot.iter()
            .filter(|timer| !self.cancels.contains(timer.id))
            .map(|timer| timer.expires_us)
            .min()
    }
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Wheel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Wheel")
            .field("now_us", &self.now_us)
            .field("ticks", &self.ticks)
            .field("live", &self.live)
            .field("pending", &self.pending.len())
            .field("overflow", &self.overflow.len())
            .field("cancelled", &self.cancels.len())
            .finish_non_exhaustive()
    }
}
