//! Timing-wheel suites.

use std::{
    cell::{
        Cell,
        RefCell,
    },
    rc::Rc,
};

use datakit_wheel::{
    Error,
    TimerId,
    Wheel,
};

use crate::harness::Checks;

const MS: u64 = 1_000;
const HOUR: u64 = 3_600_000_000;

fn logged(wheel: &mut Wheel, delay_us: u64, log: &Rc<RefCell<Vec<TimerId>>>) -> TimerId {
    let log = Rc::clone(log);
    wheel
        .register(delay_us, 0, move |_, id| {
            log.borrow_mut().push(id);
            false
        })
        .expect("registration")
}

pub fn oneshot(checks: &mut Checks) {
    let mut wheel = Wheel::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    logged(&mut wheel, 500 * MS, &log);

    checks.eq(wheel.advance(400 * MS).unwrap(), 0, "early advance fires nothing");
    checks.eq(wheel.advance(600 * MS).unwrap(), 1, "due advance fires once");
    checks.eq(wheel.advance(10_000 * MS).unwrap(), 0, "no double fire");
    checks.check(wheel.is_empty(), "wheel drains");

    // Expiration order across levels, scrambled registration order.
    let mut wheel = Wheel::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let c = logged(&mut wheel, 700 * MS, &log);
    let a = logged(&mut wheel, 2 * MS, &log);
    let d = logged(&mut wheel, 20_000 * MS, &log);
    let b = logged(&mut wheel, 90 * MS, &log);
    wheel.advance(30_000 * MS).unwrap();
    checks.eq(log.borrow().clone(), vec![a, b, c, d], "expiration order");

    checks.eq(
        wheel.peek_next(),
        None,
        "peek on an empty wheel",
    );
}

pub fn repeat(checks: &mut Checks) {
    let mut wheel = Wheel::new();
    let fired = Rc::new(Cell::new(0u64));
    let count = Rc::clone(&fired);
    wheel
        .register(10 * MS, 10 * MS, move |_, _| {
            count.set(count.get() + 1);
            true
        })
        .expect("registration");

    checks.eq(wheel.advance(55 * MS).unwrap(), 5, "five fires across 55 ms");
    checks.eq(fired.get(), 5, "callback count agrees");

    // A long gap paces instead of bursting.
    let before = fired.get();
    wheel.advance(1_055 * MS).unwrap();
    let fired_in_gap = fired.get() - before;
    checks.check(
        fired_in_gap <= 1_000 / 10,
        "slot anchoring prevents catch-up storms",
    );
    checks.check(fired_in_gap >= 80, "repeats keep pacing through the gap");
}

pub fn cancel(checks: &mut Checks) {
    let mut wheel = Wheel::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let doomed = logged(&mut wheel, 50 * MS, &log);
    let survivor = logged(&mut wheel, 60 * MS, &log);

    checks.check(wheel.unregister(doomed).is_ok(), "cancel accepted");
    checks.check(wheel.unregister(doomed).is_ok(), "cancel is idempotent");
    checks.eq(
        wheel.unregister(0).unwrap_err(),
        Error::UnknownTimer(0),
        "zero is reserved",
    );
    checks.eq(
        wheel.unregister(999).unwrap_err(),
        Error::UnknownTimer(999),
        "unissued identifiers are rejected",
    );

    checks.eq(wheel.advance(100 * MS).unwrap(), 1, "only the survivor fires");
    checks.eq(log.borrow().clone(), vec![survivor], "victim never fired");
    checks.check(wheel.is_empty(), "cancelled timer was retired");
}

pub fn stores(checks: &mut Checks) {
    let mut wheel = Wheel::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    logged(&mut wheel, 0, &log);
    logged(&mut wheel, 500, &log);
    logged(&mut wheel, 5 * MS, &log);
    logged(&mut wheel, 1_000 * MS, &log);
    logged(&mut wheel, 20 * HOUR, &log);

    let stats = wheel.stats();
    checks.eq(stats.live, 5, "live count");
    checks.eq(stats.pending, 2, "zero and sub-slot delays pend");
    checks.eq(stats.overflow, 1, "past-coverage timer overflows");

    checks.eq(wheel.advance(21 * HOUR).unwrap(), 5, "everything fires once");
    let stats = wheel.stats();
    checks.eq(stats.live, 0, "drained");
    checks.eq(stats.fired, 5, "fired counter");
    checks.eq(stats.scheduled, 5, "scheduled counter");

    // Re-entrant registration lands in pending and is never lost.
    let mut wheel = Wheel::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let inner = Rc::clone(&log);
    wheel
        .register(5 * MS, 0, move |wheel, _| {
            let log = Rc::clone(&inner);
            wheel
                .register(10 * MS, 0, move |_, id| {
                    log.borrow_mut().push(id);
                    false
                })
                .expect("nested registration");
            false
        })
        .expect("registration");
    checks.eq(wheel.advance(6 * MS).unwrap(), 1, "outer fires");
    checks.eq(wheel.advance(30 * MS).unwrap(), 1, "nested timer fires");
    checks.eq(log.borrow().len(), 1, "nested callback ran once");
}
