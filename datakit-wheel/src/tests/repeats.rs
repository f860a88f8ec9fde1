use std::{
    cell::Cell,
    rc::Rc,
};

use crate::{
    tests::MS,
    Wheel,
};

fn counter() -> Rc<Cell<u64>> {
    Rc::new(Cell::new(0))
}

fn register_repeating(wheel: &mut Wheel, delay_us: u64, interval_us: u64, count: &Rc<Cell<u64>>) {
    let count = Rc::clone(count);
    wheel
        .register(delay_us, interval_us, move |_, _| {
            count.set(count.get() + 1);
            true
        })
        .unwrap();
}

#[test]
fn repeating_timer_fires_once_per_interval_slot() {
    let mut wheel = Wheel::new();
    let fired = counter();
    register_repeating(&mut wheel, 10 * MS, 10 * MS, &fired);

    assert_eq!(wheel.advance(55 * MS).unwrap(), 5);
    assert_eq!(fired.get(), 5);
}

#[test]
fn long_gap_does_not_burst() {
    let mut wheel = Wheel::new();
    let fired = counter();
    register_repeating(&mut wheel, 10 * MS, 10 * MS, &fired);

    // One large advance: fires are slot-anchored, so the timer re-enters
    // the wheel once per interval-plus-slot step instead of replaying every
    // missed expiration at once.
    wheel.advance(1_000 * MS).unwrap();
    assert_eq!(fired.get(), 90);

    // Still alive and still pacing afterward.
    let before = fired.get();
    wheel.advance(1_110 * MS).unwrap();
    assert_eq!(fired.get(), before + 10);
}

#[test]
fn repeat_stops_when_the_callback_declines() {
    let mut wheel = Wheel::new();
    let fired = counter();
    let count = Rc::clone(&fired);
    wheel
        .register(5 * MS, 5 * MS, move |_, _| {
            count.set(count.get() + 1);
            count.get() < 3
        })
        .unwrap();

    assert_eq!(wheel.advance(1_000 * MS).unwrap(), 3);
    assert_eq!(fired.get(), 3);
    assert!(wheel.is_empty());
}

#[test]
fn one_shot_interval_zero_ignores_reschedule_requests() {
    let mut wheel = Wheel::new();
    let fired = counter();
    // Returns true, but interval 0 means one-shot.
    register_repeating(&mut wheel, 5 * MS, 0, &fired);

    assert_eq!(wheel.advance(500 * MS).unwrap(), 1);
    assert!(wheel.is_empty());
}

#[test]
fn pending_fires_anchor_repeats_at_now() {
    let mut wheel = Wheel::new();
    let fired = counter();
    // Zero delay: first fire comes from the pending store.
    register_repeating(&mut wheel, 0, 7 * MS, &fired);

    assert_eq!(wheel.advance(3 * MS).unwrap(), 1);
    // Rescheduled at now + 7 ms = 10 ms.
    assert_eq!(wheel.peek_next(), Some(10 * MS));

    assert_eq!(wheel.advance(11 * MS).unwrap(), 1);
    assert_eq!(fired.get(), 2);
}

#[test]
fn cancelling_a_repeating_timer_silences_it() {
    let mut wheel = Wheel::new();
    let fired = counter();
    let count = Rc::clone(&fired);
    let id = wheel
        .register(10 * MS, 10 * MS, move |_, _| {
            count.set(count.get() + 1);
            true
        })
        .unwrap();

    assert_eq!(wheel.advance(25 * MS).unwrap(), 2);
    wheel.unregister(id).unwrap();
    assert_eq!(wheel.advance(500 * MS).unwrap(), 0);
    assert_eq!(fired.get(), 2);
    assert!(wheel.is_empty());
}

#[test]
fn a_repeating_callback_can_cancel_itself() {
    let mut wheel = Wheel::new();
    let fired = counter();
    let count = Rc::clone(&fired);
    wheel
        .register(10 * MS, 10 * MS, move |wheel, id| {
            count.set(count.get() + 1);
            wheel.unregister(id).unwrap();
            // Asking for a reschedule anyway; the cancellation wins.
            true
        })
        .unwrap();

    assert_eq!(wheel.advance(500 * MS).unwrap(), 1);
    assert_eq!(fired.get(), 1);
    assert!(wheel.is_empty());
}
