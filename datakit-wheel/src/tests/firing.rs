use std::{
    cell::Cell,
    rc::Rc,
};

use crate::{
    tests::{
        fire_log,
        register_logged,
        HOUR,
        MS,
    },
    Error,
    Wheel,
};

#[test]
fn one_shot_fires_exactly_once_at_the_right_advance() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    register_logged(&mut wheel, 500 * MS, &log);

    assert_eq!(wheel.advance(400 * MS).unwrap(), 0);
    assert!(log.borrow().is_empty());

    assert_eq!(wheel.advance(600 * MS).unwrap(), 1);
    assert_eq!(log.borrow().len(), 1);

    assert_eq!(wheel.advance(5_000 * MS).unwrap(), 0);
    assert_eq!(log.borrow().len(), 1);
    assert!(wheel.is_empty());
}

#[test]
fn identifiers_are_monotone_from_one() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    let first = register_logged(&mut wheel, 10 * MS, &log);
    let second = register_logged(&mut wheel, 20 * MS, &log);
    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

#[test]
fn callbacks_fire_in_expiration_order() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    // Registration order deliberately scrambled across levels.
    let late = register_logged(&mut wheel, 700 * MS, &log);
    let early = register_logged(&mut wheel, 2 * MS, &log);
    let mid = register_logged(&mut wheel, 90 * MS, &log);
    let upper = register_logged(&mut wheel, 20_000 * MS, &log);

    assert_eq!(wheel.advance(30_000 * MS).unwrap(), 4);
    assert_eq!(*log.borrow(), [early, mid, late, upper]);
}

#[test]
fn zero_delay_waits_in_pending_and_fires_on_the_next_advance() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    register_logged(&mut wheel, 0, &log);
    assert_eq!(wheel.stats().pending, 1);

    assert_eq!(wheel.advance(0).unwrap(), 1);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn sub_slot_delay_fires_promptly() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    register_logged(&mut wheel, 300, &log);
    assert_eq!(wheel.stats().pending, 1);

    // Not due yet: the pending store holds it without firing.
    assert_eq!(wheel.advance(200).unwrap(), 0);
    assert_eq!(wheel.advance(350).unwrap(), 1);
}

#[test]
fn far_future_timers_wait_in_overflow() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    // Twenty hours is beyond the wheels' ~18.6 h coverage.
    register_logged(&mut wheel, 20 * HOUR, &log);
    assert_eq!(wheel.stats().overflow, 1);

    assert_eq!(wheel.advance(19 * HOUR).unwrap(), 0);
    assert_eq!(wheel.stats().overflow, 0, "re-homed into the wheels");

    assert_eq!(wheel.advance(21 * HOUR).unwrap(), 1);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn callbacks_may_register_but_not_advance() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    let inner_log = Rc::clone(&log);
    let reentry_error = Rc::new(Cell::new(None));
    let seen = Rc::clone(&reentry_error);
    wheel
        .register(5 * MS, 0, move |wheel, _| {
            seen.set(wheel.advance(1).err());
            let log = Rc::clone(&inner_log);
            wheel
                .register(10 * MS, 0, move |_, id| {
                    log.borrow_mut().push(id);
                    false
                })
                .unwrap();
            false
        })
        .unwrap();

    assert_eq!(wheel.advance(6 * MS).unwrap(), 1);
    assert_eq!(reentry_error.get(), Some(Error::ReentrantAdvance));
    assert_eq!(wheel.len(), 1, "nested registration survived the advance");

    assert_eq!(wheel.advance(20 * MS).unwrap(), 1);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn peek_tracks_the_earliest_timer() {
    let mut wheel = Wheel::new();
    assert_eq!(wheel.peek_next(), None);

    let log = fire_log();
    register_logged(&mut wheel, 700 * MS, &log);
    assert_eq!(wheel.peek_next(), Some(700 * MS));

    register_logged(&mut wheel, 40 * MS, &log);
    assert_eq!(wheel.peek_next(), Some(40 * MS));
    assert_eq!(wheel.peek_delay(), Some(40 * MS));

    wheel.advance(100 * MS).unwrap();
    assert_eq!(wheel.peek_next(), Some(700 * MS));
    assert_eq!(wheel.peek_delay(), Some(600 * MS));

    let far = register_logged(&mut wheel, 30 * HOUR, &log);
    assert_eq!(wheel.peek_next(), Some(700 * MS));
    wheel.advance(800 * MS).unwrap();
    assert_eq!(wheel.peek_next(), Some(30 * HOUR + 100 * MS));
    wheel.unregister(far).unwrap();
    assert_eq!(wheel.peek_next(), None);
}

#[test]
fn stop_all_drops_without_firing() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    register_logged(&mut wheel, 5 * MS, &log);
    register_logged(&mut wheel, 0, &log);
    register_logged(&mut wheel, 24 * HOUR, &log);
    assert_eq!(wheel.len(), 3);

    wheel.stop_all();
    assert!(wheel.is_empty());
    assert_eq!(wheel.peek_next(), None);
    assert_eq!(wheel.advance(48 * HOUR).unwrap(), 0);
    assert!(log.borrow().is_empty());
}

#[test]
fn drop_fires_nothing() {
    let log = fire_log();
    {
        let mut wheel = Wheel::new();
        register_logged(&mut wheel, MS, &log);
        register_logged(&mut wheel, 0, &log);
    }
    assert!(log.borrow().is_empty());
}

#[test]
fn expiration_overflow_is_rejected() {
    let mut wheel = Wheel::new();
    wheel.advance(10 * MS).unwrap();
    let err = wheel.register(u64::MAX, 0, |_, _| false).unwrap_err();
    assert_eq!(err, Error::ExpirationOverflow);
    assert!(wheel.is_empty());
}
