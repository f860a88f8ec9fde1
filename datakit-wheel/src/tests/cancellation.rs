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
fn a_cancelled_timer_never_fires() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    let id = register_logged(&mut wheel, 50 * MS, &log);
    let keeper = register_logged(&mut wheel, 60 * MS, &log);

    wheel.unregister(id).unwrap();
    assert_eq!(wheel.advance(200 * MS).unwrap(), 1);
    assert_eq!(*log.borrow(), [keeper]);
    assert!(wheel.is_empty());
    assert_eq!(wheel.stats().cancelled, 0, "identifier was retired");
}

#[test]
fn cancellation_is_idempotent() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    let id = register_logged(&mut wheel, 50 * MS, &log);
    wheel.unregister(id).unwrap();
    wheel.unregister(id).unwrap();
    wheel.unregister(id).unwrap();
    assert_eq!(wheel.advance(100 * MS).unwrap(), 0);
    assert!(log.borrow().is_empty());
}

#[test]
fn impossible_identifiers_are_rejected() {
    let mut wheel = Wheel::new();
    assert_eq!(wheel.unregister(0), Err(Error::UnknownTimer(0)));
    assert_eq!(wheel.unregister(1), Err(Error::UnknownTimer(1)));

    let log = fire_log();
    let id = register_logged(&mut wheel, 50 * MS, &log);
    assert_eq!(wheel.unregister(id + 1), Err(Error::UnknownTimer(id + 1)));
    wheel.unregister(id).unwrap();
}

#[test]
fn cancelling_pending_and_overflow_timers_works() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    let near = register_logged(&mut wheel, 0, &log);
    let far = register_logged(&mut wheel, 20 * HOUR, &log);
    wheel.unregister(near).unwrap();
    wheel.unregister(far).unwrap();

    assert_eq!(wheel.advance(21 * HOUR).unwrap(), 0);
    assert!(log.borrow().is_empty());
    assert!(wheel.is_empty());
}

#[test]
fn cancel_after_fire_is_harmless() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    let id = register_logged(&mut wheel, 5 * MS, &log);
    assert_eq!(wheel.advance(10 * MS).unwrap(), 1);

    // The identifier was issued, so the mark is accepted; nothing is left
    // to retire it against.
    wheel.unregister(id).unwrap();
    assert_eq!(wheel.advance(20 * MS).unwrap(), 0);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn callbacks_can_cancel_other_timers() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    let victim = register_logged(&mut wheel, 50 * MS, &log);
    wheel
        .register(10 * MS, 0, move |wheel, _| {
            wheel.unregister(victim).unwrap();
            false
        })
        .unwrap();

    assert_eq!(wheel.advance(200 * MS).unwrap(), 1);
    assert!(log.borrow().is_empty(), "victim fired anyway");
}
