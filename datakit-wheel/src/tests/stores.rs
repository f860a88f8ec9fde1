use crate::{
    tests::{
        fire_log,
        register_logged,
        HOUR,
        MS,
    },
    Wheel,
};

#[test]
fn each_timer_lives_in_exactly_one_store() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    register_logged(&mut wheel, 0, &log); // pending
    register_logged(&mut wheel, 400, &log); // pending (sub-slot)
    register_logged(&mut wheel, 5 * MS, &log); // level 0
    register_logged(&mut wheel, 1_000 * MS, &log); // level 1
    register_logged(&mut wheel, 30 * 60 * 1_000 * MS, &log); // level 3
    register_logged(&mut wheel, 20 * HOUR, &log); // overflow

    let stats = wheel.stats();
    assert_eq!(stats.live, 6);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.overflow, 1);
    assert_eq!(stats.scheduled, 6);
    assert_eq!(stats.fired, 0);
}

#[test]
fn counters_survive_a_full_drain() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    for delay in [0, 400, 5 * MS, 1_000 * MS, 20 * HOUR] {
        register_logged(&mut wheel, delay, &log);
    }
    let fired = wheel.advance(21 * HOUR).unwrap();
    assert_eq!(fired, 5);

    let stats = wheel.stats();
    assert_eq!(stats.live, 0);
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.overflow, 0);
    assert_eq!(stats.scheduled, 5);
    assert_eq!(stats.fired, 5);
    assert_eq!(stats.now_us, 21 * HOUR);
    assert_eq!(log.borrow().len(), 5);
}

#[test]
fn cursor_time_tracks_whole_slots() {
    let mut wheel = Wheel::new();
    wheel.advance(2_500).unwrap();
    let stats = wheel.stats();
    assert_eq!(stats.now_us, 2_500);
    assert_eq!(stats.cursor_us, 2_000, "cursor moves in whole slots");
}

#[test]
fn advance_never_runs_backwards() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    register_logged(&mut wheel, 10 * MS, &log);
    wheel.advance(50 * MS).unwrap();
    assert_eq!(log.borrow().len(), 1);

    // An older timestamp is clamped; nothing regresses or double-fires.
    wheel.advance(20 * MS).unwrap();
    let stats = wheel.stats();
    assert_eq!(stats.now_us, 50 * MS);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn cascades_preserve_sub_slot_expirations() {
    let mut wheel = Wheel::new();
    let log = fire_log();
    // 400.5 ms: homed at level 1, cascaded into level 0 at the 256 ms wrap.
    register_logged(&mut wheel, 400 * MS + 500, &log);

    assert_eq!(wheel.advance(400 * MS).unwrap(), 0, "not due yet");
    assert_eq!(wheel.advance(402 * MS).unwrap(), 1);
}

#[test]
fn polling_the_real_clock_advances_monotonically() {
    let mut wheel = Wheel::new();
    let fired = wheel.poll().unwrap();
    assert_eq!(fired, 0);
    let first = wheel.now_us();
    let _ = wheel.poll().unwrap();
    assert!(wheel.now_us() >= first);
}
