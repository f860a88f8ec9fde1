mod cancellation;
mod firing;
mod repeats;
mod stores;

use std::{
    cell::RefCell,
    rc::Rc,
};

use crate::{
    TimerId,
    Wheel,
};

/// Shared record of fired timer identifiers, in firing order.
pub(crate) type FireLog = Rc<RefCell<Vec<TimerId>>>;

pub(crate) fn fire_log() -> FireLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Register a one-shot that appends its identifier to `log` when it fires.
pub(crate) fn register_logged(wheel: &mut Wheel, delay_us: u64, log: &FireLog) -> TimerId {
    let log = Rc::clone(log);
    wheel
        .register(delay_us, 0, move |_, id| {
            log.borrow_mut().push(id);
            false
        })
        .unwrap()
}

pub(crate) const MS: u64 = 1_000;
pub(crate) const HOUR: u64 = 3_600_000_000;
