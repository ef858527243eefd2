use core::cell::RefCell;
use cortex_m::interrupt::Mutex;
use rp_pico::hal::Timer;

static MILLIS_TIMER: Mutex<RefCell<Option<Timer>>> = Mutex::new(RefCell::new(None));

/// Makes `timer` the process-wide timebase. Call once during bring-up,
/// before anything samples `millis`.
pub fn init_millis(timer: Timer) {
    cortex_m::interrupt::free(|cs| {
        MILLIS_TIMER.borrow(cs).replace(Some(timer));
    });
}

/// Milliseconds since boot. Wraps after about 49 days.
pub fn millis() -> u32 {
    cortex_m::interrupt::free(|cs| {
        (MILLIS_TIMER
            .borrow(cs)
            .borrow()
            .as_ref()
            .unwrap()
            .get_counter()
            .ticks()
            / 1000) as u32
    })
}
