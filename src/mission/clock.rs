use chrono::{DateTime, Local, Utc};
use std::thread;
use std::time::Duration;

/// Wall-clock source and sleeper for the mission loop.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn sleep(&self, duration: Duration);

    fn now_local(&self) -> DateTime<Local> {
        self.now().with_timezone(&Local)
    }
}

/// Real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Clock that only moves when slept on.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    now: std::cell::Cell<DateTime<Utc>>,
    pub sleeps: std::cell::RefCell<Vec<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: std::cell::Cell::new(start),
            sleeps: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn total_slept(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        let step = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
        self.now.set(self.now.get() + step);
    }
}
