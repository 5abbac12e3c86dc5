use std::time::SystemTime;

pub trait GetTime {
    fn get_now(&self) -> SystemTime;
}

/// Wall clock. Codes are only as correct as the host's time.
pub struct Clock {}

impl Clock {
    pub fn new() -> Self {
        Clock {}
    }
}

impl GetTime for Clock {
    fn get_now(&self) -> SystemTime {
        SystemTime::now()
    }
}
