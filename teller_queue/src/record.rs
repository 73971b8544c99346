use serde::Serialize;

/// Timestamps and delays for one served client
///
/// Built in one step by [`ClientRecord::derive`] and never mutated after.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClientRecord {
    arrival_time: f64,
    service_begin: f64,
    service_end: f64,
    idle_time: f64,
    wait_in_queue: f64,
    time_in_system: f64,
}

impl ClientRecord {
    /// Derive a fully populated record from the client's arrival, the record
    /// of the client served just before (if any) and a fresh service duration.
    ///
    /// Service is FIFO with a single teller: it begins once the client has
    /// arrived and the previous client has left.
    ///
    /// Idle time is clamped at zero. Service overlap is impossible here, the
    /// clamp only absorbs floating-point rounding.
    pub fn derive(
        arrival_time: f64,
        previous: Option<&ClientRecord>,
        service_duration: f64,
    ) -> ClientRecord {
        let (service_begin, idle_time) = match previous {
            None => (arrival_time, 0.0),
            Some(prev) => {
                let begin = arrival_time.max(prev.service_end);
                (begin, (begin - prev.service_end).max(0.0))
            }
        };
        let service_end = service_begin + service_duration;

        ClientRecord {
            arrival_time,
            service_begin,
            service_end,
            idle_time,
            wait_in_queue: service_begin - arrival_time,
            time_in_system: service_end - arrival_time,
        }
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn service_begin(&self) -> f64 {
        self.service_begin
    }

    pub fn service_end(&self) -> f64 {
        self.service_end
    }

    /// Teller idle time just before this client's service began
    pub fn idle_time(&self) -> f64 {
        self.idle_time
    }

    pub fn wait_in_queue(&self) -> f64 {
        self.wait_in_queue
    }

    pub fn time_in_system(&self) -> f64 {
        self.time_in_system
    }

    pub fn service_duration(&self) -> f64 {
        self.service_end - self.service_begin
    }

    /// Whether the client queued at all (a zero wait does not count)
    pub fn waited(&self) -> bool {
        self.wait_in_queue > 0.0
    }
}
