use std::time::Duration;

use batch_dispatch::service::RecordingService;
use batch_dispatch::{Dispatcher, EventPublisher, ServiceParameters, StandInService};

pub type TestDispatcher = Dispatcher<RecordingService<StandInService>>;

/// Builder for a dispatcher wired to a recording stand-in service
pub struct DispatcherBuilder {
    batch_size: usize,
    number_of_items: usize,
    period: Duration,
    capacity: Option<u64>,
    work_time: Option<Duration>,
    publisher: EventPublisher,
}

impl DispatcherBuilder {
    pub fn new(batch_size: usize, number_of_items: usize) -> Self {
        Self {
            batch_size,
            number_of_items,
            period: Duration::from_secs(2),
            capacity: None,
            work_time: None,
            publisher: EventPublisher::default(),
        }
    }

    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn work_time(mut self, work_time: Duration) -> Self {
        self.work_time = Some(work_time);
        self
    }

    pub fn publisher(&self) -> EventPublisher {
        self.publisher.clone()
    }

    pub fn build(self) -> TestDispatcher {
        let params = ServiceParameters::new(self.batch_size, self.period, self.number_of_items)
            .expect("valid test parameters");
        let capacity = self.capacity.unwrap_or(self.batch_size as u64);

        let mut service = StandInService::new(capacity, self.period, self.publisher.clone());
        if let Some(work_time) = self.work_time {
            service = service.with_work_time(work_time);
        }

        Dispatcher::new(params, RecordingService::new(service), self.publisher)
    }
}
