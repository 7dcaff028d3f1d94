//! Metric names and a liveness probe for embedding hosts.

/// Counter incremented for every backend request, labeled by endpoint group.
pub const API_REQUESTS: &str = "cocofarm_api_requests_total";
/// Counter incremented for every failed backend response, same labels.
pub const API_FAILURES: &str = "cocofarm_api_failures_total";
/// Counter incremented when an optimistic local mutation is rolled back.
pub const ROLLBACKS: &str = "cocofarm_optimistic_rollbacks_total";

pub struct Health {
    pub ready: bool,
}

impl Health {
    pub fn readiness() -> Self {
        Self { ready: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_ok() {
        let h = Health::readiness();
        assert!(h.ready);
    }
}
