use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub turns: IntCounter,
    pub retrieval_failures: IntCounter,
    pub scoring_failures: IntCounter,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let turns = IntCounter::new("parent_quest_turns_total", "User turns handled")?;
        let retrieval_failures = IntCounter::new(
            "parent_quest_retrieval_failures_total",
            "Turns answered with the canned error because retrieval failed",
        )?;
        let scoring_failures = IntCounter::new(
            "parent_quest_scoring_failures_total",
            "Turns rendered without consistency scores because scoring failed",
        )?;

        registry.register(Box::new(turns.clone()))?;
        registry.register(Box::new(retrieval_failures.clone()))?;
        registry.register(Box::new(scoring_failures.clone()))?;

        Ok(Self {
            registry,
            turns,
            retrieval_failures,
            scoring_failures,
        })
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> prometheus::Result<(Vec<u8>, String)> {
        let encoder = TextEncoder::new();
        let mut buffer = vec![];
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok((buffer, encoder.format_type().to_string()))
    }
}
