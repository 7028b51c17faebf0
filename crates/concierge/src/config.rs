use std::time::Duration;

/// Downstream agents and aggregation policy.
#[derive(Debug, Clone)]
pub struct ConciergeConfig {
    /// Base URLs of the agents asked for every `QUOTE`.
    pub pricing_agents: Vec<String>,
    /// Base URL of the agent that handles `SHIP`.
    pub ship_agent: String,
    /// Base URL of the `INTERPRET` agent.
    pub interpreter: String,
    /// Longest a `QUOTE` waits for pricing agents. The inbound request
    /// deadline still applies when it is earlier.
    pub aggregation_timeout: Duration,
}

impl Default for ConciergeConfig {
    fn default() -> Self {
        Self {
            pricing_agents: vec![
                "http://localhost:8081".to_string(),
                "http://localhost:8082".to_string(),
            ],
            ship_agent: "http://localhost:8081".to_string(),
            interpreter: "http://localhost:8083".to_string(),
            aggregation_timeout: Duration::from_millis(1800),
        }
    }
}

impl ConciergeConfig {
    /// Every configured agent once, in configuration order.
    pub fn agent_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = Vec::new();
        let all = self
            .pricing_agents
            .iter()
            .chain([&self.ship_agent, &self.interpreter]);
        for url in all {
            if !urls.contains(&url.as_str()) {
                urls.push(url);
            }
        }
        urls
    }
}
