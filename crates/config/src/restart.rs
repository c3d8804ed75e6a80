use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::time::Duration;

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Restart {
    /// Program and leading arguments used to restart a unit. The unit name
    /// is appended as the final argument, e.g. `systemctl restart foo.service`.
    pub command: Vec<String>,

    /// Pause between two consecutive restarts. **Measured in seconds**.
    ///
    /// ## Note
    ///
    /// Restarting services back to back can make a load balancer mark
    /// several backends unhealthy at once. The pause gives each service
    /// time to come back before the next one goes down.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub delay: Duration,
}

impl Default for Restart {
    fn default() -> Self {
        Self {
            command: vec!["/usr/bin/systemctl".into(), "restart".into()],
            delay: Duration::from_secs(5),
        }
    }
}
