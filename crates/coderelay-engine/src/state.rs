//! Engine lifecycle state and status snapshot.

use serde::Serialize;

use coderelay_protocols::CaptureRegion;

/// Lifecycle of an [`crate::Engine`].
///
/// `Idle -> Running` only after the session opened; `Running -> Stopping ->
/// Idle` is the only way back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    #[default]
    Idle,
    Running,
    Stopping,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineState::Idle => write!(f, "idle"),
            EngineState::Running => write!(f, "running"),
            EngineState::Stopping => write!(f, "stopping"),
        }
    }
}

/// Point-in-time view of the engine for hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub state: EngineState,
    pub target: Option<String>,
    pub last_candidate: Option<String>,
    pub repeating: bool,
    pub region: Option<CaptureRegion>,
    /// Promotions since the engine last started.
    pub promotions: u64,
}

impl std::fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "state={} target={} repeating={} region={} promotions={}",
            self.state,
            self.target.as_deref().unwrap_or("-"),
            self.repeating,
            self.region
                .map(|r| r.to_string())
                .unwrap_or_else(|| "full screen".to_string()),
            self.promotions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(EngineState::Idle.to_string(), "idle");
        assert_eq!(EngineState::Running.to_string(), "running");
        assert_eq!(EngineState::Stopping.to_string(), "stopping");
        assert_eq!(EngineState::default(), EngineState::Idle);
    }

    #[test]
    fn test_status_display() {
        let status = EngineStatus {
            state: EngineState::Running,
            target: Some("ABC123".to_string()),
            last_candidate: Some("ABC123".to_string()),
            repeating: true,
            region: CaptureRegion::from_corners(0, 0, 10, 10),
            promotions: 1,
        };
        let line = status.to_string();
        assert!(line.contains("state=running"));
        assert!(line.contains("target=ABC123"));
        assert!(line.contains("(0, 0, 10, 10)"));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let status = EngineStatus {
            state: EngineState::Idle,
            target: None,
            last_candidate: None,
            repeating: false,
            region: None,
            promotions: 0,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "idle");
        assert!(json["target"].is_null());
    }
}
