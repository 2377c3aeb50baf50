//! Port definitions (interfaces to the outside world)

pub mod agent_gateway;
pub mod progress;
pub mod report_renderer;
