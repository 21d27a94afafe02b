// Application state for HTTP handlers
use crate::application::monitor_service::MonitorService;
use crate::application::simulator_service::SimulatorService;

#[derive(Clone)]
pub struct AppState {
    pub monitor_service: MonitorService,
    pub simulator_service: SimulatorService,
}
