// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks teilen sich den NodeState (Settings, Messwert, Diagnose-Log).

pub mod http;
pub mod sensor;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use http::http_server_task;
pub use sensor::sensor_task;
pub use wifi::{connection_task, dhcp_task, net_task};
