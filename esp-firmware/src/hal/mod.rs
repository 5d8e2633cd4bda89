// Hardware Abstraction Layer (HAL) Module
//
// Adapter zwischen esp-hal/embassy-net und den Traits aus esp-core.

pub mod settings_store;
pub mod socket_stream;
pub mod temp_sensor;

pub use settings_store::RamSettingsStore;
pub use socket_stream::SocketStream;
pub use temp_sensor::ChipTemperatureSensor;
