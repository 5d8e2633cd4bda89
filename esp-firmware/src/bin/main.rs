// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_umweltsensor::config::{DEFAULT_NODE_NAME, EXTRA_HEAP_SIZE, HTTP_SERVER_TASKS, WIFI_HEAP_SIZE};
use esp_umweltsensor::hal::RamSettingsStore;
use esp_umweltsensor::tasks::{connection_task, dhcp_task, http_server_task, net_task, sensor_task};
use esp_umweltsensor::{DiagEvent, NodeState, Settings, SettingsStore};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, WiFi, startet Embassy Runtime und spawnt Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Static resources für embassy-net
    // HTTP-Server-Tasks + DHCP + DNS
    static RESOURCES: static_cell::StaticCell<StackResources<{ HTTP_SERVER_TASKS + 2 }>> =
        static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    // Gemeinsamer Zustand: gespeicherte Settings oder Defaults
    let mut store = RamSettingsStore::new();
    let settings = match store.load() {
        Ok(settings) => settings,
        Err(e) => {
            info!("Settings: No stored settings ({}), using defaults", e);
            initial_settings()
        }
    };
    info!(
        "Settings: Node '{}', interval {} s",
        settings.node_name.as_str(),
        settings.sample_interval_secs
    );
    static STATE: static_cell::StaticCell<NodeState> = static_cell::StaticCell::new();
    let state = &*STATE.init(NodeState::new(settings, store));
    state.record(DiagEvent::Boot);

    // Spawn Sensor Task (On-Chip Temperatursensor)
    spawner.spawn(sensor_task(peripherals.TSENS, state)).unwrap();

    // Spawn WiFi Tasks
    spawner.spawn(connection_task(wifi_controller, state)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    // Spawn HTTP Server Tasks (je eine Connection gleichzeitig)
    for task_id in 0..HTTP_SERVER_TASKS {
        spawner
            .spawn(http_server_task(task_id, stack, state))
            .unwrap();
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

/// Default-Settings, Knoten-Name optional aus NODE_NAME (.env)
fn initial_settings() -> Settings {
    let mut settings = Settings::default();
    if let Some(name) = DEFAULT_NODE_NAME {
        if let Err(e) = settings.apply_field("node_name", name) {
            warn!("Settings: NODE_NAME '{}' ignored: {}", name, e);
        }
    }
    settings
}
