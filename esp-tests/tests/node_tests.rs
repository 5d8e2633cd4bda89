//! Integration Tests für Sensor, Settings und Diagnose
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockSensor und
//! MockSettingsStore

use std::collections::VecDeque;

use embassy_futures::block_on;
use esp_core::diag::DiagEvent;
use esp_core::http::TOKEN_BUFFER_SIZE;
use esp_core::{
    ByteStream, DiagnosticLog, ExponentialFilter, HttpRequest, HttpStatus, ParserState,
    RequestOutcome, RequestParser, RequestPart, Route, SensorError, SensorSource, Settings,
    STATUS_JSON_BUFFER_SIZE, SettingsError, SettingsStore, StatusReport, StoreError, measure,
    read_request,
};
use esp_core::diag::DiagCounters;
use esp_core::types::Reading;

// ============================================================================
// Mock Sensor
// ============================================================================

#[derive(Default)]
pub struct MockSensor {
    pub samples: VecDeque<Result<i32, SensorError>>,
    pub read_count: usize,
}

impl MockSensor {
    pub fn new(samples: &[Result<i32, SensorError>]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
            read_count: 0,
        }
    }
}

impl SensorSource for MockSensor {
    fn read_centi_celsius(&mut self) -> Result<i32, SensorError> {
        self.read_count += 1;
        self.samples.pop_front().unwrap_or(Err(SensorError::ReadFailed))
    }
}

// ============================================================================
// Mock Settings Store
// ============================================================================

#[derive(Default)]
pub struct MockSettingsStore {
    pub stored: Option<Settings>,
    pub save_count: usize,
    pub fail_next_save: bool,
}

impl MockSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MockSettingsStore {
    fn load(&mut self) -> Result<Settings, StoreError> {
        self.stored.clone().ok_or(StoreError::Empty)
    }

    fn save(&mut self, settings: &Settings) -> Result<(), StoreError> {
        if self.fail_next_save {
            self.fail_next_save = false;
            return Err(StoreError::WriteFailed);
        }

        self.stored = Some(settings.clone());
        self.save_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Stream (minimal, nur für komplette Requests)
// ============================================================================

struct MockStream {
    data: Vec<u8>,
    pos: usize,
}

impl ByteStream for MockStream {
    async fn read(&mut self) -> Option<u8> {
        let byte = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    async fn peek(&mut self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }
}

/// Parst einen Request bis zum Endzustand in das Request-Modell
fn parse_request(input: &[u8]) -> (HttpRequest, ParserState) {
    let mut stream = MockStream {
        data: input.to_vec(),
        pos: 0,
    };
    let mut parser = RequestParser::new(&mut stream);
    let mut buffer = [0u8; TOKEN_BUFFER_SIZE];
    let mut request = HttpRequest::new();

    while !parser.state().is_terminal() {
        let parsed = block_on(parser.parse(&mut buffer));
        if parsed.part != RequestPart::None && request.apply(parsed.part, parsed.token).is_err() {
            parser.reject();
        }
    }
    let state = parser.state();
    (request, state)
}

// ============================================================================
// Tests: Messung
// ============================================================================

#[test]
fn test_measure_applies_offset_and_filter() {
    let mut sensor = MockSensor::new(&[Ok(2000), Ok(2400)]);
    let mut filter = ExponentialFilter::new(0);
    let mut settings = Settings::default();
    settings.smoothing_shift = 2;
    settings.offset_centi_celsius = 100;

    let first = measure(&mut sensor, &mut filter, &settings, 10).unwrap();
    assert_eq!(first.raw_centi_celsius, 2000);
    assert_eq!(first.centi_celsius, 2100);
    assert_eq!(first.uptime_secs, 10);

    let second = measure(&mut sensor, &mut filter, &settings, 20).unwrap();
    assert_eq!(second.centi_celsius, 2200);
    assert_eq!(sensor.read_count, 2);
}

#[test]
fn test_measure_rejects_implausible_value() {
    let mut sensor = MockSensor::new(&[Ok(2000), Ok(30000), Ok(2000)]);
    let mut filter = ExponentialFilter::new(3);
    let settings = Settings::default();

    measure(&mut sensor, &mut filter, &settings, 0).unwrap();
    let result = measure(&mut sensor, &mut filter, &settings, 1);
    assert_eq!(result, Err(SensorError::OutOfRange));
    assert_eq!(filter.value(), Some(2000));

    let reading = measure(&mut sensor, &mut filter, &settings, 2).unwrap();
    assert_eq!(reading.centi_celsius, 2000);
}

#[test]
fn test_measure_propagates_sensor_error() {
    let mut sensor = MockSensor::new(&[Err(SensorError::ReadFailed)]);
    let mut filter = ExponentialFilter::new(3);
    let result = measure(&mut sensor, &mut filter, &Settings::default(), 0);
    assert_eq!(result, Err(SensorError::ReadFailed));
    assert_eq!(filter.value(), None);
}

#[test]
fn test_reading_display_split() {
    let mut sensor = MockSensor::new(&[Ok(-5)]);
    let mut filter = ExponentialFilter::new(0);
    let reading = measure(&mut sensor, &mut filter, &Settings::default(), 0).unwrap();
    assert_eq!(reading.split_celsius(), (true, 0, 5));
}

// ============================================================================
// Tests: Settings über das Formular
// ============================================================================

#[test]
fn test_settings_form_roundtrip_through_store() {
    let (request, state) = parse_request(
        b"POST /settings HTTP/1.1\r\nHost: sensor\r\n\r\nnode_name=Keller&sample_interval=30&smoothing=4",
    );
    assert_eq!(state, ParserState::Finished);
    assert_eq!(Route::resolve(&request), Route::UpdateSettings);

    let mut store = MockSettingsStore::new();
    assert_eq!(store.load(), Err(StoreError::Empty));

    let updated = Settings::default().with_form(&request.form).unwrap();
    store.save(&updated).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.node_name.as_str(), "Keller");
    assert_eq!(loaded.sample_interval_secs, 30);
    assert_eq!(loaded.smoothing_shift, 4);
    assert_eq!(loaded.offset_centi_celsius, 0);
    assert_eq!(store.save_count, 1);
}

#[test]
fn test_settings_form_is_all_or_nothing() {
    let (request, state) = parse_request(
        b"POST /settings HTTP/1.1\r\n\r\nsample_interval=30&smoothing=99",
    );
    assert_eq!(state, ParserState::Finished);

    let current = Settings::default();
    let result = current.with_form(&request.form);
    assert_eq!(result, Err(SettingsError::OutOfRange));
    assert_eq!(current, Settings::default());
}

#[test]
fn test_settings_form_unknown_field() {
    let (request, _) = parse_request(b"POST /settings HTTP/1.1\r\n\r\ncolor=red");
    assert_eq!(
        Settings::default().with_form(&request.form),
        Err(SettingsError::UnknownField)
    );
}

#[test]
fn test_store_failure_keeps_previous_settings() {
    let mut store = MockSettingsStore::new();
    store.save(&Settings::default()).unwrap();

    let mut changed = Settings::default();
    changed.sample_interval_secs = 60;
    store.fail_next_save = true;
    assert_eq!(store.save(&changed), Err(StoreError::WriteFailed));
    assert_eq!(store.load().unwrap().sample_interval_secs, 10);

    // Zweiter Versuch klappt
    store.save(&changed).unwrap();
    assert_eq!(store.load().unwrap().sample_interval_secs, 60);
}

// ============================================================================
// Tests: Routing und Status
// ============================================================================

#[test]
fn test_unsupported_method_is_rejected_early() {
    let (request, state) = parse_request(b"DELETE /settings HTTP/1.1\r\n\r\n");
    assert_eq!(state, ParserState::ErrorRequestSemantics);
    assert_eq!(request.method, None);
    assert_eq!(HttpStatus::for_parser_state(state), None);
}

#[test]
fn test_error_states_map_to_status() {
    let (_, state) = parse_request(b"GET /index.html");
    assert_eq!(
        HttpStatus::for_parser_state(state),
        Some(HttpStatus::BadRequest)
    );

    let long = format!("GET /{} HTTP/1.1\r\n\r\n", "x".repeat(64));
    let (_, state) = parse_request(long.as_bytes());
    assert_eq!(
        HttpStatus::for_parser_state(state),
        Some(HttpStatus::ContentTooLarge)
    );

    assert_eq!(
        HttpStatus::for_parser_state(ParserState::ErrorInternal),
        Some(HttpStatus::InternalServerError)
    );
    assert_eq!(HttpStatus::for_parser_state(ParserState::Finished), None);
}

#[test]
fn test_routes() {
    let cases: [(&[u8], Route); 5] = [
        (b"GET / HTTP/1.1\r\n\r\n", Route::Index),
        (b"HEAD /index.html HTTP/1.1\r\n\r\n", Route::Index),
        (b"GET /status.json HTTP/1.1\r\n\r\n", Route::StatusJson),
        (b"GET /settings HTTP/1.1\r\n\r\n", Route::MethodNotAllowed),
        (b"GET /favicon.ico HTTP/1.1\r\n\r\n", Route::NotFound),
    ];
    for (input, expected) in cases {
        let (request, state) = parse_request(input);
        assert_eq!(state, ParserState::Finished);
        assert_eq!(Route::resolve(&request), expected);
    }
}

#[test]
fn test_read_request_complete() {
    let mut stream = MockStream {
        data: b"GET /?x=1 HTTP/1.1\r\nHost: sensor\r\n\r\n".to_vec(),
        pos: 0,
    };
    let outcome = block_on(read_request::<_, TOKEN_BUFFER_SIZE>(&mut stream));
    assert!(outcome.error_status().is_none());
    let RequestOutcome::Complete(request) = outcome else {
        panic!("request should be complete");
    };
    assert_eq!(request.query.get("x"), Some("1"));
    assert_eq!(Route::resolve(&request), Route::Index);
}

#[test]
fn test_read_request_rejects_without_reading_rest() {
    let mut stream = MockStream {
        data: b"PATCH /settings HTTP/1.1\r\n\r\n".to_vec(),
        pos: 0,
    };
    let outcome = block_on(read_request::<_, TOKEN_BUFFER_SIZE>(&mut stream));
    assert_eq!(outcome.error_status(), Some(HttpStatus::MethodNotAllowed));
    assert_eq!(&stream.data[stream.pos..], b"/settings HTTP/1.1\r\n\r\n");
}

#[test]
fn test_read_request_browser_headers_with_larger_buffer() {
    let mut stream = MockStream {
        data: b"GET / HTTP/1.1\r\n\
Host: 192.168.1.40\r\n\
User-Agent: Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)\r\n\
Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\n\
\r\n"
            .to_vec(),
        pos: 0,
    };
    let outcome = block_on(read_request::<_, 128>(&mut stream));
    let RequestOutcome::Complete(request) = outcome else {
        panic!("request should be complete");
    };
    assert_eq!(Route::resolve(&request), Route::Index);
    assert_eq!(request.header("host"), Some("192.168.1.40"));
    assert_eq!(request.header("user-agent"), Some("Mozilla/5.0 (X11"));
    assert_eq!(request.header("accept"), None);
    assert_eq!(request.headers.dropped(), 1);
}

#[test]
fn test_read_request_failed_parse() {
    let mut stream = MockStream {
        data: b"GET /\r\n".to_vec(),
        pos: 0,
    };
    let outcome = block_on(read_request::<_, TOKEN_BUFFER_SIZE>(&mut stream));
    assert!(matches!(
        outcome,
        RequestOutcome::Failed(ParserState::ErrorRequestStructure)
    ));
    assert_eq!(outcome.error_status(), Some(HttpStatus::BadRequest));
}

#[test]
fn test_read_request_connection_without_data_is_idle() {
    let mut stream = MockStream {
        data: Vec::new(),
        pos: 0,
    };
    let outcome = block_on(read_request::<_, TOKEN_BUFFER_SIZE>(&mut stream));
    assert!(matches!(outcome, RequestOutcome::Idle));
    assert_eq!(outcome.error_status(), None);
}

#[test]
fn test_read_request_truncated_first_token_is_not_idle() {
    let mut stream = MockStream {
        data: b"GE".to_vec(),
        pos: 0,
    };
    let outcome = block_on(read_request::<_, TOKEN_BUFFER_SIZE>(&mut stream));
    assert!(matches!(
        outcome,
        RequestOutcome::Failed(ParserState::ErrorRequestStructure)
    ));
}

#[test]
fn test_read_request_internal_fault_is_not_idle() {
    let mut stream = MockStream {
        data: Vec::new(),
        pos: 0,
    };
    let outcome = block_on(read_request::<_, 0>(&mut stream));
    assert!(matches!(
        outcome,
        RequestOutcome::Failed(ParserState::ErrorInternal)
    ));
    assert_eq!(outcome.error_status(), Some(HttpStatus::InternalServerError));
}

// ============================================================================
// Tests: Diagnose-Log
// ============================================================================

#[test]
fn test_diag_log_tracks_request_outcomes() {
    let mut log: DiagnosticLog<4> = DiagnosticLog::new();
    log.record(0, DiagEvent::Boot);

    let (_, state) = parse_request(b"GET / HTTP/1.1\n\n");
    if state.is_error() {
        log.record(5, DiagEvent::ClientError(state));
    }
    log.record(6, DiagEvent::RequestServed(200));

    let counters = log.counters();
    assert_eq!(counters.client_errors, 1);
    assert_eq!(counters.requests_served, 1);
    assert_eq!(log.latest().map(|e| e.uptime_secs), Some(6));
    assert_eq!(
        log.iter().nth(1).map(|e| e.event.label()),
        Some("malformed request")
    );
}

#[test]
fn test_diag_log_overflow_keeps_counters() {
    let mut log: DiagnosticLog<3> = DiagnosticLog::new();
    for second in 0..10 {
        log.record(second, DiagEvent::SensorFault);
    }
    assert_eq!(log.len(), 3);
    assert_eq!(log.total_recorded(), 10);
    assert_eq!(log.counters().sensor_faults, 10);
    assert_eq!(log.iter().next().map(|e| e.uptime_secs), Some(7));
}

// ============================================================================
// Tests: JSON-Status
// ============================================================================

#[test]
fn test_status_json_worst_case_fits_buffer() {
    let mut settings = Settings::default();
    settings
        .apply_field("node_name", "Gewaechshaus Nord Ost 12")
        .unwrap();
    assert_eq!(settings.node_name.len(), 24);
    settings.apply_field("sample_interval", "3600").unwrap();
    settings.apply_field("offset", "-1000").unwrap();

    let reading = Reading {
        centi_celsius: i32::MIN,
        raw_centi_celsius: i32::MIN,
        uptime_secs: u32::MAX,
    };
    let counters = DiagCounters {
        requests_served: u32::MAX,
        client_errors: u32::MAX,
        internal_faults: u32::MAX,
        sensor_faults: u32::MAX,
    };
    let report = StatusReport::new(
        u32::MAX,
        Some(reading),
        &settings,
        counters,
        Some(DiagEvent::InternalFault),
    );

    let mut buf = [0u8; STATUS_JSON_BUFFER_SIZE];
    let len = serde_json_core::to_slice(&report, &mut buf).unwrap();
    assert!(len > 384);
    let json = std::str::from_utf8(&buf[..len]).unwrap();
    assert!(json.contains("\"last_event\":\"internal parser fault\""));
}

#[test]
fn test_status_json_before_first_reading() {
    let settings = Settings::default();
    let report = StatusReport::new(3, None, &settings, DiagCounters::default(), None);

    let mut buf = [0u8; STATUS_JSON_BUFFER_SIZE];
    let len = serde_json_core::to_slice(&report, &mut buf).unwrap();
    let json = std::str::from_utf8(&buf[..len]).unwrap();
    assert!(json.starts_with("{\"uptime_secs\":3,\"reading\":null,"));
    assert!(json.ends_with("\"last_event\":null}"));
}
