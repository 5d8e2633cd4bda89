// JSON-Status für GET /status.json
// Das Modell liegt in esp-core, hier wird es mit serde-json-core serialisiert

use esp_core::StatusReport;

use crate::NodeSnapshot;

/// Status aus einer Momentaufnahme; letztes Log-Ereignis als Label
pub fn status_report(snapshot: &NodeSnapshot) -> StatusReport<'_> {
    StatusReport::new(
        snapshot.uptime_secs,
        snapshot.reading,
        &snapshot.settings,
        snapshot.counters,
        snapshot.entries.last().map(|entry| entry.event),
    )
}

/// Serialisiert in `buf`, liefert die Anzahl geschriebener Bytes
pub fn write_status_json(
    report: &StatusReport<'_>,
    buf: &mut [u8],
) -> serde_json_core::ser::Result<usize> {
    serde_json_core::to_slice(report, buf)
}
