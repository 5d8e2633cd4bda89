// HTML-Seite für GET /
//
// Die Seite wird stückweise geschrieben: statische Teile direkt aus dem
// Flash, dynamische Werte über einen kleinen heapless-Buffer.

use core::fmt::Write as _;
use embedded_io_async::Write;
use heapless::String;

use esp_core::DiagEvent;
use esp_core::settings::{
    MAX_SMOOTHING_SHIFT, NODE_NAME_CAPACITY, OFFSET_RANGE, SAMPLE_INTERVAL_RANGE,
};
use esp_core::types::split_centi;

use crate::NodeSnapshot;
use crate::config::HTTP_HEAD_BUFFER_SIZE;

type Fragment = String<HTTP_HEAD_BUFFER_SIZE>;

const PAGE_START: &str = "<!DOCTYPE html>\n\
<html lang=\"de\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<meta http-equiv=\"refresh\" content=\"30\">\
<style>\
body{font-family:sans-serif;max-width:40em;margin:1em auto;padding:0 1em;color:#222}\
h1{font-size:1.4em}.temp{font-size:3em;margin:.2em 0}\
table{border-collapse:collapse}td{padding:.2em .6em}\
label{display:block;margin:.4em 0}input{width:10em}\
.muted{color:#777}\
</style>";

const FORM_END: &str = "<button type=\"submit\">Speichern</button></form>";

const PAGE_END: &str = "<p class=\"muted\"><a href=\"/status.json\">status.json</a></p></body></html>\n";

/// Schreibt die komplette Seite
pub async fn write_index<W: Write>(w: &mut W, snapshot: &NodeSnapshot) -> Result<(), W::Error> {
    let settings = &snapshot.settings;
    let mut frag = Fragment::new();

    w.write_all(PAGE_START.as_bytes()).await?;
    let _ = write!(
        frag,
        "<title>{0}</title></head><body><h1>{0}</h1>",
        settings.node_name
    );
    w.write_all(frag.as_bytes()).await?;

    // Messwert
    frag.clear();
    match snapshot.reading {
        Some(reading) => {
            let _ = frag.push_str("<p class=\"temp\">");
            push_centi(&mut frag, reading.centi_celsius);
            let _ = frag.push_str(" &deg;C</p><p class=\"muted\">Rohwert ");
            push_centi(&mut frag, reading.raw_centi_celsius);
            let _ = write!(
                frag,
                " &deg;C, gemessen bei {} s</p>",
                reading.uptime_secs
            );
        }
        None => {
            let _ = frag.push_str("<p class=\"temp\">--</p><p class=\"muted\">noch keine Messung</p>");
        }
    }
    w.write_all(frag.as_bytes()).await?;

    // Zähler
    frag.clear();
    let counters = snapshot.counters;
    let _ = write!(
        frag,
        "<h2>Diagnose</h2><table>\
         <tr><td>Laufzeit</td><td>{} s</td></tr>\
         <tr><td>Anfragen</td><td>{}</td></tr>\
         <tr><td>Fehlerhafte Anfragen</td><td>{}</td></tr>\
         <tr><td>Interne Fehler</td><td>{}</td></tr>\
         <tr><td>Sensorfehler</td><td>{}</td></tr></table>",
        snapshot.uptime_secs,
        counters.requests_served,
        counters.client_errors,
        counters.internal_faults,
        counters.sensor_faults,
    );
    w.write_all(frag.as_bytes()).await?;

    // Log, neueste zuerst
    w.write_all(b"<ul>").await?;
    for entry in snapshot.entries.iter().rev() {
        frag.clear();
        let _ = write!(frag, "<li>{} s: {}", entry.uptime_secs, entry.event.label());
        if let DiagEvent::RequestServed(code) = entry.event {
            let _ = write!(frag, " ({})", code);
        }
        let _ = frag.push_str("</li>");
        w.write_all(frag.as_bytes()).await?;
    }
    w.write_all(b"</ul>").await?;

    // Settings-Formular
    frag.clear();
    let _ = write!(
        frag,
        "<h2>Einstellungen</h2><form method=\"post\" action=\"/settings\">\
         <label>Name <input name=\"node_name\" value=\"{}\" maxlength=\"{}\"></label>",
        settings.node_name,
        NODE_NAME_CAPACITY,
    );
    w.write_all(frag.as_bytes()).await?;

    frag.clear();
    let _ = write!(
        frag,
        "<label>Intervall (s) <input name=\"sample_interval\" type=\"number\" \
         min=\"{}\" max=\"{}\" value=\"{}\"></label>",
        SAMPLE_INTERVAL_RANGE.start(),
        SAMPLE_INTERVAL_RANGE.end(),
        settings.sample_interval_secs,
    );
    w.write_all(frag.as_bytes()).await?;

    frag.clear();
    let _ = write!(
        frag,
        "<label>Gl&auml;ttung <input name=\"smoothing\" type=\"number\" \
         min=\"0\" max=\"{}\" value=\"{}\"></label>",
        MAX_SMOOTHING_SHIFT, settings.smoothing_shift,
    );
    w.write_all(frag.as_bytes()).await?;

    frag.clear();
    let _ = write!(
        frag,
        "<label>Offset (1/100 &deg;C) <input name=\"offset\" type=\"number\" \
         min=\"{}\" max=\"{}\" value=\"{}\"></label>",
        OFFSET_RANGE.start(),
        OFFSET_RANGE.end(),
        settings.offset_centi_celsius,
    );
    w.write_all(frag.as_bytes()).await?;

    w.write_all(FORM_END.as_bytes()).await?;
    w.write_all(PAGE_END.as_bytes()).await
}

/// Hundertstel Grad als "-1.05"
fn push_centi(frag: &mut Fragment, centi: i32) {
    let (negative, whole, frac) = split_centi(centi);
    let sign = if negative { "-" } else { "" };
    let _ = write!(frag, "{}{}.{:02}", sign, whole, frac);
}
