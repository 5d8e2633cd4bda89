// HTTP Server Task - Serviert Diagnose-Seite, JSON-Status und Settings-Formular
use defmt::{Debug2Format, debug, error, info, warn};
use embassy_net::Stack;
use embassy_net::tcp::{Error as TcpError, TcpSocket};
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;

use esp_core::{
    DiagEvent, HttpRequest, HttpStatus, Method, ParserState, RequestOutcome, Route, read_request,
};

use crate::config::*;
use crate::hal::SocketStream;
use crate::web::{
    APPLICATION_JSON, ResponseHead, TEXT_HTML, TEXT_PLAIN, status_report, write_index,
    write_status_json, write_text,
};
use crate::{NodeState, SettingsUpdateError};

/// Methoden pro Pfad für `405 Method Not Allowed`
const ALLOW_READ_ONLY: &str = "GET, HEAD";
const ALLOW_SETTINGS: &str = "POST";

/// HTTP Server Task - läuft parallel zu anderen Tasks
///
/// Jede Instanz bedient eine Connection zur Zeit:
/// - accept() auf Port 80
/// - Request über den Stream-Parser aus esp-core lesen
/// - Route ausführen, Antwort schreiben, Verbindung schließen
///
/// **Task Pool:** Wird `HTTP_SERVER_TASKS`-mal gespawnt, damit eine
/// langsame Verbindung keine anderen blockiert.
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `state`: Gemeinsamer Zustand (Settings, Messwert, Diagnose)
#[embassy_executor::task(pool_size = HTTP_SERVER_TASKS)]
pub async fn http_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    state: &'static NodeState,
) {
    info!("HTTP: Server task {} starting on port {}...", task_id, HTTP_PORT);

    // TCP-Buffers für Socket
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    loop {
        stack.wait_config_up().await;

        let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(HTTP_SOCKET_TIMEOUT_SECS)));

        if let Err(e) = socket.accept(HTTP_PORT).await {
            warn!("HTTP: Task {} accept failed: {}", task_id, Debug2Format(&e));
            Timer::after(Duration::from_millis(200)).await;
            continue;
        }

        if let Err(e) = handle_connection(&mut socket, state).await {
            warn!("HTTP: Task {} write failed: {}", task_id, Debug2Format(&e));
        }

        socket.close();
        let _ = socket.flush().await;
        socket.abort();
    }
}

/// Liest einen Request und beantwortet ihn
async fn handle_connection(socket: &mut TcpSocket<'_>, state: &NodeState) -> Result<(), TcpError> {
    let outcome = {
        let mut stream = SocketStream::new(
            socket,
            Duration::from_millis(HTTP_FIRST_BYTE_TIMEOUT_MS),
            Duration::from_millis(HTTP_IDLE_TIMEOUT_MS),
        );
        read_request::<_, HTTP_TOKEN_BUFFER_SIZE>(&mut stream).await
    };

    match outcome {
        RequestOutcome::Complete(request) => serve(socket, state, &request).await,
        // Preconnect ohne Daten: schließen ohne Antwort und ohne Log-Eintrag
        RequestOutcome::Idle => {
            debug!("HTTP: Connection closed without request");
            Ok(())
        }
        RequestOutcome::Rejected(reason) => {
            warn!("HTTP: Request rejected: {}", reason);
            state.record(DiagEvent::ClientError(ParserState::ErrorRequestSemantics));
            let status = reason.status();
            let head = ResponseHead::new(status, TEXT_PLAIN);
            let head = if status == HttpStatus::MethodNotAllowed {
                head.with_allow("GET, HEAD, POST")
            } else {
                head
            };
            write_text(socket, head, status.reason(), false).await
        }
        RequestOutcome::Failed(parser_state) => {
            let status = HttpStatus::for_parser_state(parser_state)
                .unwrap_or(HttpStatus::InternalServerError);
            if parser_state == ParserState::ErrorInternal {
                error!("HTTP: Parser fault in state {}", parser_state);
                state.record(DiagEvent::InternalFault);
            } else {
                warn!("HTTP: Malformed request ({})", parser_state);
                state.record(DiagEvent::ClientError(parser_state));
            }
            write_text(socket, ResponseHead::new(status, TEXT_PLAIN), status.reason(), false)
                .await
        }
    }
}

/// Führt die Route eines vollständigen Requests aus
async fn serve<W: Write<Error = TcpError>>(
    w: &mut W,
    state: &NodeState,
    request: &HttpRequest,
) -> Result<(), TcpError> {
    let head_only = request.method == Some(Method::Head);
    let route = Route::resolve(request);
    info!("HTTP: {} {} -> {}", request.method, request.path.as_str(), route);

    let status = match route {
        Route::Index => {
            let snapshot = state.snapshot();
            ResponseHead::new(HttpStatus::Ok, TEXT_HTML).write_to(w).await?;
            if !head_only {
                write_index(w, &snapshot).await?;
            }
            HttpStatus::Ok
        }
        Route::StatusJson => {
            let snapshot = state.snapshot();
            let mut json = [0u8; JSON_STATUS_BUFFER_SIZE];
            match write_status_json(&status_report(&snapshot), &mut json) {
                Ok(len) => {
                    let head = ResponseHead::new(HttpStatus::Ok, APPLICATION_JSON).with_length(len);
                    head.write_to(w).await?;
                    if !head_only {
                        w.write_all(&json[..len]).await?;
                    }
                    HttpStatus::Ok
                }
                Err(_) => {
                    error!("HTTP: status.json exceeds {} bytes", JSON_STATUS_BUFFER_SIZE);
                    state.record(DiagEvent::InternalFault);
                    let status = HttpStatus::InternalServerError;
                    write_text(w, ResponseHead::new(status, TEXT_PLAIN), status.reason(), head_only)
                        .await?;
                    status
                }
            }
        }
        Route::UpdateSettings => update_settings(w, state, request).await?,
        Route::NotFound => {
            let status = HttpStatus::NotFound;
            write_text(w, ResponseHead::new(status, TEXT_PLAIN), status.reason(), head_only)
                .await?;
            status
        }
        Route::MethodNotAllowed => {
            let allow = if request.path.as_str() == "/settings" {
                ALLOW_SETTINGS
            } else {
                ALLOW_READ_ONLY
            };
            let status = HttpStatus::MethodNotAllowed;
            let head = ResponseHead::new(status, TEXT_PLAIN).with_allow(allow);
            write_text(w, head, status.reason(), head_only).await?;
            status
        }
    };

    state.record(DiagEvent::RequestServed(status.code()));
    Ok(())
}

/// POST /settings: Formular übernehmen und zurück zur Startseite
async fn update_settings<W: Write<Error = TcpError>>(
    w: &mut W,
    state: &NodeState,
    request: &HttpRequest,
) -> Result<HttpStatus, TcpError> {
    if request.form.dropped() > 0 {
        warn!("HTTP: Settings form has {} extra fields", request.form.dropped());
    }

    match state.update_settings(&request.form) {
        Ok(settings) => {
            info!(
                "HTTP: Settings saved (name '{}', interval {} s)",
                settings.node_name.as_str(),
                settings.sample_interval_secs
            );
            state.record(DiagEvent::SettingsSaved);
            let status = HttpStatus::SeeOther;
            let head = ResponseHead::new(status, TEXT_PLAIN).with_location("/");
            write_text(w, head, status.reason(), false).await?;
            Ok(status)
        }
        Err(SettingsUpdateError::Invalid(reason)) => {
            warn!("HTTP: Settings rejected: {}", reason);
            state.record(DiagEvent::SettingsRejected);
            let status = HttpStatus::BadRequest;
            write_text(w, ResponseHead::new(status, TEXT_PLAIN), "invalid settings", false)
                .await?;
            Ok(status)
        }
        Err(SettingsUpdateError::Store(reason)) => {
            error!("HTTP: Settings could not be stored: {}", reason);
            state.record(DiagEvent::SettingsRejected);
            let status = HttpStatus::InternalServerError;
            write_text(w, ResponseHead::new(status, TEXT_PLAIN), status.reason(), false).await?;
            Ok(status)
        }
    }
}
