// TCP-Socket als Byte-Stream für den HTTP-Parser
//
// Liest in kleinen Chunks vom Socket und gibt einzelne Bytes an den
// Parser weiter. Kommt innerhalb des Lesefensters kein Byte, meldet
// der Stream "nicht verfügbar" und bleibt danach erschöpft.

use defmt::{Debug2Format, warn};
use embassy_net::tcp::TcpSocket;
use embassy_time::{Duration, with_timeout};

use esp_core::ByteStream;

use crate::config::SOCKET_CHUNK_SIZE;

pub struct SocketStream<'a, 's> {
    socket: &'a mut TcpSocket<'s>,
    chunk: [u8; SOCKET_CHUNK_SIZE],
    pos: usize,
    len: usize,
    /// Fenster bis zum ersten Byte
    first_byte: Duration,
    /// Fenster zwischen zwei Chunks
    idle: Duration,
    received_any: bool,
    exhausted: bool,
}

impl<'a, 's> SocketStream<'a, 's> {
    pub fn new(socket: &'a mut TcpSocket<'s>, first_byte: Duration, idle: Duration) -> Self {
        Self {
            socket,
            chunk: [0u8; SOCKET_CHUNK_SIZE],
            pos: 0,
            len: 0,
            first_byte,
            idle,
            received_any: false,
            exhausted: false,
        }
    }

    /// Holt den nächsten Chunk; `false` wenn nichts mehr kommt
    async fn fill(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let window = if self.received_any {
            self.idle
        } else {
            self.first_byte
        };

        match with_timeout(window, self.socket.read(&mut self.chunk)).await {
            Ok(Ok(n)) if n > 0 => {
                self.pos = 0;
                self.len = n;
                self.received_any = true;
                true
            }
            // Gegenseite hat geschlossen
            Ok(Ok(_)) => {
                self.exhausted = true;
                false
            }
            Ok(Err(e)) => {
                warn!("HTTP: Socket read failed: {}", Debug2Format(&e));
                self.exhausted = true;
                false
            }
            Err(_) => {
                self.exhausted = true;
                false
            }
        }
    }
}

impl ByteStream for SocketStream<'_, '_> {
    async fn read(&mut self) -> Option<u8> {
        let byte = self.peek().await?;
        self.pos += 1;
        Some(byte)
    }

    async fn peek(&mut self) -> Option<u8> {
        if self.pos >= self.len && !self.fill().await {
            return None;
        }
        Some(self.chunk[self.pos])
    }
}
