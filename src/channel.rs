//! Request/response transport to one engine endpoint.
//!
//! A [`Channel`] takes the text of one engine expression and returns the raw
//! text of the engine's answer. [`TcpChannel`] opens a fresh connection per
//! request, which is how the engine's socket server expects to be driven.
//! Any `FnMut(&str) -> Result<String>` closure is also a channel.

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{CycError, Result};
use crate::settings::Settings;

/// Width of the length field that follows an `L` marker.
pub const LENGTH_DIGITS: usize = 10;
/// Silence after which an unsized response is considered complete.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(2);

const CHUNK: usize = 4096;

pub trait Channel: Send {
    fn exchange(&mut self, request: &str) -> Result<String>;
}

impl<F> Channel for F
where
    F: FnMut(&str) -> Result<String> + Send,
{
    fn exchange(&mut self, request: &str) -> Result<String> {
        self(request)
    }
}

// ------------- Framing -------------
/// How the payload of a response is delimited, as announced by its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// `L`: ten digits of length, then exactly that many bytes.
    Length,
    /// `A`: bytes until the peer closes or goes idle.
    Stream,
    /// No marker; the byte read is already part of the payload.
    Unmarked(u8),
}

pub fn read_framing<R: Read>(reader: &mut R) -> Result<Framing> {
    let mut marker = [0u8; 1];
    loop {
        match reader.read(&mut marker) {
            Ok(0) => return Err(CycError::Transport("empty response".into())),
            Ok(_) => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(match marker[0] {
        b'L' => Framing::Length,
        b'A' => Framing::Stream,
        other => Framing::Unmarked(other),
    })
}

pub fn read_payload<R: Read>(reader: &mut R, framing: Framing) -> Result<String> {
    let bytes = match framing {
        Framing::Length => {
            let mut digits = [0u8; LENGTH_DIGITS];
            reader.read_exact(&mut digits)?;
            let length = std::str::from_utf8(&digits)
                .ok()
                .and_then(|d| d.trim().parse::<usize>().ok())
                .ok_or_else(|| {
                    CycError::Transport(format!(
                        "bad length field {:?}",
                        String::from_utf8_lossy(&digits)
                    ))
                })?;
            let mut payload = vec![0u8; length];
            reader.read_exact(&mut payload).map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => {
                    CycError::Transport(format!("response shorter than announced {} bytes", length))
                }
                _ => CycError::from(e),
            })?;
            payload
        }
        Framing::Stream => read_until_idle(reader, Vec::new())?,
        Framing::Unmarked(first) => read_until_idle(reader, vec![first])?,
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(CycError::Transport("empty response".into()));
    }
    String::from_utf8(bytes).map_err(|e| CycError::decode(format!("response is not UTF-8: {}", e)))
}

/// Reads one framed response.
pub fn read_response<R: Read>(reader: &mut R) -> Result<String> {
    let framing = read_framing(reader)?;
    read_payload(reader, framing)
}

// A timeout once data has arrived ends the message.
fn read_until_idle<R: Read>(reader: &mut R, mut bytes: Vec<u8>) -> Result<Vec<u8>> {
    let mut chunk = [0u8; CHUNK];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => bytes.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) && !bytes.is_empty() => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(bytes)
}

// ------------- TcpChannel -------------
#[derive(Debug, Clone)]
pub struct TcpChannel {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpChannel {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Result<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(CycError::Config(
                "the host name of the running engine has not been set".into(),
            ));
        }
        Ok(Self { host, port, timeout })
    }
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.host(), settings.port(), settings.timeout())
    }
    pub fn host(&self) -> &str {
        &self.host
    }
    pub fn port(&self) -> u16 {
        self.port
    }

    fn connect(&self) -> Result<TcpStream> {
        let unreachable = |detail: String| {
            CycError::Transport(format!(
                "failed to connect to the engine at {} on port {}: {}",
                self.host, self.port, detail
            ))
        };
        let addresses = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| unreachable(e.to_string()))?;
        let mut last = String::from("no address resolved");
        for address in addresses {
            match TcpStream::connect_timeout(&address, self.timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_write_timeout(Some(self.timeout))?;
                    return Ok(stream);
                }
                Err(e) => last = e.to_string(),
            }
        }
        Err(unreachable(last))
    }
}

impl Channel for TcpChannel {
    fn exchange(&mut self, request: &str) -> Result<String> {
        let mut stream = self.connect()?;
        stream.write_all(request.as_bytes())?;
        stream.flush()?;
        let framing = read_framing(&mut stream)?;
        if framing != Framing::Length {
            stream.set_read_timeout(Some(IDLE_TIMEOUT.min(self.timeout)))?;
        }
        let response = read_payload(&mut stream, framing)?;
        debug!(bytes = response.len(), ?framing, "response received");
        Ok(response)
    }
}
