use crate::http::{HttpRequest, HttpResponse};
use crossbeam_channel::Sender;
use dashboard_common::{DashboardError, Result};
use log::{debug, error, info, warn};
use std::io::Read;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Longest accepted request head.
const MAX_HEAD_BYTES: usize = 8 * 1024;
/// How long a browser may take to send its request head.
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// A parsed request together with the connection to answer on.
pub struct PageRequest {
    /// Connection the response is written to.
    pub stream: TcpStream,
    /// Parsed request line.
    pub request: HttpRequest,
    /// Client address, for logging.
    pub peer: SocketAddr,
}

/// HTTP front door that accepts browser connections.
///
/// Reads and parses each request head on the accepting thread and hands valid
/// requests to the render loop through a channel. Malformed requests are
/// answered with 400 here and never reach the renderer.
pub struct PageReceiver {
    /// The underlying TCP listening socket.
    pub(crate) socket: TcpListener,
}

impl PageReceiver {
    /// Bind a new receiver to the provided `bind_addr` (e.g., `0.0.0.0:8501`).
    pub fn new(bind_addr: &str) -> Result<Self> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking loop that accepts connections and forwards each parsed request
    /// to `tx`.
    ///
    /// Every accepted stream gets its own thread for reading the request head,
    /// so a client that connects and stays silent never delays the next one.
    /// Problems with a single client are logged by that client's thread.
    pub(crate) fn receive_loop_with_channel(self, tx: Sender<PageRequest>) -> Result<()> {
        info!("Dashboard HTTP server is started on http://{}", self.local_addr()?);

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    let tx = tx.clone();
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, &tx) {
                            error!("Connection handling failed: {}", e);
                        }
                    });
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

/// Read one request from `stream` and hand it to the render loop, or answer
/// 400 when the head cannot be parsed.
fn handle_connection(mut stream: TcpStream, tx: &Sender<PageRequest>) -> Result<()> {
    let peer = stream.peer_addr()?;
    match read_request(&mut stream) {
        Ok(request) => {
            debug!("{} {} from {}", request.method, request.path, peer);
            tx.send(PageRequest {
                stream,
                request,
                peer,
            })
            .map_err(|e| DashboardError::ChannelSend(e.to_string()))
        }
        Err(e) => {
            warn!("Rejected request from {}: {}", peer, e);
            if let Err(e) = HttpResponse::bad_request(&e.to_string()).write_to(&mut stream) {
                debug!("Could not answer {}: {}", peer, e);
            }
            Ok(())
        }
    }
}

/// Read until the end of the request head and parse it.
fn read_request(stream: &mut TcpStream) -> Result<HttpRequest> {
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];

    loop {
        let size = stream.read(&mut buf)?;
        if size == 0 {
            break;
        }
        head.extend_from_slice(&buf[..size]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
        if head.len() > MAX_HEAD_BYTES {
            return Err(DashboardError::BadRequest(String::from("request head too large")));
        }
    }
    HttpRequest::parse(&head)
}
