use crate::Result;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use tracing::{debug, error, info};
use crate::thread_pool::{ThreadPool};

/// A tiny HTTP responder that answers every request with the same body.
/// It listens on a [`SocketAddr`](https://doc.rust-lang.org/std/net/enum.SocketAddr.html),
/// reads the request head, and answers `200 OK` on a thread from its [`ThreadPool`].
/// The request line, headers, and any request body are ignored.
///
/// It is the local target the `fanout` client is pointed at by default.
///
/// # Example
/// Serve `"ok"` on "127.0.0.1:37337" with 4 threads running on a shared queue thread pool
/// ```rust
/// use fanout::BodyServer;
/// use fanout::thread_pool::{SharedQueueThreadPool, ThreadPool};
/// # fn main() -> fanout::Result<()> {
/// let pool = SharedQueueThreadPool::new(4)?;
/// let server = BodyServer::new("ok", pool);
/// // server.run("127.0.0.1:37337")?;
/// # Ok(())
/// # }
/// ```
pub struct BodyServer<P: ThreadPool> {
    /// the body sent back for every request
    body: Arc<Vec<u8>>,
    /// the threads that serve connections
    pool: P,
}

impl<P: ThreadPool> BodyServer<P> {
    /// Create a new `BodyServer` answering with `body`, serving connections on `pool`.
    pub fn new(body: impl Into<Vec<u8>>, pool: P) -> Self {
        BodyServer {
            body: Arc::new(body.into()),
            pool,
        }
    }

    /// binds to the given address and serves connections until the process ends.
    ///
    /// # Errors
    /// returns an IO error if the address could not be bound
    pub fn run<A: ToSocketAddrs>(self, addr: A) -> Result<()> {
        let listener = TcpListener::bind(addr)?;
        info!("listening on {}", listener.local_addr()?);
        self.serve_listener(listener);
        Ok(())
    }

    /// serves connections arriving on an already bound `listener`, one pool job per connection
    pub fn serve_listener(self, listener: TcpListener) {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let body = Arc::clone(&self.body);
                    let spawned = self.pool.spawn(move || {
                        if let Err(e) = serve(&body, stream) {
                            error!("Error on serving client: {}", e);
                        }
                    });
                    if let Err(e) = spawned {
                        error!("Connection dropped, could not hand it to a thread: {}", e);
                    }
                }
                Err(e) => error!("Connection failed: {}", e),
            }
        }
    }
}

/// reads the request head from `tcp` up to the blank line, then writes the response and closes
fn serve(body: &[u8], tcp: TcpStream) -> Result<()> {
    let peer_addr = tcp.peer_addr()?;
    let mut reader = BufReader::new(&tcp);
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }

    let mut writer = BufWriter::new(&tcp);
    write!(
        writer,
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )?;
    writer.write_all(body)?;
    writer.flush()?;
    debug!("Response sent to {}", peer_addr);
    Ok(())
}
