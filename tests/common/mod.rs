#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use fanout::{BodyServer, NaiveThreadPool, ThreadPool};

/// starts a [`BodyServer`] answering `body` on an ephemeral port, returns its URL
pub fn spawn_body_server(body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = BodyServer::new(body, NaiveThreadPool::new(0).unwrap());
    thread::spawn(move || server.serve_listener(listener));
    format!("http://{}", addr)
}

/// starts a server whose n-th response body is `n`, returns its URL
pub fn spawn_counting_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || {
                let body = n.to_string();
                respond(
                    stream,
                    &format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    ),
                )
            });
        }
    });
    format!("http://{}", addr)
}

/// starts a server that answers every request with the raw `response`, returns its URL
pub fn spawn_raw_server(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || respond(stream, response));
        }
    });
    format!("http://{}", addr)
}

/// starts a server that accepts connections and never answers, returns its URL
pub fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    format!("http://{}", addr)
}

/// a URL on a port nothing is listening on
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn respond(stream: TcpStream, response: &str) {
    let mut reader = BufReader::new(&stream);
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line == "\r\n" => break,
            Ok(_) => {}
        }
    }
    let mut writer = &stream;
    let _ = writer.write_all(response.as_bytes());
    let _ = writer.flush();
}
