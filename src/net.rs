//! Background network worker.
//!
//! The frame loop must keep drawing while a request is in flight, so requests
//! are handed to a single worker thread over a channel and their completions
//! come back over another. The frame loop drains completions once per frame
//! and applies them itself; session state never leaves that thread.

use crate::api::GameApi;
use crate::session::{Completion, Request};
use log::{error, info};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

pub struct NetWorker {
    requests: Option<Sender<Request>>,
    completions: Receiver<Completion>,
    handle: Option<JoinHandle<()>>,
    in_flight: usize,
}

impl NetWorker {
    /// Spawn the worker thread. It owns `api` for its whole life.
    pub fn spawn<A>(api: A) -> std::io::Result<Self>
    where
        A: GameApi + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<Request>();
        let (completion_tx, completion_rx) = mpsc::channel::<Completion>();

        let handle = thread::Builder::new()
            .name("whatbeats-net".to_string())
            .spawn(move || {
                crate::debug_net!("Network worker started");
                for request in request_rx {
                    let completion = request.execute(&api);
                    if completion_tx.send(completion).is_err() {
                        // Frame loop is gone; nothing left to report to.
                        break;
                    }
                }
                crate::debug_net!("Network worker stopped");
            })?;

        Ok(NetWorker {
            requests: Some(request_tx),
            completions: completion_rx,
            handle: Some(handle),
            in_flight: 0,
        })
    }

    /// Queue a request. Returns false if the worker has died.
    pub fn submit(&mut self, request: Request) -> bool {
        let Some(requests) = &self.requests else {
            return false;
        };
        crate::debug_net!("Queueing {:?}", request);
        match requests.send(request) {
            Ok(()) => {
                self.in_flight += 1;
                true
            }
            Err(_) => {
                error!(target: "net", "Network worker is not running; request dropped");
                false
            }
        }
    }

    /// Everything that finished since the last call, in completion order.
    pub fn poll(&mut self) -> Vec<Completion> {
        let mut done = Vec::new();
        loop {
            match self.completions.try_recv() {
                Ok(completion) => done.push(completion),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.in_flight > done.len() {
                        error!(target: "net", "Network worker exited with requests in flight");
                    }
                    break;
                }
            }
        }
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[cfg(test)]
    pub fn wait(&mut self, timeout: std::time::Duration) -> Option<Completion> {
        let completion = self.completions.recv_timeout(timeout).ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }
}

impl Drop for NetWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!(target: "net", "Network worker panicked");
            } else {
                info!(target: "net", "Network worker joined");
            }
        }
    }
}
