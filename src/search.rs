//! Live search boxes: one [`SearchSession`] per list, lookups run on a
//! background [`SearchWorker`].
//!
//! Every query edit issues a new request with a higher sequence number.
//! Only the response to the newest request is applied, so a slow answer to
//! an older query cannot overwrite results for the current one.
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::acl::ListKind;
use crate::directory::UserDirectory;
use crate::error::Result;

/// A lookup request handed to the worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTicket {
    pub kind: ListKind,
    pub seq: u64,
    pub query: String,
}

/// Worker reply for one ticket.
#[derive(Debug)]
pub struct SearchResponse {
    pub kind: ListKind,
    pub seq: u64,
    pub result: Result<Vec<String>>,
}

#[derive(Debug)]
pub struct SearchSession {
    pub kind: ListKind,
    pub query: String,
    pub results: Vec<String>,
    pub selected: usize,
    issued: u64,
}

impl SearchSession {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            issued: 0,
        }
    }

    /// Sequence number of the most recent request (or clear).
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    pub fn push_char(&mut self, c: char) -> Option<SearchTicket> {
        self.query.push(c);
        self.issue()
    }

    pub fn pop_char(&mut self) -> Option<SearchTicket> {
        self.query.pop();
        self.issue()
    }

    pub fn set_query(&mut self, query: &str) -> Option<SearchTicket> {
        self.query = query.to_string();
        self.issue()
    }

    /// Drop the query and results; anything still in flight becomes stale.
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.selected = 0;
        self.issued += 1;
    }

    /// Results are cleared on every edit; a blank query issues nothing.
    fn issue(&mut self) -> Option<SearchTicket> {
        self.issued += 1;
        self.results.clear();
        self.selected = 0;
        let q = self.query.trim();
        if q.is_empty() {
            return None;
        }
        Some(SearchTicket {
            kind: self.kind,
            seq: self.issued,
            query: q.to_string(),
        })
    }

    /// Apply a worker reply. Returns `false` when it answers a superseded request.
    ///
    /// A failed lookup counts as no results.
    pub fn accept(&mut self, seq: u64, result: Result<Vec<String>>) -> bool {
        if seq != self.issued {
            tracing::debug!(seq, latest = self.issued, "discarding stale search response");
            return false;
        }
        self.results = match result {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(query = %self.query, error = %e, "user lookup failed");
                Vec::new()
            }
        };
        self.selected = 0;
        true
    }

    pub fn selected_result(&self) -> Option<&str> {
        self.results.get(self.selected).map(String::as_str)
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 { self.selected -= 1; }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.results.len() { self.selected += 1; }
    }
}

/// Runs directory lookups off the UI thread.
///
/// The thread exits once the worker is dropped.
pub struct SearchWorker {
    requests: Sender<SearchTicket>,
    responses: Receiver<SearchResponse>,
}

impl SearchWorker {
    pub fn spawn(directory: Arc<dyn UserDirectory>) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<SearchTicket>();
        let (resp_tx, resp_rx) = mpsc::channel::<SearchResponse>();
        thread::spawn(move || {
            for ticket in req_rx {
                let result = directory.lookup(&ticket.query);
                let resp = SearchResponse {
                    kind: ticket.kind,
                    seq: ticket.seq,
                    result,
                };
                if resp_tx.send(resp).is_err() {
                    break;
                }
            }
        });
        Self {
            requests: req_tx,
            responses: resp_rx,
        }
    }

    pub fn submit(&self, ticket: SearchTicket) {
        tracing::trace!(query = %ticket.query, seq = ticket.seq, "search submitted");
        if self.requests.send(ticket).is_err() {
            tracing::error!("search worker has stopped");
        }
    }

    /// All responses that arrived since the last call, without blocking.
    pub fn drain(&self) -> Vec<SearchResponse> {
        self.responses.try_iter().collect()
    }

    /// Block until the next response arrives or the worker stops.
    pub fn recv(&self) -> Option<SearchResponse> {
        self.responses.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::simple_error;

    #[test]
    fn blank_query_issues_nothing() {
        let mut s = SearchSession::new(ListKind::Allow);
        assert!(s.set_query("   ").is_none());
        let t = s.push_char('a').unwrap();
        assert_eq!(t.query, "a");
        assert_eq!(t.kind, ListKind::Allow);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut s = SearchSession::new(ListKind::Block);
        let first = s.push_char('a').unwrap();
        let second = s.push_char('l').unwrap();
        assert!(second.seq > first.seq);

        assert!(s.accept(second.seq, Ok(vec!["alice".into()])));
        assert!(!s.accept(first.seq, Ok(vec!["adam".into(), "alice".into()])));
        assert_eq!(s.results, vec!["alice".to_string()]);
    }

    #[test]
    fn clear_invalidates_in_flight_request() {
        let mut s = SearchSession::new(ListKind::Allow);
        let t = s.push_char('b').unwrap();
        s.clear();
        assert!(!s.accept(t.seq, Ok(vec!["bob".into()])));
        assert!(s.results.is_empty());
    }

    #[test]
    fn failed_lookup_means_no_results() {
        let mut s = SearchSession::new(ListKind::Allow);
        let t = s.set_query("x").unwrap();
        assert!(s.accept(t.seq, Err(simple_error("network down"))));
        assert!(s.results.is_empty());
        assert_eq!(s.selected_result(), None);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut s = SearchSession::new(ListKind::Allow);
        let t = s.set_query("a").unwrap();
        s.accept(t.seq, Ok(vec!["a1".into(), "a2".into()]));
        s.move_up();
        assert_eq!(s.selected_result(), Some("a1"));
        s.move_down();
        s.move_down();
        assert_eq!(s.selected_result(), Some("a2"));
    }
}
