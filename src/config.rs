//! Immutable startup parameters (spec.md §3 `ServerConfig`, `Authority`).
//!
//! Grounded on the teacher's `limits.rs`: a plain `Default`-deriving struct
//! carrying the spec's concrete defaults, assembled once in `main` and
//! handed down as an `Arc<ServerConfig>`. No file-based configuration layer
//! is introduced — see SPEC_FULL.md §10.3.

use std::path::PathBuf;
use std::time::Duration;

/// Parameters fixed for the lifetime of the server process.
#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) bind_host: String,
    pub(crate) bind_port: u16,
    pub(crate) worker_count: usize,
    pub(crate) document_root: PathBuf,
    pub(crate) upload_subdir: String,
    pub(crate) idle_timeout: Duration,
    pub(crate) max_requests_per_connection: usize,
    pub(crate) max_request_bytes: usize,
    pub(crate) listen_backlog: u32,
}

impl ServerConfig {
    pub(crate) fn new(bind_host: String, bind_port: u16, worker_count: usize) -> Self {
        ServerConfig {
            bind_host,
            bind_port,
            worker_count,
            document_root: PathBuf::from("resources"),
            upload_subdir: "uploads".to_string(),
            idle_timeout: Duration::from_secs(30),
            max_requests_per_connection: 100,
            max_request_bytes: 8192,
            listen_backlog: 50,
        }
    }

    pub(crate) fn authority(&self) -> Authority {
        Authority::new(&self.bind_host, self.bind_port)
    }

    pub(crate) fn upload_dir(&self) -> PathBuf {
        self.document_root.join(&self.upload_subdir)
    }
}

/// The set of `Host` header values the server answers for (spec.md §3,
/// GLOSSARY). `localhost` and `127.0.0.1` are treated as interchangeable
/// aliases of each other and of the bound host, with and without the port —
/// see spec.md §9's open question about widening this set for non-loopback
/// binds.
#[derive(Debug, Clone)]
pub(crate) struct Authority {
    host_literals: Vec<String>,
}

impl Authority {
    pub(crate) fn new(bind_host: &str, port: u16) -> Self {
        let mut hosts = vec![bind_host.to_string(), "localhost".to_string()];
        if bind_host != "127.0.0.1" {
            hosts.push("127.0.0.1".to_string());
        }

        let mut host_literals = Vec::with_capacity(hosts.len() * 2);
        for host in hosts {
            host_literals.push(format!("{host}:{port}"));
            host_literals.push(host);
        }

        Authority { host_literals }
    }

    /// Case-sensitive membership test against the authority set. The
    /// caller (the host guard) is responsible for trimming surrounding
    /// whitespace before calling this.
    pub(crate) fn allows(&self, observed: &str) -> bool {
        self.host_literals.iter().any(|literal| literal == observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_bind_accepts_localhost_and_127_aliases() {
        let authority = Authority::new("127.0.0.1", 8080);
        assert!(authority.allows("127.0.0.1:8080"));
        assert!(authority.allows("127.0.0.1"));
        assert!(authority.allows("localhost:8080"));
        assert!(authority.allows("localhost"));
        assert!(!authority.allows("evil.com"));
    }

    #[test]
    fn non_loopback_bind_still_widens_to_include_loopback_aliases() {
        let authority = Authority::new("0.0.0.0", 8080);
        assert!(authority.allows("0.0.0.0:8080"));
        assert!(authority.allows("localhost:8080"));
        assert!(authority.allows("127.0.0.1:8080"));
    }
}
