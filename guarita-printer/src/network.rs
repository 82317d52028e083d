//! Network print bridge (raw TCP, port 9100)
//!
//! Brother QL printers accept raster jobs on a raw TCP socket and answer
//! with 32-byte status blocks: one volunteered on connect, one after the
//! job. Discovery probes candidate hosts for that handshake.

use crate::bridge::{DiscoveredPrinter, PingReport, PrintBridge, PrintOutcome, PrintRequest};
use crate::error::{PrintError, PrintResult};
use crate::raster::{build_raster_job, load_image_uri};
use crate::status::{PrinterStatus, STATUS_LEN};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// ESC i S - status information request
const STATUS_REQUEST: [u8; 3] = [0x1B, 0x69, 0x53];

/// Network bridge to Brother QL printers.
#[derive(Debug, Clone)]
pub struct NetworkBridge {
    port: u16,
    connect_timeout: Duration,
    status_timeout: Duration,
    print_deadline: Duration,
    probe_hosts: Vec<String>,
}

impl Default for NetworkBridge {
    fn default() -> Self {
        Self {
            port: 9100,
            connect_timeout: Duration::from_secs(5),
            status_timeout: Duration::from_secs(2),
            print_deadline: Duration::from_secs(30),
            probe_hosts: Vec::new(),
        }
    }
}

impl NetworkBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the raw print port (default 9100)
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the overall print deadline
    pub fn with_print_deadline(mut self, deadline: Duration) -> Self {
        self.print_deadline = deadline;
        self
    }

    /// Candidate hosts checked during discovery
    pub fn with_probe_hosts(mut self, hosts: Vec<String>) -> Self {
        self.probe_hosts = hosts;
        self
    }

    fn addr(&self, ip_address: &str) -> PrintResult<SocketAddr> {
        let addr_str = format!("{}:{}", ip_address, self.port);
        addr_str
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr_str)))
    }

    async fn connect(&self, addr: SocketAddr) -> PrintResult<TcpStream> {
        tokio::time::timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", addr, e)))
    }

    /// Read the status block the printer volunteers on connect; quiet
    /// printers get an explicit `ESC i S` request first.
    async fn read_status(&self, stream: &mut TcpStream) -> PrintResult<PrinterStatus> {
        let mut block = [0u8; STATUS_LEN];
        match tokio::time::timeout(self.status_timeout, stream.read_exact(&mut block)).await {
            Ok(Ok(_)) => return PrinterStatus::parse(&block),
            Ok(Err(e)) => {
                return Err(PrintError::Connection(format!("Status read failed: {}", e)));
            }
            Err(_) => {}
        }

        stream.write_all(&STATUS_REQUEST).await?;
        stream.flush().await?;
        match tokio::time::timeout(self.status_timeout, stream.read_exact(&mut block)).await {
            Ok(Ok(_)) => PrinterStatus::parse(&block),
            Ok(Err(e)) => Err(PrintError::Connection(format!("Status read failed: {}", e))),
            Err(_) => Err(PrintError::Timeout("No status block from printer".into())),
        }
    }

    async fn print_inner(&self, request: &PrintRequest, job: Vec<u8>) -> PrintResult<PrintOutcome> {
        let addr = self.addr(&request.ip_address)?;
        let mut stream = self.connect(addr).await?;

        let status = self.read_status(&mut stream).await?;
        if !status.is_ready() {
            return Err(PrintError::NotReady(status.error_summary()));
        }

        info!(bytes = job.len(), "sending raster job");
        stream.write_all(&job).await?;
        stream.flush().await?;

        // completion status; a printer that just closes the socket after
        // accepting the job still counts as dispatched
        let mut block = [0u8; STATUS_LEN];
        match stream.read_exact(&mut block).await {
            Ok(_) => {
                let done = PrinterStatus::parse(&block)?;
                if !done.is_ready() {
                    return Err(PrintError::NotReady(done.error_summary()));
                }
                Ok(PrintOutcome::success("Print job completed successfully"))
            }
            Err(e) => {
                warn!(error = %e, "no completion status, job was fully written");
                Ok(PrintOutcome::success("Print job sent"))
            }
        }
    }

    async fn probe(&self, host: String) -> Option<DiscoveredPrinter> {
        let addr = self.addr(&host).ok()?;
        let mut stream = tokio::time::timeout(self.status_timeout, TcpStream::connect(addr))
            .await
            .ok()?
            .ok()?;
        let status = self.read_status(&mut stream).await.ok()?;
        Some(DiscoveredPrinter {
            ip_address: host,
            model_name: status.model.map(|m| m.as_str().replace('_', "-")),
            serial_number: None,
        })
    }
}

#[async_trait::async_trait]
impl PrintBridge for NetworkBridge {
    #[instrument(skip(self, request), fields(ip = %request.ip_address, uri = %request.image_uri))]
    async fn print_image(&self, request: &PrintRequest) -> PrintResult<PrintOutcome> {
        if request.ip_address.is_empty() {
            return Err(PrintError::InvalidConfig("Printer IP not configured".into()));
        }

        // decode and rasterize off the async path
        let uri = request.image_uri.clone();
        let (model, label) = (request.model, request.label_size);
        let job = tokio::task::spawn_blocking(move || {
            let img = load_image_uri(&uri)?;
            build_raster_job(&img, model, label)
        })
        .await
        .map_err(|e| PrintError::Image(format!("Raster task failed: {}", e)))??;

        tokio::time::timeout(self.print_deadline, self.print_inner(request, job))
            .await
            .map_err(|_| {
                PrintError::Timeout(format!(
                    "Print operation timed out after {} seconds",
                    self.print_deadline.as_secs()
                ))
            })?
    }

    #[instrument(skip(self))]
    async fn ping_printer(&self, ip_address: &str) -> PingReport {
        let addr = match self.addr(ip_address) {
            Ok(addr) => addr,
            Err(e) => {
                return PingReport {
                    available: false,
                    ip_address: None,
                    error: Some(e.to_string()),
                };
            }
        };

        let check_timeout = Duration::from_millis(500);
        match tokio::time::timeout(check_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_)) => {
                info!("Printer online");
                PingReport {
                    available: true,
                    ip_address: Some(ip_address.to_string()),
                    error: None,
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                PingReport {
                    available: false,
                    ip_address: Some(ip_address.to_string()),
                    error: Some(e.to_string()),
                }
            }
            Err(_) => PingReport {
                available: false,
                ip_address: Some(ip_address.to_string()),
                error: Some("Connection timeout".into()),
            },
        }
    }

    #[instrument(skip(self))]
    async fn discover_printers(&self, timeout: Duration) -> PrintResult<Vec<DiscoveredPrinter>> {
        let per_host = timeout.min(Duration::from_secs(2));
        let probes = self.probe_hosts.iter().map(|host| {
            let bridge = self.clone();
            let host = host.clone();
            async move { tokio::time::timeout(per_host, bridge.probe(host)).await.ok().flatten() }
        });

        let found: Vec<DiscoveredPrinter> = futures::future::join_all(probes)
            .await
            .into_iter()
            .flatten()
            .collect();
        info!(count = found.len(), "discovery finished");
        Ok(found)
    }
}
