use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8420;

/// How many consecutive ports are checked and tried.
const PORT_ATTEMPTS: u16 = 10;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on (the next free one is used if taken)
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Don't open the browser automatically
    #[arg(long)]
    pub no_open: bool,
}

pub fn run(home: &Path, args: &ServeArgs) -> Result<()> {
    if args.port != 0 {
        if let Some(port) = find_running_instance(args.port) {
            let url = format!("http://localhost:{port}");
            println!("Claude Code Manager is already running at {url}");
            if !args.no_open {
                ccm_server::open_browser(&url);
            }
            return Ok(());
        }
    }

    let rt = tokio::runtime::Runtime::new()?;
    let home = home.to_path_buf();
    let requested = args.port;
    let open_browser = !args.no_open;

    rt.block_on(async move {
        let listener = bind(requested).await?;
        let actual_port = listener.local_addr()?.port();
        if requested != 0 && actual_port != requested {
            println!("Port {requested} is in use, using {actual_port} instead");
        }
        println!("Claude Code Manager → http://localhost:{actual_port}  (Ctrl-C to stop)");

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        ccm_server::serve_on(home, listener, open_browser, shutdown).await
    })
}

fn candidate_ports(start: u16) -> impl Iterator<Item = u16> {
    (0..PORT_ATTEMPTS).map_while(move |i| start.checked_add(i))
}

/// Look for a dashboard already answering on one of the candidate ports.
fn find_running_instance(start: u16) -> Option<u16> {
    let agent = ureq::AgentBuilder::new().timeout(HEALTH_TIMEOUT).build();
    candidate_ports(start).find(|&port| {
        let url = format!("http://127.0.0.1:{port}/api/health");
        let Ok(response) = agent.get(&url).call() else {
            return false;
        };
        response
            .into_string()
            .is_ok_and(|body| is_manager_health(&body))
    })
}

fn is_manager_health(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body).is_ok_and(|v| {
        v["status"] == "ok" && v["service"] == ccm_server::SERVICE_NAME
    })
}

/// Bind the first free port starting at `start`.
async fn bind(start: u16) -> Result<tokio::net::TcpListener> {
    if start == 0 {
        return tokio::net::TcpListener::bind(("127.0.0.1", 0))
            .await
            .context("failed to bind an ephemeral port");
    }
    let mut last_err = None;
    for port in candidate_ports(start) {
        match tokio::net::TcpListener::bind(("127.0.0.1", port)).await {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                tracing::debug!(port, error = %e, "port unavailable");
                last_err = Some(e);
            }
        }
    }
    Err(anyhow!(
        "no free port in {start}..{}: {}",
        start.saturating_add(PORT_ATTEMPTS - 1),
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}
