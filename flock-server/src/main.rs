#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use clap::Parser;
use flock::NodeConfig;
use flock_http::serve;

#[derive(Parser)]
#[command(name = "flock", about = "A self-organizing cluster node with a replicated counter")]
struct Cli {
    /// Port to listen on; shorthand for a loopback bind address and node id.
    #[arg(long, env = "FLOCK_PORT")]
    port: Option<u16>,

    /// Address to bind the API listener to, e.g. 0.0.0.0:8010.
    #[arg(long, env = "FLOCK_BIND_ADDR")]
    bind_addr: Option<String>,

    /// Address other nodes dial us back on.
    #[arg(long, env = "FLOCK_NODE_ID")]
    node_id: Option<String>,

    /// Comma separated seed peers to join at startup.
    #[arg(long, env = "FLOCK_PEERS")]
    peers: Option<String>,

    /// Directory holding node.json, if any.
    #[arg(long, env = "FLOCK_DATA_DIR", default_value = "./data")]
    data_dir: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = NodeConfig::load_or_default(std::path::Path::new(&cli.data_dir));

    // Flags override node.json. --port mirrors the single-machine workflow:
    // each node is localhost:<port> to its peers.
    if let Some(port) = cli.port {
        config.bind_addr = format!("127.0.0.1:{}", port);
        config.node_id = format!("localhost:{}", port);
    }
    if let Some(bind_addr) = cli.bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(peers) = cli.peers {
        config.peers = peers
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
    }

    serve(config).await
}
