use odoo_mcp_server::config::ServerConfig;
use odoo_mcp_server::gateway::Gateway;
use odoo_mcp_server::server::McpServer;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("odoo-mcp-server: configuration error: {e}");
            std::process::exit(1);
        }
    };

    if config.readonly {
        eprintln!("odoo-mcp-server: READONLY_MODE is enabled. Write operations are disabled.");
    }

    let mut server = McpServer::new(Gateway::new(&config));
    if let Err(e) = server.run().await {
        eprintln!("odoo-mcp-server: fatal error: {e}");
        std::process::exit(1);
    }
}
