//! HTTP API server command.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::server;

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    if settings.api_key().is_none() {
        Output::warning("OPENAI_API_KEY is not set; every chat request will get an apology.");
    }

    let orchestrator = Orchestrator::new(settings)?;

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("vidchat API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Status", "GET  /");
    Output::kv("Chat", "POST /chat/{video_id}  {\"message\": \"...\"}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    server::serve(listener, orchestrator.handler()).await?;

    Ok(())
}
