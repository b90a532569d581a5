//! Otpgate server binary.

use otpgate_server::{load_config, OtpSection, OtpServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration from the path given on the command line, or fall
    // back to defaults.
    let (config, otp) = match std::env::args().nth(1) {
        Some(path) => load_config(&path)?,
        None => (ServerConfig::default(), OtpSection::default()),
    };

    // Create and run server
    let server = OtpServer::new(config, otp);
    server.run().await?;

    Ok(())
}
