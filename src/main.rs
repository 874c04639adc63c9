// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use careloom::{
    api::{start_server, AppState},
    config::ServiceConfig,
    ocr::TesseractEngine,
};
use std::{env, net::SocketAddr, sync::Arc};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Careloom label splitter...\n");
    println!("📦 BUILD VERSION: {}", careloom::version::VERSION);
    println!("📅 Build Date: {}", careloom::version::BUILD_DATE);
    println!();

    // Parse environment variables for configuration
    let config = ServiceConfig::from_env();
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    // Probe the OCR engine before accepting uploads
    println!("🔍 Probing OCR engine at {}...", config.tesseract_cmd.display());
    let engine = TesseractEngine::new(&config.tesseract_cmd);
    let engine_ready = engine.probe().await;

    if engine_ready {
        println!("✅ OCR engine ready");
    } else {
        eprintln!(
            "⚠️  OCR engine not found at: {}",
            config.tesseract_cmd.display()
        );
        eprintln!("   The service will start but /split requests will fail.");
        eprintln!("   Set TESSERACT_CMD to the tesseract binary location.");
    }

    let state = AppState::new(Arc::new(engine), engine_ready);
    let server = tokio::spawn(start_server(state, addr));

    // Print service information
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("🎉 Careloom label splitter is running!");
    println!("{}", separator);
    println!("Port:           {}", port);
    println!("Engine:         {}", config.tesseract_cmd.display());
    println!("\nAPI Endpoints:");
    println!("  Health:       http://localhost:{}/health", port);
    println!("  Split:        POST http://localhost:{}/split", port);
    println!("\nTest with curl:");
    println!("  curl -X POST http://localhost:{}/split \\", port);
    println!("    -F 'file=@sheet.png' \\");
    println!("    -o care_blocks.zip");
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    tokio::select! {
        result = server => {
            result??;
        }
        _ = signal::ctrl_c() => {
            println!("\n⏹️  Shutting down...");
        }
    }

    println!("👋 Goodbye!");
    Ok(())
}
