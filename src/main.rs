use dealscout::application::agents::UserAgent;
use dealscout::application::client::SystemClient;
use dealscout::application::system::Application;
use dealscout::config::Config;

use tracing::{Level, info};
use tracing_subscriber::prelude::*;

// A writer that sends logs to the UI via a crossbeam channel
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).to_string();
        let _ = self.sender.try_send(msg);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (log_tx, log_rx) = crossbeam_channel::unbounded();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    info!("Starting DealScout {}...", env!("CARGO_PKG_VERSION"));

    // Runtime lives on its own thread; the UI owns the main thread
    let (system_tx, system_rx) = crossbeam_channel::bounded(1);

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to build Tokio runtime");

        rt.block_on(async move {
            let config = match Config::from_env() {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("Failed to load config: {}", e);
                    return;
                }
            };

            let app = match Application::build(config).await {
                Ok(app) => app,
                Err(e) => {
                    tracing::error!("Failed to build application: {}", e);
                    return;
                }
            };

            match app.start().await {
                Ok(handle) => {
                    let _ = system_tx.send(handle);
                    info!("Agents ready.");
                    std::future::pending::<()>().await;
                }
                Err(e) => {
                    tracing::error!("Failed to start application: {}", e);
                }
            }
        });
    });

    let system_handle = system_rx
        .recv()
        .map_err(|_| anyhow::anyhow!("Runtime exited before the system was ready"))?;

    let agent = UserAgent::new(SystemClient::new(system_handle, log_rx));

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_title("DealScout"),
        ..Default::default()
    };

    eframe::run_native(
        "DealScout",
        native_options,
        Box::new(|cc| {
            dealscout::interfaces::ui::configure_style(&cc.egui_ctx);
            Ok(Box::new(agent))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
