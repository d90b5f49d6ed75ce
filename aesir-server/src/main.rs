use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use aesir_core::render::PlainTextRenderer;
use aesir_core::scheduler::TokioScheduler;
use aesir_core::tasks::YouTubeLiveChecker;
use aesir_core::{AesirBroadcast, DefaultHttpClient, HostServices};

mod console;
use console::{parse_line, ConsoleLine, ConsoleSink, OperatorPermissions};

#[derive(Parser, Debug, Clone)]
#[command(name = "aesirbroadcast")]
#[command(author, version, about = "AesirBroadcast - scheduled broadcasts and YouTube live announcements")]
struct Args {
    /// Directory holding config.yml
    #[arg(long, default_value = "plugins/aesirbroadcast")]
    data_dir: PathBuf,

    /// Player names that hold every aesirbroadcast.* permission
    #[arg(long, value_delimiter = ',')]
    operators: Vec<String>,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("aesir=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(sub).is_err() {
        eprintln!("tracing subscriber was already set");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    info!("AesirBroadcast starting. data_dir={}", args.data_dir.display());

    let host = HostServices {
        scheduler: Arc::new(TokioScheduler::current()?),
        sink: Arc::new(ConsoleSink),
        permissions: Arc::new(OperatorPermissions::new(args.operators.clone())),
        renderer: Arc::new(PlainTextRenderer),
        live_source: Arc::new(YouTubeLiveChecker::new(Arc::new(DefaultHttpClient::new()))),
    };

    let plugin = AesirBroadcast::new(&args.data_dir, host);
    if let Err(e) = plugin.initialize() {
        error!("Live checker not running: {}", e);
    }

    run_console(&plugin).await;

    plugin.shutdown();
    info!("Main finished. Goodbye!");
    Ok(())
}

/// Reads commands from stdin until `quit`, EOF or Ctrl-C.
async fn run_console(plugin: &AesirBroadcast) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            res = lines.next_line() => match res {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read console input: {}", e);
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down");
                break;
            }
        };

        match parse_line(&line) {
            ConsoleLine::Empty => {}
            ConsoleLine::Quit => break,
            ConsoleLine::Suggest { args } => {
                println!("{}", plugin.commands().suggest(&args).join(" "));
            }
            ConsoleLine::Execute { source, args } => {
                let response = plugin.commands().execute(&source, &args);
                for text in response.texts {
                    println!("[{}] {}", source.name(), text);
                }
            }
        }
    }
}
