use relview_subprocess::run_subprocess;
use std::env;
use std::path::PathBuf;
use tokio::task::LocalSet;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log to a file under the user's home; stdout belongs to the wire protocol.
fn setup_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    let trace_dir = home.join(".relview").join("trace");
    std::fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("relview.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(file).with_ansi(false))
        .with(EnvFilter::new("info"))
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    setup_tracing()?;

    let args: Vec<String> = env::args().collect();
    let mut workspace_roots: Vec<String> = vec![];
    let mut settings_path: Option<String> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--workspace-roots" => {
                i += 1;
                if i < args.len() {
                    workspace_roots = serde_json::from_str(&args[i])?;
                }
            }
            "--settings-path" => {
                i += 1;
                if i < args.len() {
                    settings_path = Some(args[i].clone());
                }
            }
            _ => {}
        }
        i += 1;
    }

    let local = LocalSet::new();
    local
        .run_until(run_subprocess(workspace_roots, settings_path))
        .await?;
    Ok(())
}
