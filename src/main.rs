//! camconsole - text command console for a camera sensor.

mod cli;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use cam_console::camera::{CameraDevice, SimulatedCamera};
use cam_console::config::Config;
use cam_console::console::Console;
use cam_console::error::{ConsoleError, Result};
use cam_console::host::HostClient;
use cam_console::logging;
use cli::{ClientAction, ClientArgs, Cli, Command, ServeArgs};
use tracing::{error, info, warn};

fn main() {
    let cli = Cli::parse_args();

    logging::init(&cli.log_target());

    if let Err(e) = run(cli) {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    match cli.command {
        Command::Serve(args) => serve(&config, &args),
        Command::Client(args) => client(&args),
    }
}

/// Builds the camera and applies the startup settings.
fn setup_camera(config: &Config) -> Result<SimulatedCamera> {
    let settings = config.camera.settings();
    let mut camera = SimulatedCamera::new(settings, config.camera.frame_memory_limit)
        .with_failures(config.camera.fail_first_attempts);
    camera.configure(settings, &config.camera.setup_policy())?;
    Ok(camera)
}

fn serve(config: &Config, args: &ServeArgs) -> Result<()> {
    let camera = setup_camera(config)?;
    let mut console = Console::from_config(config, camera);
    for degraded in console.registry().degraded() {
        warn!(
            position = degraded.position,
            "Command unavailable: {}", degraded.reason
        );
    }

    if args.stdio {
        let stdout = io::stdout();
        console.run(io::stdin().lock(), BufWriter::new(stdout.lock()))?;
        return Ok(());
    }

    let addr = args.listen.as_deref().unwrap_or(&config.server.listen);
    let listener = TcpListener::bind(addr)?;
    info!("Listening on {}", listener.local_addr()?);

    // One client at a time; the next connection waits until this one hangs up.
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                warn!("Accept failed: {e}");
                continue;
            }
        };
        let peer = stream.peer_addr()?;
        info!(%peer, "Client connected");
        let writer = BufWriter::new(stream.try_clone()?);
        match console.run(stream, writer) {
            Ok(stats) => info!(%peer, lines = stats.lines, "Client disconnected"),
            Err(ConsoleError::Io(e)) => warn!(%peer, "Connection dropped: {e}"),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn client(args: &ClientArgs) -> Result<()> {
    let stream = TcpStream::connect(&args.addr)?;
    stream.set_read_timeout(Some(Duration::from_secs(args.timeout.max(1))))?;
    let mut client = HostClient::new(stream);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &args.action {
        ClientAction::Send { line } => {
            let reply = client.send_line(line)?;
            out.write_all(reply.as_bytes())?;
        }
        ClientAction::Settings => {
            let settings = client.camera_settings()?;
            writeln!(
                out,
                "Camera Resolution: {}x{}; Format: {}",
                settings.width, settings.height, settings.format
            )?;
        }
        ClientAction::Photo {
            output,
            no_bit_shuffle,
        } => {
            let image = client.fetch_image(!no_bit_shuffle)?;
            image.write_ppm(BufWriter::new(File::create(output)?))?;
            writeln!(
                out,
                "Saved {}x{} image to {}",
                image.width,
                image.height,
                output.display()
            )?;
        }
    }
    Ok(())
}
