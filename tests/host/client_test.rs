//! Host client against a console served over a loopback TCP socket.

use std::io::BufWriter;
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cam_console::camera::{CameraSettings, PixelFormat, Resolution, SimulatedCamera};
use cam_console::config::Config;
use cam_console::console::{Console, SessionStats};
use cam_console::host::{shuffle_bits, HostClient};
use pretty_assertions::assert_eq;

/// Serves exactly one client, then returns the session stats.
fn spawn_console(settings: CameraSettings) -> (String, JoinHandle<SessionStats>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr").to_string();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut config = Config::default();
        config.camera.retry_delay_ms = 0;
        let camera = SimulatedCamera::new(settings, config.camera.frame_memory_limit);
        let mut console = Console::from_config(&config, camera);
        let writer = BufWriter::new(stream.try_clone().expect("clone"));
        console.run(stream, writer).expect("session")
    });

    (addr, handle)
}

fn connect(addr: &str) -> HostClient<TcpStream> {
    let stream = TcpStream::connect(addr).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_millis(300)))
        .expect("timeout");
    HostClient::new(stream)
}

#[test]
fn test_send_line_round_trip() {
    let (addr, server) = spawn_console(CameraSettings::default());
    let mut client = connect(&addr);

    let reply = client.send_line("setResolution 9").unwrap();
    assert_eq!(
        reply,
        "Invalid <resolution> value, use \"setResolution --help\" for more details.\r\n"
    );

    drop(client);
    let stats = server.join().unwrap();
    assert_eq!(stats.lines, 1);
    assert_eq!(stats.failed, 1);
}

#[test]
fn test_settings_follow_reconfiguration() {
    let (addr, server) = spawn_console(CameraSettings::default());
    let mut client = connect(&addr);

    let before = client.camera_settings().unwrap();
    assert_eq!((before.width, before.height), (320, 240));
    assert_eq!(before.pixel_format(), Some(PixelFormat::Rgb565));

    client.send_line("setFormat 3").unwrap();
    let after = client.camera_settings().unwrap();
    assert_eq!(after.format, "GRAYSCALE");
    assert_eq!(after.frame_size().unwrap(), 320 * 240);

    drop(client);
    assert_eq!(server.join().unwrap().invoked, 3);
}

#[test]
fn test_photo_matches_device_pattern() {
    let settings = CameraSettings::default()
        .with_resolution(Resolution::Qqvga)
        .with_format(PixelFormat::Grayscale);
    let (addr, server) = spawn_console(settings);
    let mut client = connect(&addr);

    let (reported, raw) = client.request_photo().unwrap();
    assert_eq!(reported.frame_size().unwrap(), 160 * 120);
    assert_eq!(raw.len(), 160 * 120);
    // Pixel (x, y) is (x + y) % 256.
    assert_eq!(raw[0], 0);
    assert_eq!(raw[161], 2);

    let image = client.fetch_image(true).unwrap();
    assert_eq!((image.width, image.height), (160, 120));
    let v = shuffle_bits(1);
    assert_eq!(&image.pixels[3..6], &[v, v, v]);

    drop(client);
    server.join().unwrap();
}

#[test]
fn test_rgb_photo_writes_ppm() {
    let settings = CameraSettings::default().with_resolution(Resolution::Qqvga);
    let (addr, server) = spawn_console(settings);
    let mut client = connect(&addr);

    let image = client.fetch_image(false).unwrap();
    assert_eq!(image.pixels.len(), 160 * 120 * 3);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.ppm");
    image
        .write_ppm(std::fs::File::create(&path).unwrap())
        .unwrap();
    let written = std::fs::read(&path).unwrap();
    assert!(written.starts_with(b"P6\n160 120\n255\n"));
    assert_eq!(written.len(), "P6\n160 120\n255\n".len() + 160 * 120 * 3);

    drop(client);
    server.join().unwrap();
}
