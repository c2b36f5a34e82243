//! Poll one vacuum and print its status.
//!
//! Run with:
//!   cargo run --example poll-state -- 192.168.1.50 <auth-code>

use cleanmate::device::Device;
use cleanmate::transport::ConnectionConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let host = args.next().ok_or("usage: poll-state <host> <auth-code>")?;
    let auth_code = args.next().ok_or("usage: poll-state <host> <auth-code>")?;

    let mut device = Device::tcp(host, auth_code, ConnectionConfig::default());
    device.connect()?;
    eprintln!("Connected to {device}");

    let response = device.poll_state()?;
    println!("{response:#}");
    println!("{:#?}", device.state());

    device.disconnect();
    Ok(())
}
