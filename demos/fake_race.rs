//! Fake Race Demo
//!
//! Plays a short scripted race to a set of recorder ports, one car per
//! port. Each car idles in the lobby, races, then sits on the results
//! screen, with staggered start and finish times.
//!
//! Run with: cargo run -p demos --bin fake_race -- 5030-5032 [host]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use config_loader::parse_ports;
use ingestion::{MockPacket, MockSimulator};

const TICK: Duration = Duration::from_millis(16);
const LOBBY_TICKS: u32 = 60;
const RACE_TICKS: u32 = 600;
const RESULTS_TICKS: u32 = 120;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let spec = std::env::args().nth(1).unwrap_or_else(|| "5030-5032".to_string());
    let host: IpAddr = match std::env::args().nth(2) {
        Some(host) => host.parse()?,
        None => IpAddr::V4(Ipv4Addr::LOCALHOST),
    };
    let ports = parse_ports(&spec)?;

    tracing::info!(ports = ?ports, %host, "Starting fake race");

    let mut cars = Vec::with_capacity(ports.len());
    for (index, port) in ports.into_iter().enumerate() {
        let target = SocketAddr::new(host, port);
        let sim = MockSimulator::bind().await?;
        let stagger = index as u32 * 20;

        cars.push(tokio::spawn(async move {
            let script = car_script(index as u8 + 1, stagger);
            let sent = sim.play(target, &script, TICK).await?;
            tracing::info!(%target, sent, "Car finished script");
            Ok::<_, std::io::Error>(())
        }));
    }

    for car in cars {
        car.await??;
    }

    tracing::info!("Fake race complete");
    Ok(())
}

/// Lobby (race off), race (race on), results (race off)
fn car_script(grid_position: u8, stagger: u32) -> Vec<Vec<u8>> {
    let lobby = LOBBY_TICKS + stagger;
    let race = RACE_TICKS + stagger;

    (0..lobby + race + RESULTS_TICKS)
        .map(|tick| {
            let racing = tick >= lobby && tick < lobby + race;
            MockPacket::driving(racing, tick)
                .race_position(grid_position)
                .build()
        })
        .collect()
}
