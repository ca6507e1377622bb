//! # Integration Tests
//!
//! Cross-crate end-to-end tests.
//!
//! Covers:
//! - Config resolution feeding the listener set
//! - Loopback UDP race: listeners -> decoder -> sync engine -> CSV export

#[cfg(test)]
mod config_tests {
    use config_loader::{parse_ports, ConfigFormat, ConfigLoader};

    #[test]
    fn test_config_file_ports_drive_listener_count() {
        let config = ConfigLoader::load_from_str(
            r#"
[listener]
ports = "5040-5036"
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let ports = parse_ports(&config.listener.ports).unwrap();
        assert_eq!(ports, [5040, 5039, 5038, 5037, 5036]);
        assert_eq!(config.effective_exporters().len(), 1);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::net::SocketAddr;
    use std::time::Duration;

    use async_channel::Receiver;
    use contracts::{ExporterConfig, ListenerConfig, RawPacket, VehicleId};
    use exporter::{create_exporters, export_all};
    use ingestion::{decode, IngestionPipeline, MockPacket, MockSimulator};
    use sync_engine::{RecordingSession, SessionEvent, SyncState};
    use tempfile::tempdir;

    fn loopback() -> ListenerConfig {
        ListenerConfig {
            bind_address: "127.0.0.1".to_string(),
            queue_capacity: 16,
            ..Default::default()
        }
    }

    /// Two cars over real UDP, interleaved as
    /// B off, A on, A on, B on, A off, B off.
    #[tokio::test]
    async fn test_e2e_two_car_race_to_csv() {
        let mut pipeline = IngestionPipeline::bind(&loopback(), &[0, 0]).await.unwrap();
        let endpoints = pipeline.endpoints().to_vec();
        let (a, a_addr) = endpoints[0].clone();
        let (b, b_addr) = endpoints[1].clone();
        let rx = pipeline.take_receiver().unwrap();
        pipeline.start_all().unwrap();

        let sim = MockSimulator::bind().await.unwrap();
        let script: [(&SocketAddr, bool, u32); 6] = [
            (&b_addr, false, 1),
            (&a_addr, true, 2),
            (&a_addr, true, 3),
            (&b_addr, true, 4),
            (&a_addr, false, 5),
            (&b_addr, false, 6),
        ];

        let mut session = RecordingSession::new();
        let mut events = Vec::new();
        for (addr, race_on, tick) in script {
            let data = MockPacket::driving(race_on, tick).build();
            sim.send(*addr, &data).await.unwrap();

            // One packet in flight at a time keeps the interleaving exact
            let packet = recv_one(&rx).await;
            let record = decode(&packet.payload).unwrap();
            events.push(session.push(&packet.vehicle_id, record).unwrap());
        }
        pipeline.stop_all();

        assert_eq!(events[3], SessionEvent::Started { vehicles: 2 });
        assert_eq!(events[4], SessionEvent::Recorded);
        assert_eq!(events[5], SessionEvent::Finished);
        assert_eq!(session.state(), SyncState::Recording);

        let ticks = |id: &VehicleId| -> Vec<u32> {
            session
                .registry()
                .get(id)
                .unwrap()
                .records()
                .iter()
                .map(|r| r.timestamp_ms / 16)
                .collect()
        };
        assert_eq!(ticks(&a), [2, 5]);
        assert_eq!(ticks(&b), [4, 6]);

        let dir = tempdir().unwrap();
        let mut exporters =
            create_exporters(&[ExporterConfig::csv("csv", dir.path().to_string_lossy())])
                .unwrap();
        let report = export_all(&mut exporters, &session.into_sessions()).await;
        assert!(report.is_success());
        assert_eq!(report.exported, 2);

        for id in [&a, &b] {
            let path = dir.path().join(format!("{}.csv", id.display_name()));
            let text = fs::read_to_string(path).unwrap();
            let rows: Vec<_> = text.lines().collect();
            assert_eq!(rows.len(), 3);
            assert!(rows[1].split(',').nth(1) == Some("true"));
            assert!(rows[2].split(',').nth(1) == Some("false"));
        }
    }

    /// A on, B off, A on, B on, A off, B off: A starts the run alone.
    #[tokio::test]
    async fn test_e2e_first_active_car_starts_alone() {
        let mut pipeline = IngestionPipeline::bind(&loopback(), &[0, 0]).await.unwrap();
        let endpoints = pipeline.endpoints().to_vec();
        let (a, a_addr) = endpoints[0].clone();
        let (b, b_addr) = endpoints[1].clone();
        let rx = pipeline.take_receiver().unwrap();
        pipeline.start_all().unwrap();

        let sim = MockSimulator::bind().await.unwrap();
        let script: [(&SocketAddr, bool, u32); 6] = [
            (&a_addr, true, 1),
            (&b_addr, false, 2),
            (&a_addr, true, 3),
            (&b_addr, true, 4),
            (&a_addr, false, 5),
            (&b_addr, false, 6),
        ];

        let mut session = RecordingSession::new();
        let mut events = Vec::new();
        for (addr, race_on, tick) in script {
            sim.send(*addr, &MockPacket::driving(race_on, tick).build())
                .await
                .unwrap();
            let packet = recv_one(&rx).await;
            let record = decode(&packet.payload).unwrap();
            events.push(session.push(&packet.vehicle_id, record).unwrap());
        }
        pipeline.stop_all();

        assert_eq!(events[0], SessionEvent::Started { vehicles: 1 });
        assert!(events[1..5].iter().all(|e| *e == SessionEvent::Recorded));
        assert_eq!(events[5], SessionEvent::Finished);

        let ticks = |id: &VehicleId| -> Vec<u32> {
            session
                .registry()
                .get(id)
                .unwrap()
                .records()
                .iter()
                .map(|r| r.timestamp_ms / 16)
                .collect()
        };
        assert_eq!(ticks(&a), [1, 3, 5]);
        assert_eq!(ticks(&b), [2, 4, 6]);
    }

    #[tokio::test]
    async fn test_e2e_short_datagram_is_dropped() {
        let mut pipeline = IngestionPipeline::bind(&loopback(), &[0]).await.unwrap();
        let (_, addr) = pipeline.endpoints()[0].clone();
        let rx = pipeline.take_receiver().unwrap();
        pipeline.start_all().unwrap();

        let sim = MockSimulator::bind().await.unwrap();
        sim.send(addr, &[0u8; 200]).await.unwrap();
        let packet = recv_one(&rx).await;
        assert_eq!(packet.payload.len(), 200);
        assert!(decode(&packet.payload).is_err());

        // A truncated buffer from the listener is still rejected
        let full = MockPacket::driving(true, 1).build();
        sim.send(addr, &full[..322]).await.unwrap();
        let packet = recv_one(&rx).await;
        assert!(decode(&packet.payload).is_err());

        sim.send(addr, &full).await.unwrap();
        let packet = recv_one(&rx).await;
        assert!(decode(&packet.payload).unwrap().is_race_on);

        pipeline.stop_all();
    }

    async fn recv_one(rx: &Receiver<RawPacket>) -> RawPacket {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap()
    }
}
