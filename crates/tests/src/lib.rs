//! # Integration Tests
//!
//! End-to-end tests across the workspace crates.
//!
//! Covers:
//! - Batch and streaming extraction over file and memory transports
//! - Randomised packet mixes
//! - Configuration files driving a session
//! - The C boundary, called from Rust

pub mod fixture;

#[cfg(test)]
mod e2e_tests {
    use approx::assert_relative_eq;
    use contracts::{ErrorKind, InclinationReading, ScanError, SessionState, TransportConfig};
    use ingestion::MemoryTransport;
    use scan_session::{
        inclinations_from_path, inclinations_from_transport, Advance, Reader, StreamingSession,
    };

    use crate::fixture::StreamBuilder;

    fn memory(builder: &StreamBuilder, chunk_packets: usize) -> MemoryTransport {
        let config = TransportConfig::default().with_chunk_packets(chunk_packets);
        MemoryTransport::new(builder.build(), config).unwrap()
    }

    /// Three inclinations without any time packet: every reading sits at clock zero
    #[test]
    fn test_three_inclination_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.rxp");
        StreamBuilder::new()
            .inclination(100, 200)
            .inclination(300, 400)
            .inclination(-50, -60)
            .write_to(&path)
            .unwrap();

        let readings = inclinations_from_path(&path, false).unwrap();
        assert_eq!(
            readings,
            vec![
                InclinationReading::new(0.0, 0.1, 0.2),
                InclinationReading::new(0.0, 0.3, 0.4),
                InclinationReading::new(0.0, -0.05, -0.06),
            ]
        );
    }

    /// Each reading carries the clock value at the moment its packet was dispatched
    #[test]
    fn test_readings_follow_decode_clock() {
        let builder = StreamBuilder::new()
            .clock_config(10_000)
            .internal_time(12_345)
            .inclination(-8442, -981)
            .other(0x0400, &[0; 32])
            .internal_time(677_494)
            .inclination(-8451, -1004);

        let readings = inclinations_from_transport(memory(&builder, 2), false).unwrap();
        assert_eq!(readings.len(), 2);
        assert_relative_eq!(readings[0].time, 1.2345, epsilon = 1e-12);
        assert_relative_eq!(readings[0].roll, -8.442, epsilon = 1e-3);
        assert_relative_eq!(readings[0].pitch, -0.981, epsilon = 1e-3);
        assert_relative_eq!(readings[1].time, 67.7494, epsilon = 1e-4);
        assert_relative_eq!(readings[1].roll, -8.451, epsilon = 1e-3);
        assert_relative_eq!(readings[1].pitch, -1.004, epsilon = 1e-3);
    }

    #[test]
    fn test_pps_time_base() {
        let builder = StreamBuilder::new()
            .internal_time(2_000_000)
            .inclination(0, 0)
            .pps_sync(3_000_000, 1_700_000_000)
            .internal_time(3_250_000)
            .inclination(0, 0);

        let free = inclinations_from_transport(memory(&builder, 64), false).unwrap();
        assert_eq!(free[0].time, 2.0);
        assert_eq!(free[1].time, 3.25);

        let synced = inclinations_from_transport(memory(&builder, 64), true).unwrap();
        assert_eq!(synced[0].time, 2.0);
        assert_eq!(synced[1].time, 1_700_000_000.25);
    }

    /// Streaming never accumulates; batch keeps everything
    #[test]
    fn test_streaming_versus_batch() {
        let builder = StreamBuilder::new()
            .inclination(1, 1)
            .inclination(2, 2)
            .internal_time(1_000_000)
            .other(0x0300, b"abc")
            .inclination(3, 3)
            .other(0x0300, b"");

        let mut session = StreamingSession::from_transport(memory(&builder, 2), false);
        let mut streamed = Vec::new();
        let mut lengths = Vec::new();
        while let Advance::Readings(readings) = session.advance().unwrap() {
            lengths.push(readings.len());
            streamed.extend_from_slice(readings);
        }
        assert_eq!(lengths, vec![2, 0, 1]);
        assert_eq!(session.state(), SessionState::Exhausted);

        let batch = inclinations_from_transport(memory(&builder, 2), false).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(streamed, batch);
    }

    #[test]
    fn test_end_of_input_query_is_idempotent() {
        let builder = StreamBuilder::new().inclination(1, 1).inclination(2, 2);
        let mut session = StreamingSession::from_transport(memory(&builder, 1), false);

        for _ in 0..3 {
            assert!(!session.is_end_of_input());
        }
        session.advance().unwrap();
        assert!(!session.is_end_of_input());
        session.advance().unwrap();
        for _ in 0..3 {
            assert!(session.is_end_of_input());
        }

        assert!(session.advance().unwrap().is_end_of_input());
        assert!(matches!(session.advance(), Err(ScanError::Exhausted)));
        assert!(session.is_end_of_input());
    }

    #[test]
    fn test_nonexistent_path() {
        let err = inclinations_from_path("/nonexistent/scan.rxp", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Open);
        assert!(!err.to_string().is_empty());

        let err = StreamingSession::open("/nonexistent/scan.rxp", true)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Open);
    }

    #[test]
    fn test_not_a_scan_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Time,Roll,Pitch\n0,0.1,0.2\n").unwrap();
        let err = inclinations_from_path(&path, false).unwrap_err();
        assert!(matches!(err, ScanError::OpenFailure { .. }));
    }

    /// A malformed packet fails batch mode; streaming has already delivered earlier chunks
    #[test]
    fn test_malformed_packet_mid_stream() {
        let builder = StreamBuilder::new()
            .inclination(1, 1)
            .inclination(2, 2)
            .raw(contracts::packet_id::INCLINATION, &[0; 5])
            .inclination(3, 3);

        let err = inclinations_from_transport(memory(&builder, 2), false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let mut session = StreamingSession::from_transport(memory(&builder, 2), false);
        assert_eq!(session.advance().unwrap().readings().unwrap().len(), 2);
        assert!(matches!(session.advance(), Err(ScanError::DecodeFailure { .. })));

        // the packet after the bad one is never decoded
        assert!(matches!(session.advance(), Err(ScanError::DecodeFailure { .. })));
        assert_eq!(session.state(), SessionState::Failed);
        assert!(session.readings().is_empty());
    }

    /// Opaque packet declaring more than the payload limit, hiding an inclination
    #[test]
    fn test_oversized_packet_never_yields_readings() {
        let mut hidden = contracts::packet_id::INCLINATION.to_le_bytes().to_vec();
        hidden.extend_from_slice(&8u32.to_le_bytes());
        hidden.extend_from_slice(&123_456i32.to_le_bytes());
        hidden.extend_from_slice(&(-7i32).to_le_bytes());
        let mut bytes = StreamBuilder::new().build();
        bytes.extend_from_slice(&0x0300u16.to_le_bytes());
        bytes.extend_from_slice(&(2u32 << 20).to_le_bytes());
        bytes.extend_from_slice(&hidden);

        let config = TransportConfig::default().with_chunk_packets(1);
        let transport = MemoryTransport::new(bytes, config).unwrap();
        let mut session = StreamingSession::from_transport(transport, false);
        for _ in 0..3 {
            let err = session.advance().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Decode);
        }
    }

    /// A mid-stream tick-rate change holds the clock instead of rewinding it
    #[test]
    fn test_tick_rate_change_keeps_time_ordered() {
        let builder = StreamBuilder::new()
            .internal_time(2_000_000)
            .inclination(1, 1)
            .clock_config(4_000_000)
            .inclination(2, 2)
            .internal_time(12_000_000)
            .inclination(3, 3);

        let times: Vec<f64> = inclinations_from_transport(memory(&builder, 2), false)
            .unwrap()
            .iter()
            .map(|r| r.time)
            .collect();
        assert_eq!(times, vec![2.0, 2.0, 3.0]);
    }

    #[test]
    fn test_reader_iterator_matches_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.rxp");
        let mut builder = StreamBuilder::new();
        for i in 0..50u64 {
            builder = builder.internal_time(i * 20_000).inclination(i as i32, -(i as i32));
            if i % 7 == 0 {
                builder = builder.other(0x0700, &[7; 7]);
            }
        }
        builder.write_to(&path).unwrap();

        let iterated: Vec<_> = Reader::from_path(&path)
            .chunk_packets(5)
            .inclinations()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let batch = inclinations_from_path(&path, false).unwrap();
        assert_eq!(iterated, batch);
        assert_eq!(iterated.len(), 50);
    }
}

#[cfg(test)]
mod property_tests {
    use contracts::TransportConfig;
    use ingestion::MemoryTransport;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use scan_session::{inclinations_from_transport, Advance, StreamingSession};

    use crate::fixture::{FixturePacket, StreamBuilder};

    /// Random interleaving of inclination, time, PPS and opaque packets
    ///
    /// Tick rates change mid-stream and PPS locks may land behind the current
    /// clock; readings must still never go back in time.
    fn random_stream(rng: &mut StdRng) -> StreamBuilder {
        let mut builder = StreamBuilder::new();
        let mut ticks = 0u64;
        for _ in 0..rng.random_range(0..400) {
            builder = match rng.random_range(0..5) {
                0 => builder.inclination(rng.random(), rng.random()),
                1 => {
                    // occasionally replay an older tick value
                    let step: u64 = rng.random_range(0..50_000);
                    if rng.random_bool(0.1) {
                        builder.internal_time(ticks.saturating_sub(step))
                    } else {
                        ticks += step;
                        builder.internal_time(ticks)
                    }
                }
                2 => {
                    let len = rng.random_range(0..48);
                    builder.other(rng.random_range(0x0100..0x0200), &vec![0x5a; len])
                }
                3 => builder.clock_config(rng.random_range(1_000..10_000_000)),
                _ => {
                    ticks += rng.random_range(0..50_000);
                    builder.pps_sync(ticks, rng.random_range(0..2_000))
                }
            };
        }
        builder
    }

    #[test]
    fn test_batch_yields_every_inclination_in_order() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let builder = random_stream(&mut rng);
            let chunk_packets = rng.random_range(1..32);
            let transport = MemoryTransport::new(
                builder.build(),
                TransportConfig::default().with_chunk_packets(chunk_packets),
            )
            .unwrap();

            let sync_to_pps = rng.random_bool(0.5);
            let readings = inclinations_from_transport(transport, sync_to_pps).unwrap();
            assert_eq!(readings.len(), builder.inclination_count());

            let expected: Vec<(f64, f64)> = builder
                .packets()
                .iter()
                .filter_map(|p| match p {
                    FixturePacket::Inclination { roll, pitch } => {
                        Some((f64::from(*roll) / 1000.0, f64::from(*pitch) / 1000.0))
                    }
                    _ => None,
                })
                .collect();
            let actual: Vec<(f64, f64)> = readings.iter().map(|r| (r.roll, r.pitch)).collect();
            assert_eq!(actual, expected);

            assert!(readings.windows(2).all(|w| w[0].time <= w[1].time));
        }
    }

    #[test]
    fn test_streaming_cycles_sum_to_total() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let builder = random_stream(&mut rng);
            let chunk_packets = rng.random_range(1..16);
            let transport = MemoryTransport::new(
                builder.build(),
                TransportConfig::default().with_chunk_packets(chunk_packets),
            )
            .unwrap();

            let mut session = StreamingSession::from_transport(transport, false);
            let mut total = 0;
            while let Advance::Readings(readings) = session.advance().unwrap() {
                assert!(readings.len() <= chunk_packets);
                total += readings.len();
            }
            assert_eq!(total, builder.inclination_count());
            assert_eq!(session.stats().inclinations as usize, total);
        }
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use scan_session::{Advance, StreamingSession};

    use crate::fixture::StreamBuilder;

    #[test]
    fn test_config_file_drives_session() {
        let dir = tempfile::tempdir().unwrap();
        let scan = dir.path().join("scan.rxp");
        let mut builder = StreamBuilder::new().pps_sync(0, 100);
        for _ in 0..9 {
            builder = builder.inclination(1, 1);
        }
        builder.write_to(&scan).unwrap();

        let config = ConfigLoader::load_from_str(
            "sync_to_pps = true\n[transport]\nchunk_packets = 5\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        let mut session = StreamingSession::open_with_config(&scan, &config).unwrap();
        let mut lengths = Vec::new();
        while let Advance::Readings(readings) = session.advance().unwrap() {
            assert!(readings.iter().all(|r| r.time == 100.0));
            lengths.push(readings.len());
        }
        assert_eq!(lengths, vec![4, 5]);
        assert!(session.clock().is_pps_locked());
    }
}

#[cfg(test)]
mod ffi_tests {
    use std::ffi::{CStr, CString};
    use std::ptr;

    use rxp_ffi::*;

    use crate::fixture::StreamBuilder;

    #[test]
    fn test_c_streaming_loop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.rxp");
        let mut builder = StreamBuilder::new();
        for i in 0..2_500 {
            builder = builder.inclination(i, i);
        }
        builder.write_to(&path).unwrap();
        let c_path = CString::new(path.to_str().unwrap()).unwrap();

        let mut total = 0;
        unsafe {
            let mut stream = ptr::null_mut();
            assert_eq!(rxp_stream_open(c_path.as_ptr(), false, &mut stream), RXP_OK);

            let mut readings = ptr::null();
            let mut len = 0usize;
            let mut eoi = 0;
            loop {
                let status = rxp_stream_advance(stream, &mut readings, &mut len, &mut eoi);
                assert_eq!(status, RXP_OK);
                if eoi == 1 {
                    break;
                }
                let slice = std::slice::from_raw_parts(readings, len);
                assert_eq!(slice[0].roll, total as f64 / 1000.0);
                total += len;
            }
            rxp_stream_close(stream);
        }
        assert_eq!(total, 2_500);
    }

    #[test]
    fn test_c_open_failure_sets_last_error() {
        let c_path = CString::new("/nonexistent/scan.rxp").unwrap();
        let mut stream = ptr::null_mut();
        let status = unsafe { rxp_stream_open(c_path.as_ptr(), false, &mut stream) };
        assert_eq!(status, RXP_OPEN_FAILURE);
        assert!(stream.is_null());

        let message = unsafe { CStr::from_ptr(rxp_last_error()) };
        assert!(!message.to_bytes().is_empty());
    }
}

#[cfg(test)]
mod observability_tests {
    use observability::SeriesAggregator;
    use scan_session::inclinations_from_path;

    use crate::fixture::StreamBuilder;

    #[test]
    fn test_series_summary_of_extracted_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.rxp");
        StreamBuilder::new()
            .internal_time(1_000_000)
            .inclination(1_000, -1_000)
            .internal_time(3_000_000)
            .inclination(3_000, -3_000)
            .write_to(&path)
            .unwrap();

        let readings = inclinations_from_path(&path, false).unwrap();
        let mut series = SeriesAggregator::new();
        series.extend(&readings);
        let summary = series.summary();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.time_span, 2.0);
        assert_eq!(summary.roll.mean, 2.0);
        assert_eq!(summary.pitch.min, -3.0);
    }
}
