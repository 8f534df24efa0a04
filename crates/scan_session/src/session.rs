//! Streaming Session
//!
//! Drives "read next chunk → clear → dispatch → expose" cycles and owns the
//! buffer the caller borrows between cycles.

use std::path::Path;

use bytes::BytesMut;
use contracts::{
    ByteTransport, DecodeConfig, InclinationReading, Result, ScanError, SessionState,
};
use dispatcher::{DecodeClock, DispatchSummary, PacketDispatcher};
use ingestion::FileTransport;
use metrics::counter;
use tracing::{debug, instrument, trace};

use crate::extractor::InclinationExtractor;

/// Result of one decode cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance<'a> {
    /// Readings extracted from this cycle's chunk, possibly empty
    ///
    /// Borrowed from the session: invalidated by the next `advance` or by
    /// closing the session. Copy out what must be kept.
    Readings(&'a [InclinationReading]),

    /// The transport had no further bytes; the session is now exhausted
    EndOfInput,
}

impl<'a> Advance<'a> {
    /// Readings of this cycle, `None` at end of input
    pub fn readings(self) -> Option<&'a [InclinationReading]> {
        match self {
            Self::Readings(readings) => Some(readings),
            Self::EndOfInput => None,
        }
    }

    /// Whether end of input was reached
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput)
    }
}

/// Streaming decode session
///
/// Exclusively owns its transport. Single-threaded: `advance` mutates the
/// extractor and the transport cursor without synchronisation. A stalled
/// transport blocks `advance` indefinitely; there is no timeout.
pub struct StreamingSession<T = FileTransport> {
    transport: T,
    dispatcher: PacketDispatcher,
    extractor: InclinationExtractor,
    buffer: BytesMut,
    state: SessionState,
    /// Stream offset of the failure that ended the session
    failed_at: Option<u64>,
    cycles: u64,
}

impl StreamingSession<FileTransport> {
    /// Open a scan file with default chunking
    ///
    /// # Errors
    /// `OpenFailure` if the file is missing, unreadable or not a scan stream.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use scan_session::{Advance, StreamingSession};
    ///
    /// let mut session = StreamingSession::open("scan.rxp", false)?;
    /// while let Advance::Readings(readings) = session.advance()? {
    ///     for r in readings {
    ///         println!("{},{:.3},{:.3}", r.time, r.roll, r.pitch);
    ///     }
    /// }
    /// # Ok::<(), contracts::ScanError>(())
    /// ```
    pub fn open(path: impl AsRef<Path>, sync_to_pps: bool) -> Result<Self> {
        Self::open_with_config(
            path,
            &DecodeConfig {
                sync_to_pps,
                ..Default::default()
            },
        )
    }

    /// Open a scan file with explicit configuration
    #[instrument(
        name = "session_open",
        skip(path, config),
        fields(path = %path.as_ref().display(), sync_to_pps = config.sync_to_pps)
    )]
    pub fn open_with_config(path: impl AsRef<Path>, config: &DecodeConfig) -> Result<Self> {
        let transport = FileTransport::open(path, config.transport)?;
        Ok(Self::from_transport(transport, config.sync_to_pps))
    }
}

impl<T: ByteTransport> StreamingSession<T> {
    /// Build a session over an already opened transport
    pub fn from_transport(transport: T, sync_to_pps: bool) -> Self {
        debug!(source = %transport.source(), sync_to_pps, "session created");
        Self {
            transport,
            dispatcher: PacketDispatcher::new(sync_to_pps),
            extractor: InclinationExtractor::new(),
            buffer: BytesMut::new(),
            state: SessionState::Active,
            failed_at: None,
            cycles: 0,
        }
    }

    /// Whether the transport has no further bytes
    ///
    /// Pure query, valid in any state.
    pub fn is_end_of_input(&self) -> bool {
        self.transport.is_end_of_input()
    }

    /// Lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run one decode cycle
    ///
    /// Pulls the next chunk, clears the previous cycle's readings, dispatches
    /// the chunk and returns the readings it produced. Readings never carry
    /// over from one cycle to the next.
    ///
    /// # Errors
    /// - `Exhausted` if end of input was already reported by an earlier call
    /// - `DecodeFailure` / `Io` for malformed or unreadable stream data. The
    ///   session is then failed: the cycle's partial readings are dropped and
    ///   every later call returns `DecodeFailure` at the same offset.
    pub fn advance(&mut self) -> Result<Advance<'_>> {
        self.ensure_active()?;

        if self.transport.is_end_of_input() {
            self.state = SessionState::Exhausted;
            self.extractor.clear();
            debug!(source = %self.transport.source(), cycles = self.cycles, "end of input");
            return Ok(Advance::EndOfInput);
        }

        self.cycle(true)?;
        Ok(Advance::Readings(self.extractor.readings()))
    }

    /// Like [`advance`](Self::advance), but copies the readings out
    ///
    /// Returns `None` at end of input.
    pub fn advance_owned(&mut self) -> Result<Option<Vec<InclinationReading>>> {
        Ok(self.advance()?.readings().map(<[_]>::to_vec))
    }

    /// Readings produced by the most recent cycle
    pub fn readings(&self) -> &[InclinationReading] {
        self.extractor.readings()
    }

    /// Decode every remaining chunk without clearing between cycles
    ///
    /// Leaves the session exhausted with all readings accumulated.
    pub fn accumulate_to_end(&mut self) -> Result<()> {
        self.ensure_active()?;

        while !self.transport.is_end_of_input() {
            self.cycle(false)?;
        }
        self.state = SessionState::Exhausted;
        debug!(
            source = %self.transport.source(),
            cycles = self.cycles,
            readings = self.extractor.len(),
            "stream accumulated"
        );
        Ok(())
    }

    /// Transfer ownership of the held readings to the caller
    pub fn take_readings(&mut self) -> Vec<InclinationReading> {
        self.extractor.take()
    }

    /// Packet counts over the whole session
    pub fn stats(&self) -> DispatchSummary {
        self.dispatcher.totals()
    }

    /// Decode clock
    pub fn clock(&self) -> &DecodeClock {
        self.dispatcher.clock()
    }

    /// Number of chunks dispatched so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Tear the session down, releasing the transport and every reading
    pub fn close(self) {
        debug!(source = %self.transport.source(), cycles = self.cycles, "session closed");
    }

    fn ensure_active(&self) -> Result<()> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Exhausted => Err(ScanError::Exhausted),
            SessionState::Failed => Err(ScanError::decode(
                self.failed_at.unwrap_or_else(|| self.dispatcher.offset()),
                "session already failed at this packet",
            )),
        }
    }

    fn fail(&mut self, err: ScanError) -> ScanError {
        self.failed_at = Some(match &err {
            ScanError::DecodeFailure { offset, .. } => *offset,
            _ => self.dispatcher.offset(),
        });
        self.state = SessionState::Failed;
        self.extractor.clear();
        debug!(source = %self.transport.source(), error = %err, "session failed");
        err
    }

    fn cycle(&mut self, clear: bool) -> Result<DispatchSummary> {
        let pulled = self.transport.next_chunk(&mut self.buffer);
        if clear {
            self.extractor.clear();
        }
        let packets = pulled.map_err(|e| self.fail(e))?;

        let before = self.extractor.len();
        let summary = match self.dispatcher.dispatch(&self.buffer, &mut self.extractor) {
            Ok(summary) => summary,
            Err(err) => return Err(self.fail(err)),
        };
        self.cycles += 1;

        let extracted = (self.extractor.len() - before) as u64;
        counter!("rxp_cycles_total").increment(1);
        counter!("rxp_inclinations_total").increment(extracted);
        trace!(cycle = self.cycles, packets, extracted, "cycle complete");
        Ok(summary)
    }
}
