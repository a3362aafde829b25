use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::thread;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::aggregator::HostStats;
use crate::network::record::{PacketFrame, SocketInfo};

// Transport envelope for the record stream: one JSON object per line,
// tagged by record kind. The payload shapes are the capture engine's wire
// contract and are passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordEnvelope {
    Packet(PacketFrame),
    Sockets(Vec<SocketInfo>),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to open record source {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
}

fn decode_record(line: &str) -> Result<RecordEnvelope, serde_json::Error> {
    serde_json::from_str(line)
}

// Drains a record stream: packet records feed the shared host aggregation
// before being handed to the UI thread over the channel. A malformed line
// is logged and dropped; it never halts the feed.
fn run_reader<R: BufRead>(
    reader: R,
    tx: Sender<RecordEnvelope>,
    host_stats: Arc<Mutex<HostStats>>,
    running: Arc<AtomicBool>,
) {
    let mut line_no = 0usize;
    for line in reader.lines() {
        if !running.load(Ordering::Relaxed) {
            break;
        }
        line_no += 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("record source read failed at line {}: {}", line_no, e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let envelope = match decode_record(&line) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!("skipping malformed record at line {}: {}", line_no, e);
                continue;
            }
        };
        if let RecordEnvelope::Packet(frame) = &envelope {
            if let Ok(mut stats) = host_stats.lock() {
                stats.update(frame);
            }
        }
        // Receiver gone means the UI shut down.
        if tx.send(envelope).is_err() {
            break;
        }
    }
    log::info!("record source drained after {} lines", line_no);
}

// Spawns the producer thread reading records from a file, or stdin for "-".
pub fn start_record_source(
    path: String,
    tx: Sender<RecordEnvelope>,
    host_stats: Arc<Mutex<HostStats>>,
    running: Arc<AtomicBool>,
) -> Result<(), FeedError> {
    let reader: Box<dyn BufRead + Send> = if path == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = File::open(&path).map_err(|source| FeedError::Open {
            path: path.clone(),
            source,
        })?;
        Box::new(BufReader::new(file))
    };

    thread::spawn(move || {
        run_reader(reader, tx, host_stats, running);
    });
    Ok(())
}
