//! # Command producers
//!
//! Threads which publish operator snapshots into the command store, standing in for the
//! teleoperation front-end:
//!
//! - The script producer replays a TC script in real time.
//! - The stdin producer publishes one JSON snapshot per line of standard input.
//!
//! Both raise the scheduler's stop flag when their input runs out.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use std::io::{self, BufRead};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

// Internal
use crate::cmd_store::CmdPublisher;
use comms_if::tc::TeleopCmd;
use util::script_interpreter::{PendingTcs, ScriptInterpreter};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Polling period of the script producer.
const SCRIPT_POLL_PERIOD: Duration = Duration::from_millis(1);

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Spawn a thread replaying the script, publishing each snapshot when its time comes.
///
/// Once the script is over the last snapshot is held for `linger` before the stop flag is raised.
pub fn spawn_script_producer(
    mut script: ScriptInterpreter,
    publisher: CmdPublisher,
    stop: Arc<AtomicBool>,
    linger: Duration,
) -> io::Result<JoinHandle<()>> {
    info!(
        "Replaying a {} TC script lasting {:.2} s",
        script.get_num_tcs(),
        script.get_duration()
    );

    thread::Builder::new()
        .name("script_producer".into())
        .spawn(move || {
            let start = Instant::now();

            while !stop.load(Ordering::Acquire) {
                match script.get_pending_tcs(start.elapsed().as_secs_f64()) {
                    PendingTcs::None => (),
                    PendingTcs::Some(tcs) => {
                        for tc in tcs {
                            publisher.publish(tc);
                        }
                    }
                    PendingTcs::EndOfScript => {
                        info!("End of TC script");
                        thread::sleep(linger);
                        stop.store(true, Ordering::Release);
                        break;
                    }
                }

                thread::sleep(SCRIPT_POLL_PERIOD);
            }
        })
}

/// Spawn a thread publishing one snapshot per line of standard input.
pub fn spawn_stdin_producer(
    publisher: CmdPublisher,
    stop: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    info!("Reading TCs from stdin, one JSON object per line");

    thread::Builder::new()
        .name("stdin_producer".into())
        .spawn(move || {
            let stdin = io::stdin();
            let num_tcs = publish_lines(stdin.lock(), &publisher, &stop);

            info!("End of stdin after {} TCs", num_tcs);
            stop.store(true, Ordering::Release);
        })
}

/// Publish each line of `reader` as a snapshot until the input ends or `stop` is raised,
/// returning the number of snapshots published.
///
/// Blank lines and lines starting with `#` are skipped, invalid lines are logged and skipped.
pub fn publish_lines<R: BufRead>(reader: R, publisher: &CmdPublisher, stop: &AtomicBool) -> usize {
    let mut num_tcs = 0;

    for (i, line) in reader.lines().enumerate() {
        if stop.load(Ordering::Acquire) {
            break;
        }

        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("Could not read TC input: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match TeleopCmd::from_json(line) {
            Ok(tc) => {
                publisher.publish(tc);
                num_tcs += 1;
            }
            Err(e) => warn!("Ignoring TC on line {}: {}", i + 1, e),
        }
    }

    num_tcs
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
