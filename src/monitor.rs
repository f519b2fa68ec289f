use crate::button::RunStats;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;
use sysinfo::{ProcessesToUpdate, System};

pub const POLL_INTERVAL_MS: u64 = 2000;

/// One polling round of run-state, keyed by launch target path.
#[derive(Debug, Default)]
pub struct StatsSnapshot {
    pub stats: HashMap<String, RunStats>,
}

/// Background process monitor. Polls sysinfo off the UI thread and ships
/// snapshots over the channel; button state is only ever mutated on the UI
/// thread when the shell applies a received snapshot.
pub fn spawn_stats_worker(
    watch_rx: Receiver<Vec<String>>,
    tx: Sender<StatsSnapshot>,
    ctx: egui::Context,
) {
    thread::spawn(move || {
        let mut sys = System::new();
        let mut watched: Vec<String> = Vec::new();
        loop {
            while let Ok(list) = watch_rx.try_recv() {
                watched = list;
            }
            if !watched.is_empty() {
                sys.refresh_processes(ProcessesToUpdate::All, true);
                let snapshot = collect(&sys, &watched);
                if tx.send(snapshot).is_err() {
                    break;
                }
                ctx.request_repaint();
            }
            thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
        }
    });
}

fn collect(sys: &System, watched: &[String]) -> StatsSnapshot {
    let mut snapshot = StatsSnapshot::default();
    for process in sys.processes().values() {
        let Some(exe) = process.exe() else {
            continue;
        };
        let exe_key = exe.to_string_lossy().to_ascii_lowercase();
        accumulate(
            &mut snapshot.stats,
            watched,
            &exe_key,
            process.cpu_usage(),
            process.memory() as f32 / 1_048_576.0,
            process.start_time(),
        );
    }
    snapshot
}

/// Folds one process into the snapshot. Multiple instances of the same
/// target aggregate cpu/ram and count up; the instance count stands in for a
/// window count, and the start time is the earliest instance's.
fn accumulate(
    stats: &mut HashMap<String, RunStats>,
    watched: &[String],
    exe_key: &str,
    cpu_percent: f32,
    ram_mb: f32,
    start_epoch: u64,
) {
    for target in watched {
        if target.to_ascii_lowercase() != exe_key {
            continue;
        }
        let entry = stats.entry(target.clone()).or_default();
        entry.running = true;
        entry.cpu_percent += cpu_percent;
        entry.ram_mb += ram_mb;
        entry.window_count += 1;
        if entry.start_epoch == 0 || start_epoch < entry.start_epoch {
            entry.start_epoch = start_epoch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances_of_one_target_aggregate() {
        let watched = vec![r"C:\Apps\editor.exe".to_string()];
        let mut stats = HashMap::new();
        accumulate(&mut stats, &watched, r"c:\apps\editor.exe", 3.0, 100.0, 500);
        accumulate(&mut stats, &watched, r"c:\apps\editor.exe", 2.0, 50.0, 400);

        let entry = &stats[&watched[0]];
        assert!(entry.running);
        assert_eq!(entry.cpu_percent, 5.0);
        assert_eq!(entry.ram_mb, 150.0);
        assert_eq!(entry.window_count, 2);
        assert_eq!(entry.start_epoch, 400);
    }

    #[test]
    fn unwatched_processes_are_ignored() {
        let watched = vec![r"C:\Apps\editor.exe".to_string()];
        let mut stats = HashMap::new();
        accumulate(&mut stats, &watched, r"c:\windows\other.exe", 9.0, 10.0, 1);
        assert!(stats.is_empty());
    }

    #[test]
    fn target_matching_ignores_case() {
        let watched = vec![r"C:\APPS\Editor.EXE".to_string()];
        let mut stats = HashMap::new();
        accumulate(&mut stats, &watched, r"c:\apps\editor.exe", 1.0, 1.0, 1);
        assert!(stats[&watched[0]].running);
    }
}
