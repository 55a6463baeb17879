use tracing::info;

use crate::events::WaveEvent;
use crate::listener;
use crate::listener::WaveListener;

/// Logs wave boundaries for post-match diagnostics.
struct WaveLog;

impl WaveListener for WaveLog {
	fn wave_started(&self, ev: &WaveEvent) {
		info!(wave = ev.number, survivors = ev.survivors, "wave started");
	}

	fn wave_ended(&self, ev: &WaveEvent) {
		info!(wave = ev.number, survivors = ev.survivors, "wave ended");
	}
}

listener!(wave_log, Wave, "Log wave boundaries", &WaveLog);
