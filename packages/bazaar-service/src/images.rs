use std::{sync::Arc, time::Duration};

use tokio::{
	task::JoinSet,
	time::{self, Instant},
};

use bazaar_config::Cdn;

use crate::ImageProbe;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
	pub slot: u32,
	pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageProbeReport {
	/// Slots whose probe succeeded, in slot order.
	pub found: Vec<ImageSlot>,
	/// Probes that finished before the batch deadline, successful or not.
	pub completed: usize,
	/// Probes still running when the batch deadline passed.
	pub abandoned: usize,
}
impl ImageProbeReport {
	pub fn contains_slot(&self, slot: u32) -> bool {
		self.found.iter().any(|image| image.slot == slot)
	}
}

/// Probes every slot concurrently.
///
/// Each probe is bounded by `cdn.probe_timeout_ms` and the whole batch by `cdn.batch_timeout_ms`.
/// Probes still running at the batch deadline are aborted when `cdn.cancel_pending_probes` is set
/// and otherwise left to finish in the background with their results discarded.
pub async fn probe_slots(
	probe: Arc<dyn ImageProbe>,
	cdn: &Cdn,
	slots: Vec<ImageSlot>,
) -> ImageProbeReport {
	let deadline = Instant::now() + Duration::from_millis(cdn.batch_timeout_ms);
	let per_probe = Duration::from_millis(cdn.probe_timeout_ms);
	let shared_cdn = Arc::new(cdn.clone());
	let mut tasks = JoinSet::new();

	for image in slots {
		let probe = probe.clone();
		let cdn = shared_cdn.clone();

		tasks.spawn(async move {
			let outcome = time::timeout(per_probe, probe.image_exists(&cdn, &image.url)).await;
			let exists = match outcome {
				Ok(Ok(exists)) => exists,
				Ok(Err(err)) => {
					tracing::debug!(url = %image.url, error = %err, "Image probe failed.");

					false
				},
				Err(_) => {
					tracing::debug!(url = %image.url, "Image probe timed out.");

					false
				},
			};

			(image, exists)
		});
	}

	let mut report = ImageProbeReport::default();

	loop {
		match time::timeout_at(deadline, tasks.join_next()).await {
			Ok(Some(Ok((image, exists)))) => {
				report.completed += 1;

				if exists {
					report.found.push(image);
				}
			},
			Ok(Some(Err(err))) => {
				report.completed += 1;

				tracing::warn!(error = %err, "Image probe task failed.");
			},
			Ok(None) => break,
			Err(_) => break,
		}
	}

	report.abandoned = tasks.len();

	if report.abandoned > 0 {
		if cdn.cancel_pending_probes {
			tasks.abort_all();
		} else {
			tasks.detach_all();
		}

		tracing::warn!(
			abandoned = report.abandoned,
			cancelled = cdn.cancel_pending_probes,
			"Image probe batch deadline passed."
		);
	}

	report.found.sort_by_key(|image| image.slot);

	report
}
