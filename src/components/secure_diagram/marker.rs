use log::debug;

use super::error::Result;
use super::geometry::{Point, Segment};
use super::scheduler::{self, Scheduler, StopSignal};
use super::surface::Surface;

pub fn progress(t0: f64, t: f64, duration: f64) -> f64 {
	if duration <= 0.0 {
		return 1.0;
	}
	((t - t0) / duration).clamp(0.0, 1.0)
}

/// Moves the marker along `segment` once, sampling on every display refresh.
///
/// `segment` is a snapshot: re-layouts during the traversal do not bend it.
/// Resolves with the marker hidden, or `Cancelled` if `stop` fires first.
pub async fn traverse<S, C>(
	surface: &S,
	scheduler: &C,
	stop: &StopSignal,
	segment: Segment,
	reverse: bool,
	duration: f64,
) -> Result<()>
where
	S: Surface + ?Sized,
	C: Scheduler + ?Sized,
{
	let (from, to) = if reverse {
		(segment.end, segment.start)
	} else {
		(segment.start, segment.end)
	};
	surface.set_marker_visible(true)?;
	let t0 = scheduler.now();
	loop {
		let t = scheduler::next_frame(scheduler, stop).await?;
		let p = progress(t0, t, duration);
		surface.move_marker(from.lerp(to, p))?;
		if p >= 1.0 {
			break;
		}
	}
	surface.set_marker_visible(false)
}

pub fn hide<S: Surface + ?Sized>(surface: &S) -> Result<()> {
	surface.set_marker_visible(false)?;
	surface.move_marker(Point::ORIGIN)?;
	debug!("marker hidden");
	Ok(())
}
