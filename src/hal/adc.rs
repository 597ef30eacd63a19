//! ADC Driver
//!
//! Free-running potentiometer sampling. The sampler task keeps the latest
//! 12-bit reading in an atomic so the synchronous control path can pick it
//! up without waiting on a conversion.

use core::sync::atomic::{AtomicU16, Ordering};

use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Ticker};

use crate::config::UPDATE_INTERVAL_MS;

/// Latest potentiometer sample (12-bit)
static POT_SAMPLE: AtomicU16 = AtomicU16::new(0);

/// Read the most recent potentiometer sample
#[must_use]
pub fn latest_pot_sample() -> u16 {
    POT_SAMPLE.load(Ordering::Relaxed)
}

/// Sample the potentiometer once per polling interval
#[embassy_executor::task]
pub async fn pot_sampler_task(mut adc: Adc<'static, Async>, mut channel: Channel<'static>) {
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(UPDATE_INTERVAL_MS)));
    loop {
        if let Ok(raw) = adc.read(&mut channel).await {
            POT_SAMPLE.store(raw, Ordering::Relaxed);
        }
        ticker.next().await;
    }
}
