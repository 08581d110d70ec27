//! Periodic base-tick timer.
//!
//! On ESP-IDF the callback runs in the esp_timer task (not an ISR), on the
//! host it runs on a dedicated thread.  Either way it must only touch
//! atomics, which is all [`TaskMultiplexer::on_tick`] does.
//!
//! Dropping a started timer stops the tick on both targets.  The host
//! thread notices the stop request within one period and is joined.
//!
//! [`TaskMultiplexer::on_tick`]: crate::scheduler::TaskMultiplexer::on_tick

use core::time::Duration;

use log::info;

use crate::app::ports::TickSource;
use crate::error::InitError;

#[cfg(feature = "espidf")]
use esp_idf_svc::timer::{EspTaskTimerService, EspTimer};

/// The board's single recurring timer.  Can be started once.
pub struct HwTimer {
    #[cfg(feature = "espidf")]
    timer: Option<EspTimer<'static>>,
    #[cfg(not(feature = "espidf"))]
    thread: Option<std::thread::JoinHandle<()>>,
    #[cfg(not(feature = "espidf"))]
    stop: std::sync::Arc<core::sync::atomic::AtomicBool>,
}

impl HwTimer {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "espidf")]
            timer: None,
            #[cfg(not(feature = "espidf"))]
            thread: None,
            #[cfg(not(feature = "espidf"))]
            stop: std::sync::Arc::new(core::sync::atomic::AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        #[cfg(feature = "espidf")]
        let running = self.timer.is_some();
        #[cfg(not(feature = "espidf"))]
        let running = self.thread.is_some();
        running
    }
}

impl Default for HwTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "espidf")]
impl TickSource for HwTimer {
    fn start<F>(&mut self, period_us: u64, callback: F) -> Result<(), InitError>
    where
        F: FnMut() + Send + 'static,
    {
        if self.timer.is_some() {
            return Err(InitError::AlreadyTaken("hw timer"));
        }
        let service = EspTaskTimerService::new().map_err(|e| {
            log::error!("hw_timer: service init failed: {}", e);
            InitError::Timer
        })?;
        let timer = service.timer(callback).map_err(|e| {
            log::error!("hw_timer: create failed: {}", e);
            InitError::Timer
        })?;
        timer.every(Duration::from_micros(period_us)).map_err(|e| {
            log::error!("hw_timer: start failed: {}", e);
            InitError::Timer
        })?;
        self.timer = Some(timer);
        info!("hw_timer: periodic tick every {}us", period_us);
        Ok(())
    }
}

#[cfg(not(feature = "espidf"))]
impl TickSource for HwTimer {
    fn start<F>(&mut self, period_us: u64, mut callback: F) -> Result<(), InitError>
    where
        F: FnMut() + Send + 'static,
    {
        use core::sync::atomic::Ordering;
        use std::sync::Arc;
        use std::time::Instant;

        if self.thread.is_some() {
            return Err(InitError::AlreadyTaken("hw timer"));
        }
        let period = Duration::from_micros(period_us);
        let stop = Arc::clone(&self.stop);
        let handle = std::thread::Builder::new()
            .name("tick".into())
            .spawn(move || {
                // Deadline-based so callback time does not accumulate as drift.
                let mut next = Instant::now() + period;
                loop {
                    let now = Instant::now();
                    if next > now {
                        std::thread::sleep(next - now);
                    }
                    if stop.load(Ordering::Acquire) {
                        break;
                    }
                    callback();
                    next += period;
                }
            })
            .map_err(|e| {
                log::error!("hw_timer(sim): thread spawn failed: {}", e);
                InitError::Timer
            })?;
        self.thread = Some(handle);
        info!("hw_timer(sim): periodic tick every {}us", period_us);
        Ok(())
    }
}

#[cfg(not(feature = "espidf"))]
impl Drop for HwTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.thread.take() {
            self.stop.store(true, core::sync::atomic::Ordering::Release);
            if handle.join().is_err() {
                log::warn!("hw_timer(sim): tick thread panicked");
            }
        }
    }
}
