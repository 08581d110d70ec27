//! Debounced push-button edge line.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up.  The GPIO fires on the
//! falling edge; the ISR timestamps the edge and calls
//! [`ButtonLine::on_edge`], which raises the button's [`Latch`] unless the
//! edge falls inside the debounce window of the previously accepted one.
//!
//! Everything here is lock-free and safe to call from interrupt context.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::events::Latch;

/// Default debounce window.
pub const DEBOUNCE_MS: u32 = 50;

/// One physical button bound to one latch.
pub struct ButtonLine<'a> {
    latch: &'a Latch,
    window_ms: AtomicU32,
    last_ms: AtomicU32,
    /// `false` until the first edge is accepted, so an edge at t=0 counts.
    primed: AtomicBool,
}

impl<'a> ButtonLine<'a> {
    pub const fn new(latch: &'a Latch, window_ms: u32) -> Self {
        Self {
            latch,
            window_ms: AtomicU32::new(window_ms),
            last_ms: AtomicU32::new(0),
            primed: AtomicBool::new(false),
        }
    }

    /// Record a falling edge at `now_ms` (monotonic, wrapping).
    /// Returns `true` if the edge was accepted.
    pub fn on_edge(&self, now_ms: u32) -> bool {
        if self.primed.load(Ordering::Acquire) {
            let since = now_ms.wrapping_sub(self.last_ms.load(Ordering::Relaxed));
            if since < self.window_ms.load(Ordering::Relaxed) {
                return false;
            }
        }
        self.last_ms.store(now_ms, Ordering::Relaxed);
        self.primed.store(true, Ordering::Release);
        self.latch.raise();
        true
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms.load(Ordering::Relaxed)
    }

    /// Change the debounce window.  Call before the ISR is attached.
    pub fn set_window_ms(&self, window_ms: u32) {
        self.window_ms.store(window_ms, Ordering::Relaxed);
    }
}

// ── GPIO ISR registration ─────────────────────────────────────

#[cfg(feature = "espidf")]
mod isr {
    use esp_idf_svc::sys::*;
    use log::info;

    use super::ButtonLine;
    use crate::error::InitError;

    unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
        // SAFETY: `arg` is the `&'static ButtonLine` registered in `attach_isr`.
        let line = unsafe { &*(arg as *const ButtonLine<'static>) };
        // SAFETY: esp_timer_get_time is an RTC counter read; safe in ISR context.
        let now_ms = (unsafe { esp_timer_get_time() } / 1_000) as u32;
        line.on_edge(now_ms);
    }

    /// Configure `gpio` as a pulled-up, falling-edge input and route its
    /// interrupt to `line`.
    pub fn attach_isr(gpio: i32, line: &'static ButtonLine<'static>) -> Result<(), InitError> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        };
        // SAFETY: called from the single main task during setup.  The ISR
        // argument points at a `'static` line and is only read atomically.
        unsafe {
            let ret = gpio_config(&cfg);
            if ret != ESP_OK as i32 {
                log::error!("button: gpio {} config failed (rc={})", gpio, ret);
                return Err(InitError::Gpio);
            }
            // ESP_ERR_INVALID_STATE means another line already installed it.
            let ret = gpio_install_isr_service(0);
            if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
                log::error!("button: ISR service install failed (rc={})", ret);
                return Err(InitError::Gpio);
            }
            let arg = line as *const ButtonLine<'static> as *mut core::ffi::c_void;
            let ret = gpio_isr_handler_add(gpio, Some(button_gpio_isr), arg);
            if ret != ESP_OK as i32 {
                log::error!("button: handler add on gpio {} failed (rc={})", gpio, ret);
                return Err(InitError::Gpio);
            }
            gpio_intr_enable(gpio);
        }
        info!("button: gpio {} armed ({}ms debounce)", gpio, line.window_ms());
        Ok(())
    }
}

#[cfg(feature = "espidf")]
pub use isr::attach_isr;
