//! Fixed-width thermostat status record.
//!
//! Wire format, one record per report period:
//!
//! ```text
//! <TT,SS,H,EEEE>\n\r
//!  │  │  │  └── elapsed seconds, zero-padded to 4 digits
//!  │  │  └───── heat flag, 0 or 1
//!  │  └──────── setpoint, zero-padded to 2 columns
//!  └─────────── temperature, zero-padded to 2 columns (sign counts as a column)
//! ```
//!
//! Records are rendered into a 64-byte stack buffer.  The longest possible
//! record (`i32::MIN` twice, `u32::MAX` seconds) is 40 bytes, so rendering
//! cannot overflow.

use core::fmt::Write;

use heapless::String;

/// Capacity of the record buffer.
pub const REPORT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub temperature: i32,
    pub setpoint: i32,
    pub heat: bool,
    pub elapsed_secs: u32,
}

impl StatusReport {
    pub fn render(&self) -> String<REPORT_CAPACITY> {
        let mut out = String::new();
        // Cannot fail, see module docs.
        let _ = write!(
            out,
            "<{:02},{:02},{},{:04}>\n\r",
            self.temperature,
            self.setpoint,
            u8::from(self.heat),
            self.elapsed_secs
        );
        out
    }
}
