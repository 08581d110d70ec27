//! ESP32-S3 board.
//!
//! Peripherals are claimed once through [`Board::take`] and handed out
//! piecewise.  Buttons bypass the HAL and go through raw GPIO ISRs (see
//! [`drivers::button`](crate::drivers::button)) so the edge handler is a
//! plain atomic store.

use esp_idf_hal::delay::{BLOCK, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Output, PinDriver};
use esp_idf_hal::i2c::{I2C0, I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UART1, UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use crate::app::ports::SerialPort;
use crate::drivers::button::{ButtonLine, attach_isr};
use crate::drivers::hw_timer::HwTimer;
use crate::drivers::led::PinIndicator;
use crate::error::{Fault, InitError, TransportError};
use crate::pins;

pub type LedPin = PinDriver<'static, AnyOutputPin, Output>;

pub struct Board {
    uart: Option<UART1>,
    i2c: Option<I2C0>,
    leds_taken: bool,
}

impl Board {
    pub fn take() -> Result<Self, InitError> {
        let p = Peripherals::take().map_err(|_| InitError::AlreadyTaken("peripherals"))?;
        info!("board: ESP32-S3");
        Ok(Self {
            uart: Some(p.uart1),
            i2c: Some(p.i2c0),
            leds_taken: false,
        })
    }

    /// ESP-IDF bootstrap.  Call first thing in `main`.
    pub fn init_logging() -> anyhow::Result<()> {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
        Ok(())
    }

    pub fn tick_source(&mut self) -> HwTimer {
        HwTimer::new()
    }

    pub fn leds(&mut self) -> Result<PinIndicator<LedPin, LedPin>, InitError> {
        if core::mem::replace(&mut self.leds_taken, true) {
            return Err(InitError::AlreadyTaken("leds"));
        }
        // SAFETY: the LED GPIOs are claimed only here, guarded by `leds_taken`.
        let (led0, led1) = unsafe {
            (
                AnyOutputPin::new(pins::LED0_GPIO),
                AnyOutputPin::new(pins::LED1_GPIO),
            )
        };
        let led0 = PinDriver::output(led0).map_err(|_| InitError::Gpio)?;
        let led1 = PinDriver::output(led1).map_err(|_| InitError::Gpio)?;
        Ok(PinIndicator::new(led0, led1))
    }

    pub fn serial(&mut self, baud_rate: u32) -> Result<EspSerial, InitError> {
        let uart = self.uart.take().ok_or(InitError::AlreadyTaken("uart1"))?;
        // SAFETY: the UART GPIOs are only used by this driver.
        let (tx, rx) = unsafe {
            (
                AnyIOPin::new(pins::UART_TX_GPIO),
                AnyIOPin::new(pins::UART_RX_GPIO),
            )
        };
        let config = UartConfig::default().baudrate(Hertz(baud_rate));
        let driver = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )
        .map_err(|e| {
            error!("board: uart init failed: {}", e);
            InitError::Serial
        })?;
        info!("board: uart1 @ {} baud", baud_rate);
        Ok(EspSerial { uart: driver })
    }

    pub fn sensor_bus(&mut self, bus_hz: u32) -> Result<I2cDriver<'static>, InitError> {
        let i2c = self.i2c.take().ok_or(InitError::AlreadyTaken("i2c0"))?;
        // SAFETY: the I2C GPIOs are only used by this driver.
        let (sda, scl) = unsafe {
            (
                AnyIOPin::new(pins::I2C_SDA_GPIO),
                AnyIOPin::new(pins::I2C_SCL_GPIO),
            )
        };
        let config = I2cConfig::new().baudrate(Hertz(bus_hz));
        let driver = I2cDriver::new(i2c, sda, scl, &config).map_err(|e| {
            error!("board: i2c init failed: {}", e);
            InitError::SensorBus
        })?;
        info!("board: i2c0 @ {} Hz", bus_hz);
        Ok(driver)
    }

    /// Arm one falling-edge ISR per `(gpio, line)` pair.
    pub fn attach_buttons(
        &mut self,
        lines: &[(i32, &'static ButtonLine<'static>)],
    ) -> Result<(), InitError> {
        for &(gpio, line) in lines {
            attach_isr(gpio, line)?;
        }
        Ok(())
    }

    pub fn now_ms() -> u32 {
        // SAFETY: esp_timer_get_time is a read of the RTC counter.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() } / 1_000) as u32
    }

    /// One RTOS tick, so the idle task can feed the watchdog.
    pub fn idle(&self) {
        FreeRtos::delay_ms(1);
    }

    /// Terminal state: park the main task forever.
    pub fn halt(&mut self, fault: Fault) -> ! {
        error!("board: halted ({})", fault);
        loop {
            FreeRtos::delay_ms(1_000);
        }
    }
}

/// UART1 as a blocking [`SerialPort`].
pub struct EspSerial {
    uart: UartDriver<'static>,
}

impl SerialPort for EspSerial {
    fn read_byte(&mut self) -> Result<u8, TransportError> {
        let mut byte = [0u8; 1];
        loop {
            match self.uart.read(&mut byte, BLOCK) {
                Ok(1) => return Ok(byte[0]),
                Ok(_) => {}
                Err(e) => {
                    warn!("uart: read failed: {}", e);
                    return Err(TransportError::Read);
                }
            }
        }
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<(), TransportError> {
        while !data.is_empty() {
            let n = self.uart.write(data).map_err(|e| {
                warn!("uart: write failed: {}", e);
                TransportError::Write
            })?;
            data = &data[n..];
        }
        Ok(())
    }
}
