//! MCP3008 8-channel, 10-bit SPI converter.
//!
//! One conversion is a single three-byte full-duplex frame with chip select
//! held low for its duration:
//!
//! | byte | MOSI                        | MISO                |
//! |------|-----------------------------|---------------------|
//! | 0    | `0x01` (start bit)          | ignored             |
//! | 1    | `(0x08 \| ch) << 4` (single-ended, channel) | `xxxxxx98` (bits 9..8) |
//! | 2    | `0x00`                      | `76543210` (bits 7..0) |
//!
//! The bus must run in SPI mode 0, MSB first (500 kHz on the reference
//! board). Chip-select framing is the [`SpiDevice`]'s job.

use embedded_hal::spi::SpiDevice;

use super::ChannelAdc;
use crate::constants::MAX_ADC_CHANNEL;

const START_BIT: u8 = 0b0000_0001;
const SINGLE_ENDED: u8 = 0b1000;
const HIGH_BITS_MASK: u8 = 0b0000_0011;

/// Full-scale count of a 10-bit conversion.
pub const MCP3008_MAX_COUNT: u16 = 1023;

pub struct Mcp3008<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Mcp3008<SPI> {
    /// Wrap an already configured SPI device.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Give back the SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Read one single-ended conversion, surfacing bus errors.
    ///
    /// Channels above 7 return 0 without touching the bus.
    pub fn try_read(&mut self, channel: u8) -> Result<u16, SPI::Error> {
        if channel > MAX_ADC_CHANNEL {
            return Ok(0);
        }

        let tx = [START_BIT, (SINGLE_ENDED | channel) << 4, 0x00];
        let mut rx = [0u8; 3];
        self.spi.transfer(&mut rx, &tx)?;

        Ok((u16::from(rx[1] & HIGH_BITS_MASK) << 8) | u16::from(rx[2]))
    }
}

impl<SPI: SpiDevice> ChannelAdc for Mcp3008<SPI> {
    fn read_channel(&mut self, channel: u8) -> u16 {
        match self.try_read(channel) {
            Ok(count) => count,
            Err(e) => {
                log::warn!("MCP3008 read on channel {} failed: {:?}", channel, e);
                0
            }
        }
    }
}
