pub mod mcp3008;

pub use mcp3008::Mcp3008;

/// Multi-channel converter returning one sample per call.
///
/// Reads are total: a channel the converter does not have reads as 0.
pub trait ChannelAdc {
    fn read_channel(&mut self, channel: u8) -> u16;
}

impl<T: ChannelAdc + ?Sized> ChannelAdc for &mut T {
    fn read_channel(&mut self, channel: u8) -> u16 {
        (**self).read_channel(channel)
    }
}

impl<T: ChannelAdc + ?Sized> ChannelAdc for Box<T> {
    fn read_channel(&mut self, channel: u8) -> u16 {
        (**self).read_channel(channel)
    }
}
